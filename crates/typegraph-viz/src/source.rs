//! Handoff of graph batches from a data source to the layout driver.
//!
//! The producer runs wherever query results arrive (usually another thread)
//! and sends whole batches; the driver drains them between frames. A batch is
//! only visible once it has been sent in full.

use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;
use typegraph_core::GraphBatch;

/// Failure reported by the producing side instead of a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The query behind the source failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// A batch could not be decoded.
    #[error("Malformed batch: {0}")]
    Decode(String),
}

/// One message from the data source.
pub type SourceMessage = Result<GraphBatch, SourceError>;

/// The receiving side has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("The layout driver is no longer receiving batches")]
pub struct SourceClosed;

/// Producer half of the handoff.
#[derive(Debug, Clone)]
pub struct BatchSender {
    sender: Sender<SourceMessage>,
}

/// Consumer half of the handoff, owned by the layout driver.
#[derive(Debug)]
pub struct DataSource {
    receiver: Receiver<SourceMessage>,
}

/// Create a connected sender and data source.
pub fn channel() -> (BatchSender, DataSource) {
    let (sender, receiver) = mpsc::channel();
    (BatchSender { sender }, DataSource { receiver })
}

impl BatchSender {
    pub fn send(&self, batch: GraphBatch) -> Result<(), SourceClosed> {
        self.sender.send(Ok(batch)).map_err(|_| SourceClosed)
    }

    pub fn send_error(&self, error: SourceError) -> Result<(), SourceClosed> {
        self.sender.send(Err(error)).map_err(|_| SourceClosed)
    }

    /// Decode a JSON batch and send it, or send the decode failure.
    pub fn send_json(&self, json: &str) -> Result<(), SourceClosed> {
        let message = GraphBatch::from_json(json).map_err(|e| SourceError::Decode(e.to_string()));
        self.sender.send(message).map_err(|_| SourceClosed)
    }
}

impl DataSource {
    /// Take every message sent so far without blocking.
    pub fn drain(&self) -> Vec<SourceMessage> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegraph_core::{VertexData, VertexEncoding};

    #[test]
    fn test_drain_preserves_order() {
        let (sender, source) = channel();
        let batch = GraphBatch::new(
            vec![VertexData::new(1, VertexEncoding::Entity, "person", 100.0, 35.0)],
            Vec::new(),
        );
        sender.send(batch.clone()).unwrap();
        sender.send_error(SourceError::Query("timeout".into())).unwrap();
        sender.send_json("not json").unwrap();

        let messages = source.drain();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Ok(batch));
        assert_eq!(messages[1], Err(SourceError::Query("timeout".into())));
        assert!(matches!(messages[2], Err(SourceError::Decode(_))));
        assert!(source.drain().is_empty());
    }

    #[test]
    fn test_sender_from_other_thread() {
        let (sender, source) = channel();
        let handle = std::thread::spawn(move || {
            for id in 0..3 {
                let vertex = VertexData::new(id, VertexEncoding::Attribute, "name", 80.0, 30.0);
                sender.send(GraphBatch::new(vec![vertex], Vec::new())).unwrap();
            }
        });
        handle.join().unwrap();
        let ids: Vec<_> = source
            .drain()
            .into_iter()
            .map(|m| m.unwrap().vertices[0].id.0)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_send_after_driver_dropped() {
        let (sender, source) = channel();
        drop(source);
        assert_eq!(sender.send(GraphBatch::default()), Err(SourceClosed));
    }
}

//! Per-frame orchestration: drain new data, tick, publish positions.

use std::time::{Duration, Instant};

use tracing::{trace, warn};
use typegraph_layout::TickStats;

use crate::config::LayoutConfig;
use crate::error::VizResult;
use crate::simulation::VisualiserSimulation;
use crate::source::DataSource;
use crate::state::GraphState;

/// What a call to [`LayoutDriver::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Not running, or too soon after the previous frame.
    Skipped,
    /// Nothing to lay out, or the layout has settled.
    Idle,
    /// The simulation advanced one tick.
    Ticked(TickStats),
}

/// Drives a [`VisualiserSimulation`] from an animation loop.
///
/// The caller invokes [`frame`](Self::frame) once per rendered frame; the
/// driver throttles ticks to the configured frame interval and drains the
/// data source at the fetch interval.
#[derive(Debug)]
pub struct LayoutDriver {
    simulation: VisualiserSimulation,
    source: DataSource,
    running: bool,
    frame_interval: Duration,
    fetch_interval: Duration,
    last_frame: Option<Instant>,
    last_fetch: Option<Instant>,
}

impl LayoutDriver {
    pub fn new(config: LayoutConfig, source: DataSource) -> VizResult<Self> {
        let frame_interval = config.frame_interval();
        let fetch_interval = config.fetch_interval();
        Ok(Self {
            simulation: VisualiserSimulation::new(config)?,
            source,
            running: false,
            frame_interval,
            fetch_interval,
            last_frame: None,
            last_fetch: None,
        })
    }

    pub fn state(&self) -> &GraphState {
        self.simulation.state()
    }

    pub fn simulation(&self) -> &VisualiserSimulation {
        &self.simulation
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop ticking. Checked at the start of every frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn alpha(&self) -> f64 {
        self.simulation.alpha()
    }

    pub fn alpha_min(&self) -> f64 {
        self.simulation.alpha_min()
    }

    /// Start a new layout run and begin ticking.
    pub fn init(&mut self) -> VizResult<()> {
        self.simulation.init()?;
        self.last_frame = None;
        self.last_fetch = None;
        self.running = true;
        Ok(())
    }

    /// Drop all data and stop.
    pub fn clear(&mut self) {
        self.simulation.clear();
        self.running = false;
        self.last_frame = None;
        self.last_fetch = None;
    }

    /// Run one animation frame at time `now`.
    ///
    /// Rejected batches and source errors are logged and skipped; they never
    /// touch the layout.
    pub fn frame(&mut self, now: Instant) -> VizResult<FrameOutcome> {
        if !self.running || !elapsed(self.last_frame, now, self.frame_interval) {
            return Ok(FrameOutcome::Skipped);
        }
        self.last_frame = Some(now);

        if elapsed(self.last_fetch, now, self.fetch_interval) {
            self.last_fetch = Some(now);
            self.fetch();
        }

        if self.simulation.is_empty() || self.simulation.alpha() < self.simulation.alpha_min() {
            return Ok(FrameOutcome::Idle);
        }

        let stats = self.simulation.tick()?;
        trace!(iteration = stats.iteration, alpha = stats.alpha, "Frame ticked");
        Ok(FrameOutcome::Ticked(stats))
    }

    fn fetch(&mut self) {
        for message in self.source.drain() {
            match message {
                Ok(batch) => {
                    if let Err(e) = self.simulation.ingest(batch) {
                        warn!(error = %e, "Rejected graph batch");
                    }
                }
                Err(e) => warn!(error = %e, "Data source error"),
            }
        }
    }
}

fn elapsed(since: Option<Instant>, now: Instant, interval: Duration) -> bool {
    since.map_or(true, |t| now.saturating_duration_since(t) >= interval)
}

//! Seeded jitter for coincident points and node placement.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded source of tiny random offsets.
///
/// Forces draw from it whenever two points coincide exactly, so a direction
/// can be chosen without dividing by zero. The simulation also uses it to
/// scatter newly placed nodes.
#[derive(Debug, Clone)]
pub struct Jiggle {
    rng: StdRng,
}

impl Jiggle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A value in `[-0.5e-6, 0.5e-6)`.
    pub fn sample(&mut self) -> f64 {
        self.offset(1e-6)
    }

    /// A value in `[-scale / 2, scale / 2)`.
    pub fn offset(&mut self, scale: f64) -> f64 {
        (self.rng.random::<f64>() - 0.5) * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Jiggle::new(7);
        let mut b = Jiggle::new(7);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_sample_is_tiny() {
        let mut jiggle = Jiggle::new(1);
        for _ in 0..100 {
            let v = jiggle.sample();
            assert!(v.abs() <= 0.5e-6);
        }
    }
}

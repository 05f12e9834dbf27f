//! Simulation tuning parameters.

use serde::{Deserialize, Serialize};

use crate::error::{finite, positive, unit_interval, LayoutResult};

/// Configuration for a [`Simulation`](crate::Simulation).
///
/// The defaults settle a layout in roughly 300 ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting alpha.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Ticking should stop once alpha drops below this.
    #[serde(default = "default_alpha_min")]
    pub alpha_min: f64,

    /// Fraction of the gap to `alpha_target` closed each tick.
    #[serde(default = "default_alpha_decay")]
    pub alpha_decay: f64,

    /// Value alpha decays toward.
    #[serde(default)]
    pub alpha_target: f64,

    /// Fraction of velocity kept after each tick (0 = frozen, 1 = frictionless).
    #[serde(default = "default_velocity_decay")]
    pub velocity_decay: f64,

    /// Spacing of the phyllotaxis spiral used to place new nodes.
    #[serde(default = "default_initial_radius")]
    pub initial_radius: f64,

    /// Seed for placement jitter and coincident-point jiggle.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_alpha() -> f64 {
    1.0
}

fn default_alpha_min() -> f64 {
    0.001
}

fn default_alpha_decay() -> f64 {
    1.0 - 0.001_f64.powf(1.0 / 300.0)
}

fn default_velocity_decay() -> f64 {
    0.6
}

fn default_initial_radius() -> f64 {
    10.0
}

fn default_seed() -> u64 {
    0x7e5e_ed
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            alpha_min: default_alpha_min(),
            alpha_decay: default_alpha_decay(),
            alpha_target: 0.0,
            velocity_decay: default_velocity_decay(),
            initial_radius: default_initial_radius(),
            seed: default_seed(),
        }
    }
}

impl SimulationConfig {
    /// Check every parameter is in range.
    pub fn validate(&self) -> LayoutResult<()> {
        finite("alpha", self.alpha)?;
        finite("alpha_min", self.alpha_min)?;
        finite("alpha_target", self.alpha_target)?;
        unit_interval("alpha_decay", self.alpha_decay)?;
        unit_interval("velocity_decay", self.velocity_decay)?;
        positive("initial_radius", self.initial_radius)?;
        Ok(())
    }
}

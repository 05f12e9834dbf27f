//! Layout tuning for query-result graphs.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typegraph_layout::SimulationConfig;

use crate::error::{VizError, VizResult};

/// Force parameters and frame pacing for a [`VisualiserSimulation`](crate::VisualiserSimulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Alpha schedule and placement of the underlying simulation.
    #[serde(default = "default_simulation")]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub center_x: f64,

    #[serde(default)]
    pub center_y: f64,

    /// Collision radius of vertex nodes.
    #[serde(default = "default_collide_radius")]
    pub collide_radius: f64,

    /// Charge per edge-to-vertex ratio once edges arrive.
    #[serde(default = "default_base_charge")]
    pub base_charge: f64,

    /// Charge before any edges arrive.
    #[serde(default = "default_initial_charge")]
    pub initial_charge: f64,

    /// Pull of each vertex toward the centre on each axis.
    #[serde(default = "default_position_strength")]
    pub position_strength: f64,

    #[serde(default = "default_link_distance")]
    pub link_distance: f64,

    #[serde(default = "default_link_strength")]
    pub link_strength: f64,

    /// Collision radius of band nodes.
    #[serde(default = "default_band_collide_radius")]
    pub band_collide_radius: f64,

    /// Pull of a band node toward its edge midpoint.
    #[serde(default = "default_band_strength")]
    pub band_strength: f64,

    /// Alpha is raised to at least this when new data arrives.
    #[serde(default = "default_reheat_alpha")]
    pub reheat_alpha: f64,

    /// Minimum time between ticks.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f64,

    /// Minimum time between drains of the data source.
    #[serde(default = "default_fetch_interval_ms")]
    pub fetch_interval_ms: u64,
}

fn default_simulation() -> SimulationConfig {
    SimulationConfig {
        alpha_min: 0.01,
        ..Default::default()
    }
}

fn default_collide_radius() -> f64 {
    80.0
}

fn default_base_charge() -> f64 {
    -600.0
}

fn default_initial_charge() -> f64 {
    -100.0
}

fn default_position_strength() -> f64 {
    0.05
}

fn default_link_distance() -> f64 {
    90.0
}

fn default_link_strength() -> f64 {
    0.5
}

fn default_band_collide_radius() -> f64 {
    40.0
}

fn default_band_strength() -> f64 {
    0.35
}

fn default_reheat_alpha() -> f64 {
    0.3
}

fn default_frame_interval_ms() -> f64 {
    1000.0 / 60.0
}

fn default_fetch_interval_ms() -> u64 {
    50
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            simulation: default_simulation(),
            center_x: 0.0,
            center_y: 0.0,
            collide_radius: default_collide_radius(),
            base_charge: default_base_charge(),
            initial_charge: default_initial_charge(),
            position_strength: default_position_strength(),
            link_distance: default_link_distance(),
            link_strength: default_link_strength(),
            band_collide_radius: default_band_collide_radius(),
            band_strength: default_band_strength(),
            reheat_alpha: default_reheat_alpha(),
            frame_interval_ms: default_frame_interval_ms(),
            fetch_interval_ms: default_fetch_interval_ms(),
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> VizResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> VizResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> VizResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> VizResult<()> {
        self.simulation.validate()?;

        let positive = [
            ("collide_radius", self.collide_radius),
            ("link_distance", self.link_distance),
            ("band_collide_radius", self.band_collide_radius),
            ("frame_interval_ms", self.frame_interval_ms),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(VizError::Config(format!("{} must be positive, got {}", key, value)));
            }
        }

        let finite = [
            ("center_x", self.center_x),
            ("center_y", self.center_y),
            ("base_charge", self.base_charge),
            ("initial_charge", self.initial_charge),
            ("position_strength", self.position_strength),
            ("link_strength", self.link_strength),
            ("band_strength", self.band_strength),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(VizError::Config(format!("{} must be finite, got {}", key, value)));
            }
        }

        if !(0.0..=1.0).contains(&self.reheat_alpha) {
            return Err(VizError::Config(format!(
                "reheat_alpha must be within [0, 1], got {}",
                self.reheat_alpha
            )));
        }
        if self.fetch_interval_ms == 0 {
            return Err(VizError::Config("fetch_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(self.frame_interval_ms / 1000.0)
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "simulation.alpha" => self.simulation.alpha,
            "simulation.alpha_min" => self.simulation.alpha_min,
            "simulation.alpha_decay" => self.simulation.alpha_decay,
            "simulation.alpha_target" => self.simulation.alpha_target,
            "simulation.velocity_decay" => self.simulation.velocity_decay,
            "simulation.initial_radius" => self.simulation.initial_radius,
            "simulation.seed" => return Some(self.simulation.seed.to_string()),
            "center_x" => self.center_x,
            "center_y" => self.center_y,
            "collide_radius" => self.collide_radius,
            "base_charge" => self.base_charge,
            "initial_charge" => self.initial_charge,
            "position_strength" => self.position_strength,
            "link_distance" => self.link_distance,
            "link_strength" => self.link_strength,
            "band_collide_radius" => self.band_collide_radius,
            "band_strength" => self.band_strength,
            "reheat_alpha" => self.reheat_alpha,
            "frame_interval_ms" => self.frame_interval_ms,
            "fetch_interval_ms" => return Some(self.fetch_interval_ms.to_string()),
            _ => return None,
        };
        Some(value.to_string())
    }

    /// Set a configuration value by key.
    ///
    /// The updated configuration is validated; on error nothing changes.
    pub fn set(&mut self, key: &str, value: &str) -> VizResult<()> {
        let mut updated = self.clone();
        match key {
            "simulation.seed" => updated.simulation.seed = parse(value)?,
            "fetch_interval_ms" => updated.fetch_interval_ms = parse(value)?,
            _ => {
                let slot = updated
                    .float_slot(key)
                    .ok_or_else(|| VizError::Config(format!("Unknown config key: {}", key)))?;
                *slot = parse(value)?;
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn float_slot(&mut self, key: &str) -> Option<&mut f64> {
        Some(match key {
            "simulation.alpha" => &mut self.simulation.alpha,
            "simulation.alpha_min" => &mut self.simulation.alpha_min,
            "simulation.alpha_decay" => &mut self.simulation.alpha_decay,
            "simulation.alpha_target" => &mut self.simulation.alpha_target,
            "simulation.velocity_decay" => &mut self.simulation.velocity_decay,
            "simulation.initial_radius" => &mut self.simulation.initial_radius,
            "center_x" => &mut self.center_x,
            "center_y" => &mut self.center_y,
            "collide_radius" => &mut self.collide_radius,
            "base_charge" => &mut self.base_charge,
            "initial_charge" => &mut self.initial_charge,
            "position_strength" => &mut self.position_strength,
            "link_distance" => &mut self.link_distance,
            "link_strength" => &mut self.link_strength,
            "band_collide_radius" => &mut self.band_collide_radius,
            "band_strength" => &mut self.band_strength,
            "reheat_alpha" => &mut self.reheat_alpha,
            "frame_interval_ms" => &mut self.frame_interval_ms,
            _ => return None,
        })
    }
}

fn parse<T: std::str::FromStr>(value: &str) -> VizResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| VizError::Config(format!("Invalid number: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.simulation.alpha_min, 0.01);
        assert_eq!(config.collide_radius, 80.0);
        assert_eq!(config.fetch_interval(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = LayoutConfig::from_json_str(
            r#"{"link_distance": 120.0, "simulation": {"alpha_min": 0.02}}"#,
        )
        .unwrap();
        assert_eq!(config.link_distance, 120.0);
        assert_eq!(config.simulation.alpha_min, 0.02);
        assert_eq!(config.simulation.velocity_decay, 0.6);
        assert_eq!(config.base_charge, -600.0);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            LayoutConfig::from_json_str(r#"{"collide_radius": -1.0}"#),
            Err(VizError::Config(_))
        ));
        assert!(matches!(
            LayoutConfig::from_json_str(r#"{"simulation": {"velocity_decay": 2.0}}"#),
            Err(VizError::Layout(_))
        ));
        assert!(matches!(LayoutConfig::from_json_str("{"), Err(VizError::Json(_))));
    }

    #[test]
    fn test_get_set() {
        let mut config = LayoutConfig::default();
        config.set("link_distance", "45").unwrap();
        assert_eq!(config.get("link_distance").as_deref(), Some("45"));

        config.set("simulation.seed", "7").unwrap();
        assert_eq!(config.simulation.seed, 7);

        assert!(config.set("no_such_key", "1").is_err());
        assert!(config.set("link_distance", "far").is_err());
        assert!(config.get("no_such_key").is_none());
    }

    #[test]
    fn test_set_rejects_out_of_range_and_keeps_value() {
        let mut config = LayoutConfig::default();
        assert!(config.set("reheat_alpha", "3").is_err());
        assert_eq!(config.reheat_alpha, 0.3);
    }
}

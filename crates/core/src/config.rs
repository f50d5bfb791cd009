//! Simulation configuration and configuration errors.
//!
//! Every tunable has a default matching the minigame's 20 ticks per second
//! server, so an empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server ticks per second; lifetimes and scan intervals are expressed in ticks
pub const TICKS_PER_SECOND: u32 = 20;

/// Fire cell tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Per-tick spread chance, multiplied by the fuel's spread weight
    pub base_spread_chance: f64,
    /// Per-tick, per-neighbour burn chance, multiplied by the neighbour's burn weight
    pub base_burn_chance: f64,
    /// Ticks a fire cell lives before it burns out
    pub max_lifetime_ticks: u32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            base_spread_chance: 0.0005,
            base_burn_chance: 0.0005,
            max_lifetime_ticks: TICKS_PER_SECOND * 15,
        }
    }
}

impl FireConfig {
    /// Age after which a cell without support below must have flammable
    /// neighbours to survive
    pub fn unsupported_grace_ticks(&self) -> u32 {
        self.max_lifetime_ticks / 3
    }
}

/// Burnable region tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Ticks between region rescans
    pub update_interval_ticks: u32,
    /// Proportion burned at which a region counts as destroyed
    pub fully_burned_threshold: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            update_interval_ticks: TICKS_PER_SECOND,
            fully_burned_threshold: 0.9,
        }
    }
}

/// Top-level configuration for a [`crate::simulation::FireSimulation`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for every probability draw in the simulation
    pub seed: u64,
    pub fire: FireConfig,
    pub regions: RegionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_f12e,
            fire: FireConfig::default(),
            regions: RegionConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, chance) in [
            ("fire.base_spread_chance", self.fire.base_spread_chance),
            ("fire.base_burn_chance", self.fire.base_burn_chance),
        ] {
            if !chance.is_finite() || chance < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be finite and non-negative, got {chance}"
                )));
            }
        }
        if self.regions.update_interval_ticks == 0 {
            return Err(ConfigError::Invalid(
                "regions.update_interval_ticks must be positive".to_string(),
            ));
        }
        let threshold = self.regions.fully_burned_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "regions.fully_burned_threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the source
    Io(String),
    /// Failed to parse the document
    Parse(String),
    /// Document parsed but a value is out of range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Failed to read configuration: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Failed to parse configuration: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            ConfigError::Io(error.to_string())
        } else {
            ConfigError::Parse(error.to_string())
        }
    }
}

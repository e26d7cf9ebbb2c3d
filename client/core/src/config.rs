//! Configuration
//!
//! Central configuration for the field core, loaded with the following
//! priority (highest first):
//!
//! 1. Environment variables (`CRABFIELD_*`)
//! 2. TOML configuration file (path from `CRABFIELD_CONFIG`)
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! field_size = 30
//! food_cap = 5
//! food_size_max = 3
//! decoration_ratio = 0.15
//! decoration_tick_ms = 100
//! food_tick_ms = 1000
//! crab_tick_ms = 600
//! advance_probability = 0.8
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file at {path}: {source}")]
    Read {
        /// The path that was attempted.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was out of its legal range.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Field core configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Grid dimension, cells per side.
    pub field_size: u32,
    /// Maximum concurrent food items the local spawner will hold.
    pub food_cap: usize,
    /// Largest food render size the spawner produces.
    pub food_size_max: u32,
    /// Decoration capacity as a fraction of `field_size²`.
    pub decoration_ratio: f64,
    /// Decoration painter tick interval.
    pub decoration_tick: Duration,
    /// Food spawner tick interval.
    pub food_tick: Duration,
    /// Crab mover tick interval.
    pub crab_tick: Duration,
    /// Probability that a crab which can advance does so instead of turning.
    pub advance_probability: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            field_size: 30,
            food_cap: 5,
            food_size_max: 3,
            decoration_ratio: 0.15,
            decoration_tick: Duration::from_millis(100),
            food_tick: Duration::from_millis(1000),
            crab_tick: Duration::from_millis(600),
            advance_probability: 0.8,
        }
    }
}

impl FieldConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid dimension.
    #[must_use]
    pub fn with_field_size(mut self, field_size: u32) -> Self {
        self.field_size = field_size;
        self
    }

    /// Set the decoration capacity ratio.
    #[must_use]
    pub fn with_decoration_ratio(mut self, ratio: f64) -> Self {
        self.decoration_ratio = ratio;
        self
    }

    /// Set the advance probability of the crab mover.
    #[must_use]
    pub fn with_advance_probability(mut self, probability: f64) -> Self {
        self.advance_probability = probability;
        self
    }

    /// A small, fast configuration for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            field_size: 10,
            decoration_tick: Duration::from_millis(10),
            food_tick: Duration::from_millis(10),
            crab_tick: Duration::from_millis(10),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables over defaults.
    ///
    /// If `CRABFIELD_CONFIG` points at a TOML file, that file is layered
    /// between defaults and the environment. A missing or malformed file is
    /// reported, not silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var("CRABFIELD_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.merged_with_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file over defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&text)?;
        let config = Self::default().merged_with_file(file);
        config.validate()?;
        Ok(config)
    }

    /// Capacity of the decoration overlay, `⌊field_size² × ratio⌋`, at
    /// least one.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn decoration_capacity(&self) -> usize {
        let cells = f64::from(self.field_size) * f64::from(self.field_size);
        ((cells * self.decoration_ratio).floor() as usize).max(1)
    }

    /// Capacity of the paint overlay, `field_size²`, at least one.
    #[must_use]
    pub fn paint_capacity(&self) -> usize {
        ((self.field_size as usize) * (self.field_size as usize)).max(1)
    }

    /// Check every value is in its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_size == 0 {
            return Err(ConfigError::Validation("field_size must be >= 1".into()));
        }
        if self.food_size_max == 0 {
            return Err(ConfigError::Validation("food_size_max must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.advance_probability) {
            return Err(ConfigError::Validation(
                "advance_probability must be within [0, 1]".into(),
            ));
        }
        if self.decoration_ratio <= 0.0 {
            return Err(ConfigError::Validation(
                "decoration_ratio must be positive".into(),
            ));
        }
        Ok(())
    }

    fn merged_with_file(mut self, file: FileConfig) -> Self {
        if let Some(v) = file.field_size {
            self.field_size = v;
        }
        if let Some(v) = file.food_cap {
            self.food_cap = v;
        }
        if let Some(v) = file.food_size_max {
            self.food_size_max = v;
        }
        if let Some(v) = file.decoration_ratio {
            self.decoration_ratio = v;
        }
        if let Some(v) = file.decoration_tick_ms {
            self.decoration_tick = Duration::from_millis(v);
        }
        if let Some(v) = file.food_tick_ms {
            self.food_tick = Duration::from_millis(v);
        }
        if let Some(v) = file.crab_tick_ms {
            self.crab_tick = Duration::from_millis(v);
        }
        if let Some(v) = file.advance_probability {
            self.advance_probability = v;
        }
        self
    }

    fn merged_with_env(mut self) -> Self {
        if let Some(v) = env_parse("CRABFIELD_FIELD_SIZE") {
            self.field_size = v;
        }
        if let Some(v) = env_parse("CRABFIELD_FOOD_CAP") {
            self.food_cap = v;
        }
        if let Some(v) = env_parse("CRABFIELD_FOOD_SIZE_MAX") {
            self.food_size_max = v;
        }
        if let Some(v) = env_parse("CRABFIELD_DECORATION_RATIO") {
            self.decoration_ratio = v;
        }
        if let Some(v) = env_parse("CRABFIELD_DECORATION_TICK_MS") {
            self.decoration_tick = Duration::from_millis(v);
        }
        if let Some(v) = env_parse("CRABFIELD_FOOD_TICK_MS") {
            self.food_tick = Duration::from_millis(v);
        }
        if let Some(v) = env_parse("CRABFIELD_CRAB_TICK_MS") {
            self.crab_tick = Duration::from_millis(v);
        }
        if let Some(v) = env_parse("CRABFIELD_ADVANCE_PROBABILITY") {
            self.advance_probability = v;
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// On-disk TOML schema; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    field_size: Option<u32>,
    food_cap: Option<usize>,
    food_size_max: Option<u32>,
    decoration_ratio: Option<f64>,
    decoration_tick_ms: Option<u64>,
    food_tick_ms: Option<u64>,
    crab_tick_ms: Option<u64>,
    advance_probability: Option<f64>,
}

//! Sampler configuration loaded from YAML.

use crate::registry::{ConversionSettings, DEFAULT_MAX_SIZE};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Settings that cannot produce any sample
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for drawing samples.
///
/// ```yaml
/// seed: 42
/// count: 5
/// max_local_rejects: 1000
/// max_size: 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    /// Seed for the random number generator
    pub seed: u64,
    /// Number of samples to draw
    pub count: usize,
    /// Rejected draws tolerated before giving up on a sample
    pub max_local_rejects: u32,
    /// Upper bound for otherwise unbounded text and collection sizes
    pub max_size: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            count: 10,
            max_local_rejects: 65_536,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl SamplerConfig {
    /// Load config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SamplerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_local_rejects == 0 {
            return Err(ConfigError::Invalid(
                "max_local_rejects must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn conversion_settings(&self) -> ConversionSettings {
        ConversionSettings {
            max_size: self.max_size,
        }
    }
}

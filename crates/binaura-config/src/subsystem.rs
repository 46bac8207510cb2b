//! Startup configuration for the spatial-audio subsystem.

use std::path::Path;

use binaura_core::MAX_PROCESS_FRAMES;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the audio subsystem is set up at startup.
///
/// Loaded from TOML (all fields optional, falling back to defaults) and
/// validated before it reaches the engine. Describes configuration only;
/// no pool or session state is ever persisted.
///
/// ```toml
/// max_buses = 8
/// prewarm = 2
/// enabled = true
/// sample_rate = 48000.0
/// buffer_size = 512
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubsystemConfig {
    /// Pool capacity: most spatializer buses alive at once.
    pub max_buses: usize,
    /// Buses to create eagerly at startup, paying instance-initialization
    /// cost up front. Clamped to `max_buses`.
    pub prewarm: usize,
    /// Whether the processed path starts enabled.
    pub enabled: bool,
    /// Mix rate processor instances are created for, in Hz.
    pub sample_rate: f32,
    /// Block size processor instances are created for, in frames.
    pub buffer_size: usize,
}

impl Default for SubsystemConfig {
    fn default() -> Self {
        Self {
            max_buses: 8,
            prewarm: 0,
            enabled: true,
            sample_rate: 48000.0,
            buffer_size: 512,
        }
    }
}

impl SubsystemConfig {
    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate <= 0.0 {
            return Err(ConfigError::validation(
                "sample_rate",
                format!("must be positive, got {}", self.sample_rate),
            ));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::validation("buffer_size", "must be nonzero"));
        }
        if self.buffer_size > MAX_PROCESS_FRAMES {
            return Err(ConfigError::validation(
                "buffer_size",
                format!(
                    "must be at most {MAX_PROCESS_FRAMES}, got {}",
                    self.buffer_size
                ),
            ));
        }
        if self.prewarm > self.max_buses {
            return Err(ConfigError::validation(
                "prewarm",
                format!(
                    "cannot exceed max_buses ({}), got {}",
                    self.max_buses, self.prewarm
                ),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads and validates a configuration file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Writes the configuration to a file as TOML.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))
    }
}

//! Drift Configuration
//!
//! TOML-based configuration loading with sensible defaults. An empty file is
//! a valid configuration: the scheduler connects to `http://localhost:2023/`
//! and plays back with hooking enabled.
//!
//! # Parsing
//!
//! ```
//! use drift_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[control]\nport = 20230").unwrap();
//! assert_eq!(config.control.port, 20230);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [control]
//! transport = "socket"
//! host = "127.0.0.1"
//! port = 20230
//! reconnect_interval = "2s"
//!
//! [playback]
//! method = "hybrid"
//! projector = "haversine"
//! trace_tick = "1s"
//! motion_tick = "100ms"
//! step_stride = 1.2
//! salt = 0.00001
//! ```

mod control;
mod error;
mod logging;
mod playback;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use control::{ControlConfig, Transport};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use playback::{HookingMethod, PlaybackConfig, ProjectorKind};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Controller connection
    pub control: ControlConfig,

    /// Playback tuning
    pub playback: PlaybackConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

//! Configuration validation
//!
//! Rejects values the scheduler cannot run with:
//! - Controller port 0
//! - Zero tick intervals
//! - Non-positive step stride
//! - Negative or non-finite salt
//! - TLS on the socket transport

use crate::Config;
use crate::control::Transport;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_control(config)?;
    validate_playback(config)?;
    Ok(())
}

fn validate_control(config: &Config) -> Result<()> {
    let control = &config.control;

    if control.port == 0 {
        return Err(ConfigError::invalid_value("control", "port", "must not be 0"));
    }
    if control.host.is_empty() {
        return Err(ConfigError::invalid_value("control", "host", "must not be empty"));
    }
    if control.reconnect_interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "control",
            "reconnect_interval",
            "must be greater than 0",
        ));
    }
    if control.tls && control.transport == Transport::Socket {
        return Err(ConfigError::invalid_value(
            "control",
            "tls",
            "is not supported with the socket transport",
        ));
    }

    Ok(())
}

fn validate_playback(config: &Config) -> Result<()> {
    let playback = &config.playback;

    if playback.trace_tick.is_zero() {
        return Err(ConfigError::invalid_value(
            "playback",
            "trace_tick",
            "must be greater than 0",
        ));
    }
    if playback.motion_tick.is_zero() {
        return Err(ConfigError::invalid_value(
            "playback",
            "motion_tick",
            "must be greater than 0",
        ));
    }
    if !playback.step_stride.is_finite() || playback.step_stride <= 0.0 {
        return Err(ConfigError::invalid_value(
            "playback",
            "step_stride",
            format!("must be a positive number, got {}", playback.step_stride),
        ));
    }
    if !playback.salt.is_finite() || playback.salt < 0.0 {
        return Err(ConfigError::invalid_value(
            "playback",
            "salt",
            format!("must be a non-negative number, got {}", playback.salt),
        ));
    }

    Ok(())
}

//! TOML configuration loader with validation.
//!
//! Every field has a default matching the shipped tuning, so an empty
//! file (or no file at all) yields a usable config. `validate()` checks
//! parameter bounds after parsing; an out-of-range value is a startup
//! error, never silently clamped.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dbw_common::consts::{
    BRAKE_ENGAGED_MIN_DEFAULT, BRAKE_FILTER_FACTOR_DEFAULT, BUS_CHANNEL_DEFAULT,
    STEERING_DEADZONE_DEFAULT, STEERING_FILTER_FACTOR_DEFAULT, STEERING_RANGE_SCALE_DEFAULT,
    THROTTLE_FILTER_FACTOR_DEFAULT, TICK_INTERVAL_MS_DEFAULT, TICK_INTERVAL_MS_MAX,
    TICK_INTERVAL_MS_MIN, ZERO_CHECK_MAX_ATTEMPTS_DEFAULT, ZERO_CHECK_POLL_MS_DEFAULT,
};

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter bound violation.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Sections ───────────────────────────────────────────────────────

/// Session and scheduling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bus channel identifier to open.
    #[serde(default = "default_bus_channel")]
    pub bus_channel: u32,

    /// Tick cadence [ms] the external scheduler is expected to hold.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Force-disable when the device read fails mid-session.
    ///
    /// Off by default: a transient device hiccup keeps the session
    /// armed, and the disable button / override paths stay valid on
    /// later ticks.
    #[serde(default)]
    pub disable_on_device_loss: bool,
}

/// Startup trigger zero-check parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroCheckConfig {
    /// Poll interval while waiting for zeroed triggers [ms].
    #[serde(default = "default_zero_check_poll_ms")]
    pub poll_interval_ms: u64,

    /// Retry budget [polls] before initialization aborts.
    #[serde(default = "default_zero_check_max_attempts")]
    pub max_attempts: u32,
}

/// Signal conditioning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Near-center steering span treated as exactly neutral.
    #[serde(default = "default_steering_deadzone")]
    pub steering_deadzone: f64,

    /// Exponential smoothing factor, brake.
    #[serde(default = "default_brake_filter_factor")]
    pub brake_filter_factor: f64,

    /// Exponential smoothing factor, throttle.
    #[serde(default = "default_throttle_filter_factor")]
    pub throttle_filter_factor: f64,

    /// Exponential smoothing factor, steering.
    #[serde(default = "default_steering_filter_factor")]
    pub steering_filter_factor: f64,

    /// Normalized brake position at which throttle is suppressed.
    #[serde(default = "default_brake_engaged_min")]
    pub brake_engaged_min: f64,

    /// Share of the mechanical steering range exposed.
    #[serde(default = "default_steering_range_scale")]
    pub steering_range_scale: f64,
}

/// Top-level commander configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommanderConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub zero_check: ZeroCheckConfig,
    #[serde(default)]
    pub signals: SignalConfig,
}

// ─── Defaults ───────────────────────────────────────────────────────

fn default_bus_channel() -> u32 {
    BUS_CHANNEL_DEFAULT
}
fn default_tick_interval_ms() -> u64 {
    TICK_INTERVAL_MS_DEFAULT
}
fn default_zero_check_poll_ms() -> u64 {
    ZERO_CHECK_POLL_MS_DEFAULT
}
fn default_zero_check_max_attempts() -> u32 {
    ZERO_CHECK_MAX_ATTEMPTS_DEFAULT
}
fn default_steering_deadzone() -> f64 {
    STEERING_DEADZONE_DEFAULT
}
fn default_brake_filter_factor() -> f64 {
    BRAKE_FILTER_FACTOR_DEFAULT
}
fn default_throttle_filter_factor() -> f64 {
    THROTTLE_FILTER_FACTOR_DEFAULT
}
fn default_steering_filter_factor() -> f64 {
    STEERING_FILTER_FACTOR_DEFAULT
}
fn default_brake_engaged_min() -> f64 {
    BRAKE_ENGAGED_MIN_DEFAULT
}
fn default_steering_range_scale() -> f64 {
    STEERING_RANGE_SCALE_DEFAULT
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bus_channel: default_bus_channel(),
            tick_interval_ms: default_tick_interval_ms(),
            disable_on_device_loss: false,
        }
    }
}

impl Default for ZeroCheckConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_zero_check_poll_ms(),
            max_attempts: default_zero_check_max_attempts(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            steering_deadzone: default_steering_deadzone(),
            brake_filter_factor: default_brake_filter_factor(),
            throttle_filter_factor: default_throttle_filter_factor(),
            steering_filter_factor: default_steering_filter_factor(),
            brake_engaged_min: default_brake_engaged_min(),
            steering_range_scale: default_steering_range_scale(),
        }
    }
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            zero_check: ZeroCheckConfig::default(),
            signals: SignalConfig::default(),
        }
    }
}

// ─── Validation ─────────────────────────────────────────────────────

impl CommanderConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.session;
        if s.tick_interval_ms < TICK_INTERVAL_MS_MIN || s.tick_interval_ms > TICK_INTERVAL_MS_MAX {
            return Err(ConfigError::Validation(format!(
                "tick_interval_ms {} out of range [{TICK_INTERVAL_MS_MIN}, {TICK_INTERVAL_MS_MAX}]",
                s.tick_interval_ms
            )));
        }

        let z = &self.zero_check;
        if z.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "zero_check.poll_interval_ms must be > 0".into(),
            ));
        }
        if z.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "zero_check.max_attempts must be > 0".into(),
            ));
        }

        let sig = &self.signals;
        if !(0.0..1.0).contains(&sig.steering_deadzone) {
            return Err(ConfigError::Validation(format!(
                "steering_deadzone {} out of range [0.0, 1.0)",
                sig.steering_deadzone
            )));
        }
        for (name, factor) in [
            ("brake_filter_factor", sig.brake_filter_factor),
            ("throttle_filter_factor", sig.throttle_filter_factor),
            ("steering_filter_factor", sig.steering_filter_factor),
        ] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} {factor} out of range (0.0, 1.0]"
                )));
            }
        }
        if !(0.0..=1.0).contains(&sig.brake_engaged_min) {
            return Err(ConfigError::Validation(format!(
                "brake_engaged_min {} out of range [0.0, 1.0]",
                sig.brake_engaged_min
            )));
        }
        if !(sig.steering_range_scale > 0.0 && sig.steering_range_scale <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "steering_range_scale {} out of range (0.0, 1.0]",
                sig.steering_range_scale
            )));
        }

        Ok(())
    }
}

// ─── Loading ────────────────────────────────────────────────────────

/// Load and validate the commander configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CommanderConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&raw)
}

/// Load and validate from a TOML string (also used by tests).
pub fn load_config_from_str(raw: &str) -> Result<CommanderConfig, ConfigError> {
    let config: CommanderConfig =
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────

//! Named defaults and validation bounds shared by config and runtime.

/// Maximum magnitude of a raw device axis sample (signed 16-bit device range).
pub const AXIS_MAX: f64 = i16::MAX as f64;

/// Default near-center steering span treated as exactly neutral.
pub const STEERING_DEADZONE_DEFAULT: f64 = 0.3;

/// Default exponential smoothing factor, brake channel.
pub const BRAKE_FILTER_FACTOR_DEFAULT: f64 = 0.2;
/// Default exponential smoothing factor, throttle channel.
pub const THROTTLE_FILTER_FACTOR_DEFAULT: f64 = 0.2;
/// Default exponential smoothing factor, steering channel (more inertia:
/// steering discontinuities trip the vehicle's own fault detector).
pub const STEERING_FILTER_FACTOR_DEFAULT: f64 = 0.1;

/// Normalized brake position at and above which throttle is suppressed.
pub const BRAKE_ENGAGED_MIN_DEFAULT: f64 = 0.05;

/// Share of the mechanical steering range exposed to the controller.
pub const STEERING_RANGE_SCALE_DEFAULT: f64 = 0.2;

/// Default tick cadence [ms].
pub const TICK_INTERVAL_MS_DEFAULT: u64 = 50;
/// Tick cadence bounds [ms].
pub const TICK_INTERVAL_MS_MIN: u64 = 1;
pub const TICK_INTERVAL_MS_MAX: u64 = 1000;

/// Default zero-check poll interval [ms].
pub const ZERO_CHECK_POLL_MS_DEFAULT: u64 = 50;
/// Default zero-check retry budget [polls].
pub const ZERO_CHECK_MAX_ATTEMPTS_DEFAULT: u32 = 200;

/// Default bus channel identifier.
pub const BUS_CHANNEL_DEFAULT: u32 = 0;

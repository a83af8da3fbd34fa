//! Signal conditioning: axis normalization and exponential smoothing.
//!
//! Steering gets deadzone suppression with linear rescaling of the
//! remaining span; brake and throttle are plain unipolar clamps. Each
//! channel then runs through a first-order exponential average so the
//! published command never steps abruptly enough for the vehicle's
//! discontinuity fault detector to trip.

use dbw_common::consts::AXIS_MAX;
use dbw_common::types::Channel;

/// Normalize a raw axis sample for the given channel.
///
/// Steering maps to [-1.0, 1.0] with the `deadzone` span around center
/// forced to exactly 0.0 and the remainder rescaled linearly. Brake and
/// throttle map to [0.0, 1.0]; `deadzone` is ignored for them.
pub fn normalize(channel: Channel, raw: i16, deadzone: f64) -> f64 {
    let raw_normalized = f64::from(raw) / AXIS_MAX;
    match channel {
        Channel::Steering => {
            if raw_normalized.abs() < deadzone {
                0.0
            } else {
                // Rescale over the non-deadzone span.
                let rescaled =
                    raw_normalized * (raw_normalized.abs() - deadzone) / (1.0 - deadzone);
                rescaled.clamp(-1.0, 1.0)
            }
        }
        Channel::Brake | Channel::Throttle => raw_normalized.clamp(0.0, 1.0),
    }
}

/// One exponential-average step.
///
/// ```text
/// y[n] = setpoint × factor + y[n-1] × (1 - factor)
/// ```
///
/// Lower factor means more inertia.
#[inline]
pub fn exponential_average(average: f64, setpoint: f64, factor: f64) -> f64 {
    setpoint * factor + (1.0 - factor) * average
}

/// Moving-average state for one channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelFilter {
    average: f64,
    factor: f64,
}

impl ChannelFilter {
    /// New filter with a zeroed average.
    pub const fn new(factor: f64) -> Self {
        Self {
            average: 0.0,
            factor,
        }
    }

    /// Fold one setpoint into the average and return the new average.
    #[inline]
    pub fn apply(&mut self, setpoint: f64) -> f64 {
        self.average = exponential_average(self.average, setpoint, self.factor);
        self.average
    }

    /// Current average.
    #[inline]
    pub const fn average(&self) -> f64 {
        self.average
    }

    /// Reset the average to 0.0.
    #[inline]
    pub fn reset(&mut self) {
        self.average = 0.0;
    }
}

/// The three per-channel filters, owned by the command dispatch.
#[derive(Debug, Clone, Copy)]
pub struct CommandFilters {
    pub brake: ChannelFilter,
    pub throttle: ChannelFilter,
    pub steering: ChannelFilter,
}

impl CommandFilters {
    /// Build filters with the given per-channel factors.
    pub const fn new(brake_factor: f64, throttle_factor: f64, steering_factor: f64) -> Self {
        Self {
            brake: ChannelFilter::new(brake_factor),
            throttle: ChannelFilter::new(throttle_factor),
            steering: ChannelFilter::new(steering_factor),
        }
    }

    /// Reset all three averages to 0.0 (every transition to Disabled).
    pub fn reset_all(&mut self) {
        self.brake.reset();
        self.throttle.reset();
        self.steering.reset();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

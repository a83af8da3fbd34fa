//! Decoded actuator-module report records and the passive telemetry frame.
//!
//! All wire decoding happens upstream in the bus collaborator; these are
//! the fixed-shape records it delivers. The commander only ever reads them.

use serde::{Deserialize, Serialize};

use crate::types::Channel;

/// Which actuator module raised a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultOrigin {
    Brake,
    Steering,
    Throttle,
}

impl FaultOrigin {
    /// The actuation channel this origin corresponds to.
    pub const fn channel(&self) -> Channel {
        match self {
            FaultOrigin::Brake => Channel::Brake,
            FaultOrigin::Steering => Channel::Steering,
            FaultOrigin::Throttle => Channel::Throttle,
        }
    }
}

/// Periodic status report from the brake module.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BrakeReport {
    /// The module detected the driver physically overriding the command.
    pub operator_override: bool,
}

/// Periodic status report from the throttle module.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ThrottleReport {
    /// The module detected the driver physically overriding the command.
    pub operator_override: bool,
}

/// Periodic status report from the steering module.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SteeringReport {
    /// The module detected the driver physically overriding the command.
    pub operator_override: bool,
}

/// Fault report from an actuator module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultReport {
    /// Module that raised the fault.
    pub fault_origin: FaultOrigin,
}

/// Decoded vehicle-bus telemetry, delivered on the side read path.
///
/// Last value wins; carries no safety relevance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// Measured steering wheel angle [deg].
    pub steering_wheel_angle: f64,
    /// Measured brake pressure [bar].
    pub brake_pressure: f64,
}

//! Core enums: actuation channels, monitored buttons, control state.

use serde::{Deserialize, Serialize};

/// An actuation channel commanded over the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Brake position, normalized [0.0, 1.0].
    Brake,
    /// Throttle position, normalized [0.0, 1.0].
    Throttle,
    /// Steering torque request, normalized [-1.0, 1.0] before range scaling.
    Steering,
}

impl Channel {
    /// All channels in dispatch order (brake before throttle before steering).
    pub const ALL: [Channel; 3] = [Channel::Brake, Channel::Throttle, Channel::Steering];
}

/// Role of a monitored controller button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonRole {
    /// Requests engagement of control authority.
    Enable,
    /// Revokes control authority.
    Disable,
}

/// Live control authority state.
///
/// `Disabled` is the only safe default; every process starts here and
/// every override, fault, or disable press returns here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlState {
    /// No actuation commands are published.
    #[default]
    Disabled,
    /// Actuation commands are published every tick.
    Enabled,
}

impl ControlState {
    /// True when actuation may be published.
    #[inline]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, ControlState::Enabled)
    }
}

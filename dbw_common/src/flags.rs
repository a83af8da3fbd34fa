//! Disengage-reason bitflags.
//!
//! Every transition to `ControlState::Disabled` records why, for operator
//! diagnostics. Multiple reasons can accumulate within one tick (e.g. an
//! override report and the disable button in the same cycle).

use bitflags::bitflags;

use crate::reports::FaultOrigin;
use crate::types::Channel;

bitflags! {
    /// Why control authority was revoked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DisengageReason: u16 {
        /// Operator pressed the disable button.
        const OPERATOR_BUTTON   = 0x0001;
        /// Brake module reported an operator override.
        const OVERRIDE_BRAKE    = 0x0002;
        /// Throttle module reported an operator override.
        const OVERRIDE_THROTTLE = 0x0004;
        /// Steering module reported an operator override.
        const OVERRIDE_STEERING = 0x0008;
        /// Brake module fault.
        const FAULT_BRAKE       = 0x0010;
        /// Steering module fault.
        const FAULT_STEERING    = 0x0020;
        /// Throttle module fault.
        const FAULT_THROTTLE    = 0x0040;
        /// Input device disappeared mid-session (policy-dependent).
        const DEVICE_LOST       = 0x0080;
        /// Session teardown.
        const SHUTDOWN          = 0x0100;
        /// A disable request arrived but its report was dropped from the
        /// intake queue; disengaged on the latch alone.
        const REPORT_LOST       = 0x0200;
    }
}

impl Default for DisengageReason {
    fn default() -> Self {
        Self::empty()
    }
}

impl DisengageReason {
    /// Reason flag for an operator override on the given channel.
    pub const fn for_override(channel: Channel) -> Self {
        match channel {
            Channel::Brake => Self::OVERRIDE_BRAKE,
            Channel::Throttle => Self::OVERRIDE_THROTTLE,
            Channel::Steering => Self::OVERRIDE_STEERING,
        }
    }

    /// Reason flag for a module fault with the given origin.
    pub const fn for_fault(origin: FaultOrigin) -> Self {
        match origin {
            FaultOrigin::Brake => Self::FAULT_BRAKE,
            FaultOrigin::Steering => Self::FAULT_STEERING,
            FaultOrigin::Throttle => Self::FAULT_THROTTLE,
        }
    }
}

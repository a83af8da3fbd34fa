//! Enable/disable state machine and button edge detection.
//!
//! The machine is a pure decision table in the style of the rest of the
//! workspace state machines: events in, transition verdict out. Side
//! effects (bus enable/disable, filter resets) belong to the command
//! dispatch, which commits an engagement only after the bus accepted it
//! and always commits a disengagement locally regardless of the bus.

use dbw_common::flags::DisengageReason;
use dbw_common::reports::FaultOrigin;
use dbw_common::types::{Channel, ControlState};

/// Event that can trigger a control state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Rising edge on the enable button this tick.
    EnableEdge,
    /// Rising edge on the disable button this tick.
    DisableEdge,
    /// An actuator module reported an operator override.
    OverrideReported(Channel),
    /// An actuator module reported a fault.
    FaultReported(FaultOrigin),
    /// The input device disappeared (applied only under the
    /// device-loss policy).
    DeviceLost,
}

/// Verdict of a transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Engage: dispatch must get bus acceptance, then [`ControlStateMachine::commit_engaged`].
    Engage,
    /// Disengage for the given reason: dispatch commits locally first,
    /// then tells the bus best-effort.
    Disengage(DisengageReason),
    /// No state change (idempotent no-op success).
    None,
}

/// Owns the live `control_enabled` flag.
#[derive(Debug, Clone, Default)]
pub struct ControlStateMachine {
    state: ControlState,
}

impl ControlStateMachine {
    pub const fn new() -> Self {
        Self {
            state: ControlState::Disabled,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> ControlState {
        self.state
    }

    /// True when actuation may be published.
    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Pure transition decision for an event in the current state.
    ///
    /// Requesting the current state again is a no-op success: override
    /// and fault events keep arriving while already disabled.
    pub fn evaluate(&self, event: ControlEvent) -> Transition {
        use ControlEvent::*;
        match (self.state, event) {
            (ControlState::Disabled, EnableEdge) => Transition::Engage,

            (ControlState::Enabled, DisableEdge) => {
                Transition::Disengage(DisengageReason::OPERATOR_BUTTON)
            }
            (ControlState::Enabled, OverrideReported(channel)) => {
                Transition::Disengage(DisengageReason::for_override(channel))
            }
            (ControlState::Enabled, FaultReported(origin)) => {
                Transition::Disengage(DisengageReason::for_fault(origin))
            }
            (ControlState::Enabled, DeviceLost) => {
                Transition::Disengage(DisengageReason::DEVICE_LOST)
            }

            _ => Transition::None,
        }
    }

    /// Commit `Disabled → Enabled` after the bus accepted the enable.
    #[inline]
    pub fn commit_engaged(&mut self) {
        self.state = ControlState::Enabled;
    }

    /// Force `Disabled`, from any context. Always succeeds.
    #[inline]
    pub fn force_disabled(&mut self) {
        self.state = ControlState::Disabled;
    }
}

// ─── Button Edge Detection ──────────────────────────────────────────

/// Rising-edge detector for one monitored button.
///
/// Fires exactly once when the sample goes not-pressed → pressed; a
/// button held across ticks does not re-fire, and a one-tick bounce
/// preceded by a not-pressed sample still counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdge {
    previous: bool,
}

impl ButtonEdge {
    pub const fn new() -> Self {
        Self { previous: false }
    }

    /// Feed this tick's sample; returns true on a rising edge.
    #[inline]
    pub fn update(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.previous;
        self.previous = pressed;
        rising
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

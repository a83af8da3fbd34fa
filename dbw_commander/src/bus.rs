//! Command bus seam.
//!
//! The transport (channel plumbing, frame encodings, report decoding)
//! lives outside this crate; the commander consumes it through this
//! trait and receives decoded reports via the registered listeners.

use dbw_common::error::BusError;

use crate::reactor::ReactorHandle;
use crate::telemetry::TelemetryStore;

/// Actuator command bus.
pub trait CommandBus {
    /// Open the given bus channel.
    fn open(&mut self, channel: u32) -> Result<(), BusError>;

    /// Close the given bus channel. Infallible; called on every exit path.
    fn close(&mut self, channel: u32);

    /// Register where decoded reports and telemetry frames are delivered.
    ///
    /// The transport invokes the reactor handle from its own notification
    /// thread, possibly concurrently with a tick.
    fn register_listeners(
        &mut self,
        reports: ReactorHandle,
        telemetry: TelemetryStore,
    ) -> Result<(), BusError>;

    /// Request actuator-module engagement.
    fn enable(&mut self) -> Result<(), BusError>;

    /// Request actuator-module disengagement.
    fn disable(&mut self) -> Result<(), BusError>;

    /// Publish a normalized brake position [0.0, 1.0].
    fn publish_brake(&mut self, position: f64) -> Result<(), BusError>;

    /// Publish a normalized throttle position [0.0, 1.0].
    fn publish_throttle(&mut self, position: f64) -> Result<(), BusError>;

    /// Publish a normalized steering torque [-1.0, 1.0].
    fn publish_steering(&mut self, torque: f64) -> Result<(), BusError>;
}

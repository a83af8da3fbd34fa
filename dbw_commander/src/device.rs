//! Input device seam.
//!
//! The real driver (subsystem init, enumeration, raw polling) lives
//! outside this crate; the commander consumes it through this trait.

use dbw_common::error::DeviceError;
use dbw_common::types::{ButtonRole, Channel};

/// Game-controller input source.
///
/// `update` refreshes the device snapshot once per tick; `axis` and
/// `button` read from that snapshot. All reads are fallible: a vanished
/// device surfaces as a [`DeviceError`], never a panic.
pub trait InputDevice {
    /// Initialize the device subsystem and claim a controller.
    fn init(&mut self) -> Result<(), DeviceError>;

    /// Release the device. Infallible; called on every exit path.
    fn close(&mut self);

    /// Refresh the input snapshot for this tick.
    fn update(&mut self) -> Result<(), DeviceError>;

    /// Raw axis sample in the signed 16-bit device range.
    fn axis(&self, channel: Channel) -> Result<i16, DeviceError>;

    /// Whether the button for the given role is currently pressed.
    fn button(&self, role: ButtonRole) -> Result<bool, DeviceError>;
}

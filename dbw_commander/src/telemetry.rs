//! Passive vehicle telemetry store.
//!
//! Side read path for decoded vehicle-bus frames (steering wheel angle,
//! brake pressure). Last value wins; nothing here feeds back into the
//! safety state machine.

use std::sync::{Arc, Mutex};

use tracing::debug;

use dbw_common::reports::TelemetryFrame;

/// Clonable last-value-wins store, written by the bus listener thread
/// and read by whoever wants a snapshot.
#[derive(Clone, Default)]
pub struct TelemetryStore {
    inner: Arc<Mutex<TelemetryFrame>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decoded frame, replacing the previous one.
    pub fn on_vehicle_frame(&self, frame: TelemetryFrame) {
        debug!(
            steering_wheel_angle = frame.steering_wheel_angle,
            brake_pressure = frame.brake_pressure,
            "vehicle telemetry"
        );
        // A poisoned lock only means a panicked writer; keep the last
        // good value readable.
        match self.inner.lock() {
            Ok(mut slot) => *slot = frame,
            Err(poisoned) => *poisoned.into_inner() = frame,
        }
    }

    /// Most recently recorded frame.
    pub fn snapshot(&self) -> TelemetryFrame {
        match self.inner.lock() {
            Ok(slot) => *slot,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

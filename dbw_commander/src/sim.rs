//! In-process simulation backends.
//!
//! A scripted input device and a recording bus, each split into the
//! object the commander owns and a clonable handle for scripting from
//! the outside (set axes, press buttons, inject transport rejections,
//! deliver reports). The binary runs on these when no hardware is
//! attached; the integration tests and benches drive them directly.

use std::sync::{Arc, Mutex, MutexGuard};

use dbw_common::error::{BusError, DeviceError};
use dbw_common::reports::{BrakeReport, FaultReport, SteeringReport, TelemetryFrame, ThrottleReport};
use dbw_common::types::{ButtonRole, Channel};

use crate::bus::CommandBus;
use crate::device::InputDevice;
use crate::reactor::ReactorHandle;
use crate::telemetry::TelemetryStore;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ─── Simulated Input Device ─────────────────────────────────────────

#[derive(Debug, Default)]
struct SimDeviceState {
    brake: i16,
    throttle: i16,
    steering: i16,
    enable_pressed: bool,
    disable_pressed: bool,
    fail_update: bool,
    fail_axis: Option<Channel>,
    initialized: bool,
    updates: u64,
}

/// Scripted input device owned by the commander.
pub struct SimInputDevice {
    state: Arc<Mutex<SimDeviceState>>,
}

/// Scripting handle for a [`SimInputDevice`].
#[derive(Clone)]
pub struct SimDeviceHandle {
    state: Arc<Mutex<SimDeviceState>>,
}

impl SimInputDevice {
    /// Create a device (all axes zero, no buttons pressed) and its handle.
    pub fn new() -> (Self, SimDeviceHandle) {
        let state = Arc::new(Mutex::new(SimDeviceState::default()));
        (
            Self {
                state: state.clone(),
            },
            SimDeviceHandle { state },
        )
    }
}

impl SimDeviceHandle {
    /// Script a raw axis sample.
    pub fn set_axis(&self, channel: Channel, raw: i16) {
        let mut s = lock(&self.state);
        match channel {
            Channel::Brake => s.brake = raw,
            Channel::Throttle => s.throttle = raw,
            Channel::Steering => s.steering = raw,
        }
    }

    /// Script a button level.
    pub fn set_button(&self, role: ButtonRole, pressed: bool) {
        let mut s = lock(&self.state);
        match role {
            ButtonRole::Enable => s.enable_pressed = pressed,
            ButtonRole::Disable => s.disable_pressed = pressed,
        }
    }

    /// Make every subsequent `update` fail (device unplugged).
    pub fn set_fail_update(&self, fail: bool) {
        lock(&self.state).fail_update = fail;
    }

    /// Make reads of one axis fail.
    pub fn set_fail_axis(&self, channel: Option<Channel>) {
        lock(&self.state).fail_axis = channel;
    }

    /// Number of successful `update` calls so far.
    pub fn updates(&self) -> u64 {
        lock(&self.state).updates
    }
}

impl InputDevice for SimInputDevice {
    fn init(&mut self) -> Result<(), DeviceError> {
        lock(&self.state).initialized = true;
        Ok(())
    }

    fn close(&mut self) {
        lock(&self.state).initialized = false;
    }

    fn update(&mut self) -> Result<(), DeviceError> {
        let mut s = lock(&self.state);
        if !s.initialized {
            return Err(DeviceError::UpdateFailed("device not initialized".into()));
        }
        if s.fail_update {
            return Err(DeviceError::UpdateFailed("simulated device loss".into()));
        }
        s.updates += 1;
        Ok(())
    }

    fn axis(&self, channel: Channel) -> Result<i16, DeviceError> {
        let s = lock(&self.state);
        if s.fail_axis == Some(channel) {
            return Err(DeviceError::InputUnavailable(channel));
        }
        Ok(match channel {
            Channel::Brake => s.brake,
            Channel::Throttle => s.throttle,
            Channel::Steering => s.steering,
        })
    }

    fn button(&self, role: ButtonRole) -> Result<bool, DeviceError> {
        let s = lock(&self.state);
        Ok(match role {
            ButtonRole::Enable => s.enable_pressed,
            ButtonRole::Disable => s.disable_pressed,
        })
    }
}

// ─── Simulated Command Bus ──────────────────────────────────────────

/// One command accepted by the simulated transport, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusCommand {
    Enable,
    Disable,
    Brake(f64),
    Throttle(f64),
    Steering(f64),
}

#[derive(Default)]
struct SimBusState {
    log: Vec<BusCommand>,
    open_channel: Option<u32>,
    fail_enable: bool,
    fail_disable: bool,
    fail_publish: Option<Channel>,
    reactor: Option<ReactorHandle>,
    telemetry: Option<TelemetryStore>,
}

/// Recording bus owned by the commander.
pub struct SimBus {
    state: Arc<Mutex<SimBusState>>,
}

/// Scripting/inspection handle for a [`SimBus`].
#[derive(Clone)]
pub struct SimBusHandle {
    state: Arc<Mutex<SimBusState>>,
}

impl SimBus {
    /// Create a bus that accepts everything and its handle.
    pub fn new() -> (Self, SimBusHandle) {
        let state = Arc::new(Mutex::new(SimBusState::default()));
        (
            Self {
                state: state.clone(),
            },
            SimBusHandle { state },
        )
    }
}

impl SimBusHandle {
    /// Everything the transport accepted so far, in order.
    pub fn commands(&self) -> Vec<BusCommand> {
        lock(&self.state).log.clone()
    }

    /// Drop the recorded log (keeps listeners and failure flags).
    pub fn clear_commands(&self) {
        lock(&self.state).log.clear();
    }

    /// Channel currently open, if any.
    pub fn open_channel(&self) -> Option<u32> {
        lock(&self.state).open_channel
    }

    /// Reject subsequent enable requests.
    pub fn set_fail_enable(&self, fail: bool) {
        lock(&self.state).fail_enable = fail;
    }

    /// Reject subsequent disable requests.
    pub fn set_fail_disable(&self, fail: bool) {
        lock(&self.state).fail_disable = fail;
    }

    /// Reject subsequent publishes for one channel.
    pub fn set_fail_publish(&self, channel: Option<Channel>) {
        lock(&self.state).fail_publish = channel;
    }

    fn reactor(&self) -> Option<ReactorHandle> {
        lock(&self.state).reactor.clone()
    }

    /// Deliver a brake report as the transport's notification thread would.
    pub fn deliver_brake_report(&self, report: BrakeReport) {
        if let Some(reactor) = self.reactor() {
            reactor.on_brake_report(&report);
        }
    }

    /// Deliver a throttle report.
    pub fn deliver_throttle_report(&self, report: ThrottleReport) {
        if let Some(reactor) = self.reactor() {
            reactor.on_throttle_report(&report);
        }
    }

    /// Deliver a steering report.
    pub fn deliver_steering_report(&self, report: SteeringReport) {
        if let Some(reactor) = self.reactor() {
            reactor.on_steering_report(&report);
        }
    }

    /// Deliver a fault report.
    pub fn deliver_fault_report(&self, report: FaultReport) {
        if let Some(reactor) = self.reactor() {
            reactor.on_fault_report(&report);
        }
    }

    /// Deliver a decoded vehicle telemetry frame.
    pub fn deliver_vehicle_frame(&self, frame: TelemetryFrame) {
        if let Some(telemetry) = lock(&self.state).telemetry.clone() {
            telemetry.on_vehicle_frame(frame);
        }
    }
}

impl CommandBus for SimBus {
    fn open(&mut self, channel: u32) -> Result<(), BusError> {
        lock(&self.state).open_channel = Some(channel);
        Ok(())
    }

    fn close(&mut self, channel: u32) {
        let mut s = lock(&self.state);
        if s.open_channel == Some(channel) {
            s.open_channel = None;
        }
    }

    fn register_listeners(
        &mut self,
        reports: ReactorHandle,
        telemetry: TelemetryStore,
    ) -> Result<(), BusError> {
        let mut s = lock(&self.state);
        s.reactor = Some(reports);
        s.telemetry = Some(telemetry);
        Ok(())
    }

    fn enable(&mut self) -> Result<(), BusError> {
        let mut s = lock(&self.state);
        if s.fail_enable {
            return Err(BusError::EnableRejected("simulated rejection".into()));
        }
        s.log.push(BusCommand::Enable);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), BusError> {
        let mut s = lock(&self.state);
        if s.fail_disable {
            return Err(BusError::DisableRejected("simulated rejection".into()));
        }
        s.log.push(BusCommand::Disable);
        Ok(())
    }

    fn publish_brake(&mut self, position: f64) -> Result<(), BusError> {
        let mut s = lock(&self.state);
        if s.fail_publish == Some(Channel::Brake) {
            return Err(BusError::PublishRejected {
                channel: Channel::Brake,
                detail: "simulated rejection".into(),
            });
        }
        s.log.push(BusCommand::Brake(position));
        Ok(())
    }

    fn publish_throttle(&mut self, position: f64) -> Result<(), BusError> {
        let mut s = lock(&self.state);
        if s.fail_publish == Some(Channel::Throttle) {
            return Err(BusError::PublishRejected {
                channel: Channel::Throttle,
                detail: "simulated rejection".into(),
            });
        }
        s.log.push(BusCommand::Throttle(position));
        Ok(())
    }

    fn publish_steering(&mut self, torque: f64) -> Result<(), BusError> {
        let mut s = lock(&self.state);
        if s.fail_publish == Some(Channel::Steering) {
            return Err(BusError::PublishRejected {
                channel: Channel::Steering,
                detail: "simulated rejection".into(),
            });
        }
        s.log.push(BusCommand::Steering(torque));
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

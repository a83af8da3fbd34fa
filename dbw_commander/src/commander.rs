//! Command dispatch: the per-tick orchestration and session lifecycle.
//!
//! The [`Commander`] owns every piece of mutable session state (no
//! process-wide statics): the control state machine, button edge
//! detectors, per-channel filters, report reactor, and the device and
//! bus collaborators. An external scheduler calls [`Commander::tick`]
//! at a fixed ~50 ms cadence.
//!
//! ## Tick order
//!
//! 1. Drain queued override/fault reports — a disable concurrent with
//!    anything wins before this tick can publish.
//! 2. Refresh the device snapshot.
//! 3. Disable-button edge, then enable-button edge.
//! 4. Brake, throttle (with brake interlock), steering — publish only
//!    while enabled; the first failure aborts the remainder of the tick
//!    and partial publication is accepted (the caller retries next tick).

use std::time::Duration;

use tracing::{info, warn};

use dbw_common::error::CommanderError;
use dbw_common::flags::DisengageReason;
use dbw_common::types::{ButtonRole, Channel, ControlState};

use crate::bus::CommandBus;
use crate::config::CommanderConfig;
use crate::device::InputDevice;
use crate::filter::{CommandFilters, normalize};
use crate::reactor::{ReactorHandle, ReportEvent, ReportReactor};
use crate::state::{ButtonEdge, ControlEvent, ControlStateMachine, Transition};
use crate::telemetry::TelemetryStore;

/// The joystick command arbiter.
pub struct Commander<D: InputDevice, B: CommandBus> {
    device: D,
    bus: B,
    config: CommanderConfig,

    /// Session flag: set once by `init`, cleared only by `close`.
    session_open: bool,
    machine: ControlStateMachine,
    enable_edge: ButtonEdge,
    disable_edge: ButtonEdge,
    filters: CommandFilters,

    reactor: ReportReactor,
    reactor_handle: ReactorHandle,
    telemetry: TelemetryStore,

    /// Why the last disengagement happened, for diagnostics.
    last_disengage: DisengageReason,
}

impl<D: InputDevice, B: CommandBus> Commander<D, B> {
    /// Build a commander around the given collaborators. No I/O happens
    /// until [`Commander::init`].
    pub fn new(device: D, bus: B, config: CommanderConfig) -> Self {
        let filters = CommandFilters::new(
            config.signals.brake_filter_factor,
            config.signals.throttle_filter_factor,
            config.signals.steering_filter_factor,
        );
        let (reactor, reactor_handle) = ReportReactor::new();
        Self {
            device,
            bus,
            config,
            session_open: false,
            machine: ControlStateMachine::new(),
            enable_edge: ButtonEdge::new(),
            disable_edge: ButtonEdge::new(),
            filters,
            reactor,
            reactor_handle,
            telemetry: TelemetryStore::new(),
            last_disengage: DisengageReason::empty(),
        }
    }

    /// Current control authority state.
    pub const fn control_state(&self) -> ControlState {
        self.machine.state()
    }

    /// Why the last disengagement happened.
    pub const fn last_disengage(&self) -> DisengageReason {
        self.last_disengage
    }

    /// Handle to the passive vehicle telemetry store.
    pub fn telemetry(&self) -> TelemetryStore {
        self.telemetry.clone()
    }

    /// True between a successful `init` and `close`.
    pub const fn is_open(&self) -> bool {
        self.session_open
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Open the session: bus channel, listeners, device, and the
    /// startup trigger zero-check.
    ///
    /// On any failure the device and bus are released before the error
    /// returns, so no resource survives a failed init.
    pub fn init(&mut self) -> Result<(), CommanderError> {
        if self.session_open {
            return Err(CommanderError::AlreadyOpen);
        }
        let channel = self.config.session.bus_channel;

        self.bus.open(channel)?;

        if let Err(e) = self
            .bus
            .register_listeners(self.reactor_handle.clone(), self.telemetry.clone())
        {
            self.bus.close(channel);
            return Err(e.into());
        }

        if let Err(e) = self.device.init() {
            self.bus.close(channel);
            return Err(e.into());
        }

        info!("waiting for joystick triggers to zero");
        if let Err(e) = self.wait_for_zero_triggers() {
            warn!("trigger zero-check failed: {e}");
            self.device.close();
            self.bus.close(channel);
            return Err(e);
        }

        self.session_open = true;
        info!(channel, "commander session open");
        Ok(())
    }

    /// Close the session: force disable, release bus and device.
    /// Idempotent; safe to call on a never-opened commander.
    pub fn close(&mut self) {
        if !self.session_open {
            return;
        }
        if self.machine.is_enabled() {
            if let Err(e) = self.disengage(DisengageReason::SHUTDOWN) {
                warn!("disable on shutdown rejected by bus: {e}");
            }
        }
        // The modules should already be disengaged; tell them once more
        // on teardown regardless.
        if let Err(e) = self.bus.disable() {
            warn!("shutdown disable rejected by bus: {e}");
        }
        self.bus.close(self.config.session.bus_channel);
        self.device.close();
        self.session_open = false;
        info!("commander session closed");
    }

    /// Block until both triggers read exactly zero, polling at the
    /// configured interval, up to the configured retry budget.
    ///
    /// A device failure is fatal here: initialization aborts. Running
    /// this before any actuation is possible guarantees the vehicle
    /// cannot be engaged with inputs already commanding motion.
    fn wait_for_zero_triggers(&mut self) -> Result<(), CommanderError> {
        let deadzone = self.config.signals.steering_deadzone;
        let max_attempts = self.config.zero_check.max_attempts;
        let poll = Duration::from_millis(self.config.zero_check.poll_interval_ms);

        for attempt in 1..=max_attempts {
            self.device.update()?;
            let brake = normalize(Channel::Brake, self.device.axis(Channel::Brake)?, deadzone);
            let throttle = normalize(
                Channel::Throttle,
                self.device.axis(Channel::Throttle)?,
                deadzone,
            );

            if brake == 0.0 && throttle == 0.0 {
                info!(attempt, "joystick triggers zeroed");
                return Ok(());
            }
            if attempt < max_attempts {
                std::thread::sleep(poll);
            }
        }

        Err(CommanderError::TriggersNotZero {
            attempts: max_attempts,
        })
    }

    // ─── Tick ───────────────────────────────────────────────────────

    /// One dispatch cycle. Never blocks beyond the device read; every
    /// failure is recoverable and the scheduler simply calls again next
    /// period.
    pub fn tick(&mut self) -> Result<(), CommanderError> {
        if !self.session_open {
            return Err(CommanderError::NotOpen);
        }

        // Reports first: disable wins every race by the next tick.
        self.drain_reports()?;

        if let Err(e) = self.device.update() {
            if self.config.session.disable_on_device_loss && self.machine.is_enabled() {
                warn!("device lost, policy forces disengage");
                // Local disengage applies even if the bus also errors;
                // the device error is the one the caller sees.
                let _ = self.apply_event(ControlEvent::DeviceLost);
            }
            return Err(e.into());
        }

        let disable_pressed = self.device.button(ButtonRole::Disable)?;
        if self.disable_edge.update(disable_pressed) {
            self.apply_event(ControlEvent::DisableEdge)?;
        }

        let enable_pressed = self.device.button(ButtonRole::Enable)?;
        if self.enable_edge.update(enable_pressed) {
            self.apply_event(ControlEvent::EnableEdge)?;
        }

        self.command_brake()?;
        self.command_throttle()?;
        self.command_steering()?;

        Ok(())
    }

    /// Apply every queued override/fault. All local safety effects are
    /// applied even when the bus rejects the disable; the first bus
    /// error is what the tick returns.
    fn drain_reports(&mut self) -> Result<(), CommanderError> {
        let latched = self.reactor.take_disable_pending();
        let mut first_error: Option<CommanderError> = None;
        let mut saw_event = false;

        while let Some(event) = self.reactor.pop() {
            saw_event = true;
            let control_event = match event {
                ReportEvent::OperatorOverride(channel) => {
                    warn!(?channel, "operator override reported");
                    ControlEvent::OverrideReported(channel)
                }
                ReportEvent::ModuleFault(origin) => {
                    warn!(?origin, "actuator module fault reported");
                    ControlEvent::FaultReported(origin)
                }
            };
            if let Err(e) = self.apply_event(control_event) {
                first_error.get_or_insert(e);
            }
        }

        // Latch set but no event survived the queue: disengage anyway.
        if latched && !saw_event && self.machine.is_enabled() {
            warn!("disable latch set with empty report queue");
            if let Err(e) = self.disengage(DisengageReason::REPORT_LOST) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run one event through the state machine and perform its side
    /// effects.
    fn apply_event(&mut self, event: ControlEvent) -> Result<(), CommanderError> {
        match self.machine.evaluate(event) {
            Transition::Engage => self.engage(),
            Transition::Disengage(reason) => self.disengage(reason),
            Transition::None => Ok(()),
        }
    }

    /// `Disabled → Enabled`. The bus must accept first; on rejection the
    /// state stays Disabled and the error propagates.
    fn engage(&mut self) -> Result<(), CommanderError> {
        self.bus.enable()?;
        self.machine.commit_engaged();
        info!("controls enabled");
        Ok(())
    }

    /// `Enabled → Disabled`. Local state transitions and filters reset
    /// unconditionally; a bus rejection is reported but never rolls the
    /// local disable back.
    fn disengage(&mut self, reason: DisengageReason) -> Result<(), CommanderError> {
        self.machine.force_disabled();
        self.filters.reset_all();
        self.last_disengage = reason;
        warn!(?reason, "controls disabled");
        self.bus.disable()?;
        Ok(())
    }

    // ─── Per-Channel Commands ───────────────────────────────────────

    fn command_brake(&mut self) -> Result<(), CommanderError> {
        if !self.machine.is_enabled() {
            self.filters.brake.reset();
            return Ok(());
        }
        let deadzone = self.config.signals.steering_deadzone;
        let position = normalize(Channel::Brake, self.device.axis(Channel::Brake)?, deadzone);
        let average = self.filters.brake.apply(position);
        self.bus.publish_brake(average)?;
        Ok(())
    }

    fn command_throttle(&mut self) -> Result<(), CommanderError> {
        if !self.machine.is_enabled() {
            self.filters.throttle.reset();
            return Ok(());
        }
        let deadzone = self.config.signals.steering_deadzone;
        let mut setpoint = normalize(
            Channel::Throttle,
            self.device.axis(Channel::Throttle)?,
            deadzone,
        );

        // Brake and throttle are mutually exclusive once the brake
        // crosses the engagement threshold.
        let brake = normalize(Channel::Brake, self.device.axis(Channel::Brake)?, deadzone);
        if brake >= self.config.signals.brake_engaged_min {
            setpoint = 0.0;
        }

        let average = self.filters.throttle.apply(setpoint);
        self.bus.publish_throttle(average)?;
        Ok(())
    }

    fn command_steering(&mut self) -> Result<(), CommanderError> {
        if !self.machine.is_enabled() {
            self.filters.steering.reset();
            return Ok(());
        }
        let signals = &self.config.signals;
        let position = normalize(
            Channel::Steering,
            self.device.axis(Channel::Steering)?,
            signals.steering_deadzone,
        );
        let average = self.filters.steering.apply(position);
        // Only a slice of the mechanical range is exposed, bounding the
        // maximum commanded torque.
        self.bus
            .publish_steering(average * signals.steering_range_scale)?;
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

mod engagement;
mod override_fault;

use dbw_commander::commander::Commander;
use dbw_commander::config::CommanderConfig;
use dbw_commander::sim::{SimBus, SimBusHandle, SimDeviceHandle, SimInputDevice};
use dbw_common::types::ButtonRole;

/// Commander over sim backends with a fast zero-check, not yet opened.
pub fn sim_commander() -> (
    Commander<SimInputDevice, SimBus>,
    SimDeviceHandle,
    SimBusHandle,
) {
    let mut config = CommanderConfig::default();
    config.zero_check.poll_interval_ms = 1;
    config.zero_check.max_attempts = 3;

    let (device, device_handle) = SimInputDevice::new();
    let (bus, bus_handle) = SimBus::new();
    (
        Commander::new(device, bus, config),
        device_handle,
        bus_handle,
    )
}

/// Init the session and engage controls with one enable press.
pub fn engaged_commander() -> (
    Commander<SimInputDevice, SimBus>,
    SimDeviceHandle,
    SimBusHandle,
) {
    let (mut commander, device, bus) = sim_commander();
    commander.init().unwrap();
    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();
    device.set_button(ButtonRole::Enable, false);
    bus.clear_commands();
    (commander, device, bus)
}

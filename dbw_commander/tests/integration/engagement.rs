//! Engagement lifecycle: zero-check, enable/disable edges, publish values.

use dbw_common::consts::AXIS_MAX;
use dbw_common::error::CommanderError;
use dbw_common::types::{ButtonRole, Channel, ControlState};

use dbw_commander::sim::BusCommand;

use super::{engaged_commander, sim_commander};

#[test]
fn zero_check_succeeds_on_first_poll_with_zeroed_triggers() {
    let (mut commander, device, _bus) = sim_commander();
    commander.init().unwrap();
    assert_eq!(device.updates(), 1);
}

#[test]
fn zero_check_never_succeeds_with_throttle_held() {
    let (mut commander, device, _bus) = sim_commander();
    device.set_axis(Channel::Throttle, 5000);
    let err = commander.init().unwrap_err();
    assert_eq!(err, CommanderError::TriggersNotZero { attempts: 3 });
}

#[test]
fn nothing_published_while_disabled() {
    let (mut commander, device, bus) = sim_commander();
    commander.init().unwrap();

    device.set_axis(Channel::Throttle, 20000);
    device.set_axis(Channel::Steering, 25000);
    for _ in 0..5 {
        commander.tick().unwrap();
    }
    assert!(bus.commands().is_empty());
}

#[test]
fn enable_edge_engages_and_publishes_all_three_channels() {
    let (mut commander, device, bus) = sim_commander();
    commander.init().unwrap();

    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();

    assert_eq!(commander.control_state(), ControlState::Enabled);
    let commands = bus.commands();
    assert_eq!(
        commands,
        vec![
            BusCommand::Enable,
            BusCommand::Brake(0.0),
            BusCommand::Throttle(0.0),
            BusCommand::Steering(0.0),
        ]
    );
}

#[test]
fn enable_held_across_three_ticks_engages_exactly_once() {
    let (mut commander, device, bus) = sim_commander();
    commander.init().unwrap();

    device.set_button(ButtonRole::Enable, true);
    for _ in 0..3 {
        commander.tick().unwrap();
    }
    let enables = bus
        .commands()
        .iter()
        .filter(|c| **c == BusCommand::Enable)
        .count();
    assert_eq!(enables, 1);
}

#[test]
fn bus_rejected_enable_leaves_state_disabled() {
    let (mut commander, device, bus) = sim_commander();
    commander.init().unwrap();

    bus.set_fail_enable(true);
    device.set_button(ButtonRole::Enable, true);
    let err = commander.tick().unwrap_err();
    assert!(matches!(err, CommanderError::Bus(_)));
    assert_eq!(commander.control_state(), ControlState::Disabled);
    assert!(bus.commands().is_empty());

    // A fresh edge after the transport recovers engages normally.
    bus.set_fail_enable(false);
    device.set_button(ButtonRole::Enable, false);
    commander.tick().unwrap();
    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();
    assert_eq!(commander.control_state(), ControlState::Enabled);
}

#[test]
fn first_tick_throttle_matches_one_smoothing_step() {
    let (mut commander, device, bus) = engaged_commander();

    device.set_axis(Channel::Throttle, 16000);
    commander.tick().unwrap();

    let expected = (16000.0 / AXIS_MAX) * 0.2; // ≈ 0.098
    let throttle = bus.commands().iter().find_map(|c| match c {
        BusCommand::Throttle(v) => Some(*v),
        _ => None,
    });
    let throttle = throttle.expect("throttle published");
    assert!((throttle - expected).abs() < 1e-12);
    assert!((throttle - 0.098).abs() < 2e-3);
}

#[test]
fn first_tick_steering_applies_deadzone_smoothing_and_range_scale() {
    let (mut commander, device, bus) = engaged_commander();

    // Raw ≈ 0.5 normalized: deadzone rescale → ≈0.143, one smoothing
    // step (factor 0.1) → ≈0.0143, range scale 0.2 → ≈0.00286.
    let raw = (0.5 * AXIS_MAX).round() as i16;
    device.set_axis(Channel::Steering, raw);
    commander.tick().unwrap();

    let torque = bus
        .commands()
        .iter()
        .find_map(|c| match c {
            BusCommand::Steering(v) => Some(*v),
            _ => None,
        })
        .expect("steering published");
    assert!((torque - 0.00286).abs() < 1e-4, "torque={torque}");
}

#[test]
fn disable_edge_disengages_and_stops_publishing() {
    let (mut commander, device, bus) = engaged_commander();

    device.set_axis(Channel::Throttle, 16000);
    commander.tick().unwrap();

    device.set_button(ButtonRole::Disable, true);
    commander.tick().unwrap();
    assert_eq!(commander.control_state(), ControlState::Disabled);
    assert!(bus.commands().contains(&BusCommand::Disable));

    bus.clear_commands();
    for _ in 0..3 {
        commander.tick().unwrap();
    }
    assert!(bus.commands().is_empty());
}

#[test]
fn filters_restart_from_zero_after_reengagement() {
    let (mut commander, device, bus) = engaged_commander();

    // Build up a throttle average, then disengage.
    device.set_axis(Channel::Throttle, 16000);
    for _ in 0..4 {
        commander.tick().unwrap();
    }
    device.set_button(ButtonRole::Disable, true);
    commander.tick().unwrap();
    device.set_button(ButtonRole::Disable, false);
    commander.tick().unwrap();

    // Re-engage with the throttle still held: the first published value
    // must restart from a zeroed average, not the old one.
    bus.clear_commands();
    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();

    let expected = (16000.0 / AXIS_MAX) * 0.2;
    let throttle = bus
        .commands()
        .iter()
        .find_map(|c| match c {
            BusCommand::Throttle(v) => Some(*v),
            _ => None,
        })
        .expect("throttle published");
    assert!((throttle - expected).abs() < 1e-12);
}

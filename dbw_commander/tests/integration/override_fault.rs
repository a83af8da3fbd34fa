//! Asynchronous override/fault reports and the passive telemetry path.

use std::thread;

use dbw_common::consts::AXIS_MAX;
use dbw_common::error::{BusError, CommanderError};
use dbw_common::flags::DisengageReason;
use dbw_common::reports::{
    BrakeReport, FaultOrigin, FaultReport, SteeringReport, TelemetryFrame, ThrottleReport,
};
use dbw_common::types::{ButtonRole, Channel, ControlState};

use dbw_commander::sim::BusCommand;

use super::{engaged_commander, sim_commander};

#[test]
fn brake_override_disables_by_next_tick() {
    let (mut commander, device, bus) = engaged_commander();
    device.set_axis(Channel::Throttle, 16000);

    bus.deliver_brake_report(BrakeReport {
        operator_override: true,
    });
    commander.tick().unwrap();

    assert_eq!(commander.control_state(), ControlState::Disabled);
    assert_eq!(commander.last_disengage(), DisengageReason::OVERRIDE_BRAKE);
    let commands = bus.commands();
    assert_eq!(commands, vec![BusCommand::Disable]);
}

#[test]
fn override_reports_without_the_flag_are_ignored() {
    let (mut commander, _device, bus) = engaged_commander();

    bus.deliver_throttle_report(ThrottleReport {
        operator_override: false,
    });
    bus.deliver_steering_report(SteeringReport {
        operator_override: false,
    });
    commander.tick().unwrap();

    assert_eq!(commander.control_state(), ControlState::Enabled);
    assert!(!bus.commands().contains(&BusCommand::Disable));
}

#[test]
fn every_fault_origin_disables() {
    for origin in [FaultOrigin::Brake, FaultOrigin::Steering, FaultOrigin::Throttle] {
        let (mut commander, _device, bus) = engaged_commander();
        bus.deliver_fault_report(FaultReport {
            fault_origin: origin,
        });
        commander.tick().unwrap();
        assert_eq!(commander.control_state(), ControlState::Disabled);
        assert_eq!(commander.last_disengage(), DisengageReason::for_fault(origin));
        assert!(bus.commands().contains(&BusCommand::Disable));
    }
}

#[test]
fn reports_while_disabled_are_noops() {
    let (mut commander, _device, bus) = sim_commander();
    commander.init().unwrap();

    bus.deliver_steering_report(SteeringReport {
        operator_override: true,
    });
    bus.deliver_fault_report(FaultReport {
        fault_origin: FaultOrigin::Brake,
    });
    commander.tick().unwrap();

    assert_eq!(commander.control_state(), ControlState::Disabled);
    assert!(bus.commands().is_empty());
}

#[test]
fn repeated_faults_send_exactly_one_disable() {
    let (mut commander, _device, bus) = engaged_commander();

    for _ in 0..3 {
        bus.deliver_fault_report(FaultReport {
            fault_origin: FaultOrigin::Steering,
        });
    }
    commander.tick().unwrap();

    let disables = bus
        .commands()
        .iter()
        .filter(|c| **c == BusCommand::Disable)
        .count();
    assert_eq!(disables, 1);
}

#[test]
fn override_resets_filters_for_the_next_engagement() {
    let (mut commander, device, bus) = engaged_commander();

    device.set_axis(Channel::Throttle, 16000);
    for _ in 0..4 {
        commander.tick().unwrap();
    }
    bus.deliver_throttle_report(ThrottleReport {
        operator_override: true,
    });
    commander.tick().unwrap();
    assert_eq!(commander.last_disengage(), DisengageReason::OVERRIDE_THROTTLE);

    bus.clear_commands();
    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();

    // First value after re-engagement restarts from a zeroed average.
    let throttle = bus
        .commands()
        .iter()
        .find_map(|c| match c {
            BusCommand::Throttle(v) => Some(*v),
            _ => None,
        })
        .expect("throttle published");
    assert!((throttle - (16000.0 / AXIS_MAX) * 0.2).abs() < 1e-12);
}

#[test]
fn reengagement_after_fault_requires_a_fresh_enable_edge() {
    let (mut commander, device, bus) = engaged_commander();

    // Hold the enable button through the fault.
    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();
    bus.deliver_fault_report(FaultReport {
        fault_origin: FaultOrigin::Throttle,
    });
    commander.tick().unwrap();
    assert_eq!(commander.control_state(), ControlState::Disabled);

    // Still held: no edge, stays disabled.
    for _ in 0..3 {
        commander.tick().unwrap();
    }
    assert_eq!(commander.control_state(), ControlState::Disabled);

    // Release and press again.
    device.set_button(ButtonRole::Enable, false);
    commander.tick().unwrap();
    device.set_button(ButtonRole::Enable, true);
    commander.tick().unwrap();
    assert_eq!(commander.control_state(), ControlState::Enabled);
}

#[test]
fn report_from_another_thread_disables_by_next_tick() {
    let (mut commander, _device, bus) = engaged_commander();

    let notifier = bus.clone();
    let delivery = thread::spawn(move || {
        notifier.deliver_brake_report(BrakeReport {
            operator_override: true,
        });
    });
    delivery.join().unwrap();

    commander.tick().unwrap();
    assert_eq!(commander.control_state(), ControlState::Disabled);
}

#[test]
fn bus_rejected_disable_still_disables_locally() {
    let (mut commander, _device, bus) = engaged_commander();

    bus.set_fail_disable(true);
    bus.deliver_fault_report(FaultReport {
        fault_origin: FaultOrigin::Brake,
    });
    let err = commander.tick().unwrap_err();
    assert!(matches!(
        err,
        CommanderError::Bus(BusError::DisableRejected(_))
    ));
    // Fail toward safety: local authority is gone regardless.
    assert_eq!(commander.control_state(), ControlState::Disabled);
    assert_eq!(commander.last_disengage(), DisengageReason::FAULT_BRAKE);

    bus.set_fail_disable(false);
    commander.tick().unwrap();
    assert!(bus.commands().is_empty());
}

#[test]
fn vehicle_frames_update_the_telemetry_snapshot() {
    let (mut commander, _device, bus) = engaged_commander();

    bus.deliver_vehicle_frame(TelemetryFrame {
        steering_wheel_angle: 12.5,
        brake_pressure: 3.2,
    });
    commander.tick().unwrap();

    let snapshot = commander.telemetry().snapshot();
    assert_eq!(
        snapshot,
        TelemetryFrame {
            steering_wheel_angle: 12.5,
            brake_pressure: 3.2,
        }
    );
    // Telemetry is a read path only; control authority is untouched.
    assert_eq!(commander.control_state(), ControlState::Enabled);
}

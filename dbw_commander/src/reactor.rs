//! Inbound report intake: bounded lock-free queue + disable latch.
//!
//! Bus report callbacks run on the transport's notification thread and
//! may interleave anywhere relative to a tick. They never touch session
//! state. Each override/fault enqueues a [`ReportEvent`] on a fixed-size
//! MPMC queue and sets an atomic latch; the tick drains both before doing
//! anything else. The latch, not the queue, is what guarantees "disable
//! wins": even if the queue overflows and an event is dropped, the latch
//! still forces a disengage on the very next tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use heapless::mpmc::MpMcQueue;
use tracing::warn;

use dbw_common::reports::{
    BrakeReport, FaultOrigin, FaultReport, SteeringReport, ThrottleReport,
};
use dbw_common::types::Channel;

/// Queue capacity [events]; power of two, sized for one tick's worth of
/// reports from all three modules with headroom.
const REPORT_QUEUE_CAPACITY: usize = 16;

/// One safety-relevant event delivered by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportEvent {
    /// A module saw the driver physically overriding the command.
    OperatorOverride(Channel),
    /// A module reported an internal fault.
    ModuleFault(FaultOrigin),
}

struct ReactorShared {
    queue: MpMcQueue<ReportEvent, REPORT_QUEUE_CAPACITY>,
    disable_pending: AtomicBool,
}

/// Clonable handle given to the bus for report delivery.
#[derive(Clone)]
pub struct ReactorHandle {
    shared: Arc<ReactorShared>,
}

/// Tick-side consumer owned by the commander.
pub struct ReportReactor {
    shared: Arc<ReactorShared>,
}

impl ReportReactor {
    /// Create the reactor and its delivery handle.
    pub fn new() -> (Self, ReactorHandle) {
        let shared = Arc::new(ReactorShared {
            queue: MpMcQueue::new(),
            disable_pending: AtomicBool::new(false),
        });
        (
            Self {
                shared: shared.clone(),
            },
            ReactorHandle { shared },
        )
    }

    /// Take and clear the disable latch.
    ///
    /// Returns true if any override/fault arrived since the last tick,
    /// whether or not its event survived the queue.
    #[inline]
    pub fn take_disable_pending(&self) -> bool {
        self.shared.disable_pending.swap(false, Ordering::AcqRel)
    }

    /// Pop the next queued event, oldest first.
    #[inline]
    pub fn pop(&self) -> Option<ReportEvent> {
        self.shared.queue.dequeue()
    }
}

impl ReactorHandle {
    fn push(&self, event: ReportEvent) {
        // Latch first: the disable must win even if the event is dropped.
        self.shared.disable_pending.store(true, Ordering::Release);
        if self.shared.queue.enqueue(event).is_err() {
            warn!(?event, "report queue full, event dropped (latch still set)");
        }
    }

    /// Brake module report; acts only on an operator override.
    pub fn on_brake_report(&self, report: &BrakeReport) {
        if report.operator_override {
            self.push(ReportEvent::OperatorOverride(Channel::Brake));
        }
    }

    /// Throttle module report; acts only on an operator override.
    pub fn on_throttle_report(&self, report: &ThrottleReport) {
        if report.operator_override {
            self.push(ReportEvent::OperatorOverride(Channel::Throttle));
        }
    }

    /// Steering module report; acts only on an operator override.
    pub fn on_steering_report(&self, report: &SteeringReport) {
        if report.operator_override {
            self.push(ReportEvent::OperatorOverride(Channel::Steering));
        }
    }

    /// Fault report; always queued, regardless of any override flag.
    pub fn on_fault_report(&self, report: &FaultReport) {
        self.push(ReportEvent::ModuleFault(report.fault_origin));
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! # DBW Joystick Commander
//!
//! Converts game-controller axis/button state into safety-governed
//! actuation commands (throttle, brake, steering) published to vehicle
//! actuator modules, and revokes control authority the moment an
//! operator override or module fault is reported.
//!
//! ## Architecture
//!
//! ```text
//! InputDevice ──► filter ──► Commander::tick ──► CommandBus publish
//!                               ▲
//! bus reports ──► reactor ──────┘ (drained at tick start; disable wins)
//! ```
//!
//! The [`commander::Commander`] owns all mutable session state and is
//! driven by an external scheduler at a fixed ~50 ms cadence. Bus report
//! callbacks only enqueue events; they never mutate session state
//! directly, so the tick thread is the single writer.

pub mod bus;
pub mod commander;
pub mod config;
pub mod device;
pub mod filter;
pub mod reactor;
pub mod sim;
pub mod state;
pub mod telemetry;

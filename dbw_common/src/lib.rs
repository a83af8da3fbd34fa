//! # DBW Common Library
//!
//! Shared vocabulary of the drive-by-wire joystick commander workspace:
//! actuation channels and control state, decoded actuator-module report
//! records, disengage-reason flags, the error taxonomy, and the named
//! constants that configuration defaults and validation bounds refer to.
//!
//! Nothing in this crate performs I/O; the commander crate owns all
//! device and bus interaction.

pub mod consts;
pub mod error;
pub mod flags;
pub mod reports;
pub mod types;

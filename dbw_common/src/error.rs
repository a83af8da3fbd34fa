//! Error taxonomy for the commander.
//!
//! Three recoverable kinds: the input device failed, the bus transport
//! rejected an operation, or an axis/button read was unavailable (folded
//! into [`DeviceError`]). None of these abort the process; every commander
//! operation returns a `Result` and the external scheduler decides whether
//! repeated failures end the session. The only condition that prevents
//! entering the control loop at all is a failed initialization.

use thiserror::Error;

use crate::types::{ButtonRole, Channel};

/// Input device driver failures. Recoverable: the caller retries next tick.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Device subsystem could not be initialized.
    #[error("input device init failed: {0}")]
    InitFailed(String),

    /// Device state refresh failed (device disconnected or gone).
    #[error("input device update failed: {0}")]
    UpdateFailed(String),

    /// An axis sample could not be read.
    #[error("axis {0:?} unavailable")]
    InputUnavailable(Channel),

    /// A button sample could not be read.
    #[error("button {0:?} unavailable")]
    ButtonUnavailable(ButtonRole),
}

/// Command bus transport failures. Recoverable: the caller retries next tick.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Channel open was rejected.
    #[error("bus channel {channel} open failed: {detail}")]
    OpenFailed { channel: u32, detail: String },

    /// Enable request rejected by the transport.
    #[error("bus enable rejected: {0}")]
    EnableRejected(String),

    /// Disable request rejected by the transport.
    #[error("bus disable rejected: {0}")]
    DisableRejected(String),

    /// A publish was rejected by the transport.
    #[error("bus publish for {channel:?} rejected: {detail}")]
    PublishRejected { channel: Channel, detail: String },

    /// Listener registration failed.
    #[error("bus listener registration failed: {0}")]
    SubscribeFailed(String),
}

/// Top-level commander error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommanderError {
    /// Input device failure (includes unavailable axis/button reads).
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Bus transport failure.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The zero-check retry budget ran out with a trigger still pressed.
    #[error("triggers not zero after {attempts} polls")]
    TriggersNotZero { attempts: u32 },

    /// `init` called on an already-open session.
    #[error("commander session already open")]
    AlreadyOpen,

    /// Operation requires an open session.
    #[error("commander session not open")]
    NotOpen,
}

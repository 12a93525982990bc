//! Domain errors for the encounter controller.

use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`SwitchDevice`](crate::domain::ports::SwitchDevice)
/// implementation or by the timeout guard wrapped around it.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device operation '{operation}' timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Device disconnected: {0}")]
    Disconnected(String),

    #[error("Device rejected command '{command}': {reason}")]
    CommandRejected { command: String, reason: String },

    #[error("Device I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Failures raised while persisting an encounter snapshot.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Failed to write encounter dump to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump folder is not configured")]
    MissingFolder,
}

/// Errors that unwind an encounter session.
///
/// `Cancelled` is not a failure: it is how cooperative cancellation travels
/// up through `?` until [`EncounterBot::run_session`] turns it into
/// [`SessionOutcome::Cancelled`].
///
/// [`EncounterBot::run_session`]: crate::application::EncounterBot::run_session
/// [`SessionOutcome::Cancelled`]: crate::domain::models::SessionOutcome::Cancelled
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session cancelled")]
    Cancelled,

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Invalid stop conditions: {0}")]
    InvalidStopConditions(String),

    #[error("Another session is already driving this device")]
    Busy,
}

impl SessionError {
    /// Whether this error is the cooperative cancellation signal.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

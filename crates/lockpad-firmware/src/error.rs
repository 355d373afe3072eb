//! Error type for the lock control logic.

use lockpad_hardware::HardwareError;
use thiserror::Error;

/// Errors raised while running the lock.
///
/// Only [`LockError::Hardware`] can surface from a running lock: wrong codes,
/// a full store and an emptied store are all handled inside the flows.
#[derive(Debug, Error)]
pub enum LockError {
    /// A peripheral failed. Fatal: the lock halts.
    #[error("Hardware fault: {0}")]
    Hardware(#[from] HardwareError),

    /// Domain rule violated (invalid capacity, store full, bad transition).
    #[error(transparent)]
    Core(#[from] lockpad_core::Error),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LockError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` for peripheral failures.
    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::Hardware(_))
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

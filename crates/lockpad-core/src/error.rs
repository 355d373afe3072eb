use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Input errors
    #[error("Invalid keypad symbol: {0:?}")]
    InvalidSymbol(char),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    // Store errors
    #[error("Passcode store full ({capacity} codes)")]
    StoreFull { capacity: usize },

    #[error("Invalid store capacity: {0}")]
    InvalidCapacity(usize),

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

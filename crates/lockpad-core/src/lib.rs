//! Core types for the lockpad combination lock.
//!
//! Keypad symbols, 4-symbol codes, shared constants and the core error type.
//! Every other lockpad crate builds on these.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

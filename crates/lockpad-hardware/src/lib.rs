//! Hardware abstraction layer for the lockpad combination lock.
//!
//! This crate defines the three peripherals the lock's control logic talks
//! to, plus drivers and mocks for each:
//!
//! | Concern | Trait | Driver | Mock |
//! |---|---|---|---|
//! | 4×4 keypad | [`KeypadDevice`] | [`MatrixKeypad`] | [`MockKeypad`](mock::MockKeypad) |
//! | Character LCD | [`DisplayDevice`] | (board specific) | [`VirtualDisplay`] |
//! | LEDs, buzzer, delays | [`FeedbackDevice`] | [`GpioFeedback`] | [`MockFeedback`](mock::MockFeedback) |
//!
//! The drivers are generic over the digital [`pins`] traits, so they run on
//! any HAL that can provide an output and an input pin.
//!
//! # Design Philosophy
//!
//! - **Async-first**: all device operations are native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT). Keypad reads wait indefinitely.
//! - **Generic, not dynamic**: the traits are not object-safe; consumers
//!   take type parameters.
//! - **Error-aware**: every operation returns [`Result<T>`][error::Result]
//!   with a [`HardwareError`]. The lock treats any of these as fatal.
//!
//! # Example
//!
//! ```
//! use lockpad_hardware::mock::MockKeypad;
//! use lockpad_hardware::{DisplayDevice, KeypadDevice, VirtualDisplay};
//!
//! #[tokio::main]
//! async fn main() -> lockpad_hardware::Result<()> {
//!     let mut keypad = MockKeypad::scripted("7")?;
//!     let mut display = VirtualDisplay::new();
//!
//!     let symbol = keypad.read_symbol().await?;
//!     display.write_char(symbol.to_char()).await?;
//!
//!     assert_eq!(display.text(0), "7");
//!     Ok(())
//! }
//! ```

pub mod display;
pub mod error;
pub mod feedback;
pub mod matrix;
pub mod mock;
pub mod pins;
pub mod traits;
pub mod types;

pub use display::VirtualDisplay;
pub use error::{HardwareError, Result};
pub use feedback::GpioFeedback;
pub use matrix::MatrixKeypad;
pub use traits::{DisplayDevice, FeedbackDevice, KeypadDevice};
pub use types::{DisplayInstruction, FeedbackEvent, LedState};

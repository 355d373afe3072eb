//! Mock device implementations for testing and development.
//!
//! These devices are controlled programmatically, so every lock flow can be
//! driven and observed without physical hardware. The matching display mock
//! is [`VirtualDisplay`](crate::display::VirtualDisplay), which is also what
//! the terminal simulator renders.

pub mod feedback;
pub mod keypad;
pub mod pin;

pub use feedback::MockFeedback;
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use pin::MockPin;

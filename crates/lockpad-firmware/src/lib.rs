//! Control logic for the lockpad combination lock.
//!
//! The lock prompts for a 4-symbol code on a character LCD, opens for a
//! counted-down interval when the code is stored, sounds an alarm when it is
//! not, and opens an admin menu for the admin code. Everything here talks to
//! the hardware through the `lockpad_hardware` device traits, so the same
//! flows run on a board and in tests.
//!
//! # Modules
//!
//! - [`store`]: bounded passcode store and removal marks
//! - [`entry`]: the masked 4-symbol line editor
//! - [`menu`]: the admin menu (view, add, remove, clear)
//! - [`state_machine`]: cycle states and transition history
//! - [`controller`]: boot and the lock cycle
//! - [`config`]: JSON-loadable configuration
//!
//! # Example
//!
//! ```
//! use lockpad_firmware::{LockConfig, LockController, Peripherals};
//! use lockpad_hardware::mock::{MockFeedback, MockKeypad};
//! use lockpad_hardware::VirtualDisplay;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let keypad = MockKeypad::scripted("1234A 9999A")?;
//!     let io = Peripherals::new(keypad, VirtualDisplay::new(), MockFeedback::new());
//!
//!     let mut lock = LockController::boot(io, LockConfig::default()).await?;
//!     lock.run_cycle().await?;
//!
//!     assert_eq!(lock.peripherals().display.text(0), "INVALID CODE");
//!     assert_eq!(lock.unlock_count(), 0);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod menu;
pub mod peripherals;
pub mod state_machine;
pub mod store;

pub use config::{LockConfig, Timings};
pub use controller::{CycleOutcome, LockController};
pub use entry::{CodeEntry, EntryMode};
pub use error::{LockError, Result};
pub use menu::{AdminMenu, MenuOption};
pub use peripherals::Peripherals;
pub use state_machine::{LockState, StateMachine, StateTransition};
pub use store::{CheckResult, PasscodeStore, RemovalMarks, RemovalSummary};

//! The set of devices a lock runs on.

use std::time::Duration;

use lockpad_core::Symbol;
use lockpad_hardware::Result;
use lockpad_hardware::traits::{DisplayDevice, FeedbackDevice, KeypadDevice};

/// Keypad, display and feedback devices, owned together.
///
/// Fields are public: flows borrow the device they need for each step, and
/// tests reach in to inspect the display or feed the keypad.
#[derive(Debug)]
pub struct Peripherals<K, D, F> {
    pub keypad: K,
    pub display: D,
    pub feedback: F,
}

impl<K, D, F> Peripherals<K, D, F>
where
    K: KeypadDevice,
    D: DisplayDevice,
    F: FeedbackDevice,
{
    pub fn new(keypad: K, display: D, feedback: F) -> Self {
        Self {
            keypad,
            display,
            feedback,
        }
    }

    /// Clear the screen, show two lines, and hold them for `hold`.
    pub(crate) async fn notice(&mut self, line1: &str, line2: &str, hold: Duration) -> Result<()> {
        self.display.show(line1, line2).await?;
        self.feedback.delay(hold).await
    }

    /// Show a yes/no question and wait for `A` (yes) or `B` (no).
    ///
    /// Every other key is ignored.
    pub(crate) async fn confirm(&mut self, question: &str) -> Result<bool> {
        self.display.show(question, "A=YES B=NO").await?;
        loop {
            match self.keypad.read_symbol().await? {
                Symbol::A => return Ok(true),
                Symbol::B => return Ok(false),
                _ => {}
            }
        }
    }
}

//! Mock keypad implementation for testing and development.
//!
//! Key presses are fed through a channel, either live from a
//! [`MockKeypadHandle`] or from a script given up front. Once the channel is
//! drained and every handle is gone the keypad reports itself disconnected,
//! which is how tests end a flow that would otherwise wait forever.

use lockpad_core::Symbol;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::{HardwareError, Result};
use crate::traits::KeypadDevice;

/// Mock keypad device for testing and development.
///
/// # Examples
///
/// ```
/// use lockpad_core::Symbol;
/// use lockpad_hardware::mock::MockKeypad;
/// use lockpad_hardware::traits::KeypadDevice;
///
/// #[tokio::main]
/// async fn main() -> lockpad_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.send_keys("12D")?;
///
///     assert_eq!(keypad.read_symbol().await?, Symbol::Digit(1));
///     assert_eq!(keypad.read_symbol().await?, Symbol::Digit(2));
///     assert_eq!(keypad.read_symbol().await?, Symbol::D);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    input_rx: mpsc::UnboundedReceiver<Symbol>,
    presses: usize,
}

impl MockKeypad {
    /// Create a keypad and the handle that feeds it.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let keypad = Self {
            input_rx,
            presses: 0,
        };
        (keypad, MockKeypadHandle { input_tx })
    }

    /// Create a keypad preloaded with `keys`, with no live handle.
    ///
    /// Whitespace in `keys` is ignored, so scripts can be grouped for
    /// readability (`"1234A 5678A"`). After the last key, reads fail with
    /// [`HardwareError::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns an error if `keys` contains a character that is not a keypad
    /// symbol.
    pub fn scripted(keys: &str) -> Result<Self> {
        let (keypad, handle) = Self::new();
        handle.send_keys(keys)?;
        Ok(keypad)
    }

    /// Number of symbols read so far.
    pub fn presses(&self) -> usize {
        self.presses
    }

    /// Number of queued symbols not yet read.
    pub fn pending(&self) -> usize {
        self.input_rx.len()
    }
}

impl KeypadDevice for MockKeypad {
    async fn read_symbol(&mut self) -> Result<Symbol> {
        let symbol = self
            .input_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("Keypad input channel closed"))?;
        self.presses += 1;
        trace!("Mock key press #{}", self.presses);
        Ok(symbol)
    }

    async fn key_is_pressed(&mut self) -> Result<bool> {
        Ok(!self.input_rx.is_empty())
    }
}

/// Handle for feeding key presses to a [`MockKeypad`].
///
/// Cloneable; the keypad disconnects once every clone is dropped and the
/// queue is drained.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    input_tx: mpsc::UnboundedSender<Symbol>,
}

impl MockKeypadHandle {
    /// Queue one key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn send_symbol(&self, symbol: Symbol) -> Result<()> {
        self.input_tx
            .send(symbol)
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Queue one key press per character of `keys`, skipping whitespace.
    ///
    /// The whole string is validated before anything is queued.
    ///
    /// # Errors
    ///
    /// Returns an error if a character is not a keypad symbol or the keypad
    /// has been dropped.
    pub fn send_keys(&self, keys: &str) -> Result<()> {
        let symbols = keys
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Symbol::from_char)
            .collect::<lockpad_core::Result<Vec<_>>>()?;
        for symbol in symbols {
            self.send_symbol(symbol)?;
        }
        Ok(())
    }

    /// Queue a full code entry: the four symbols followed by `A`.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn send_code(&self, code: &lockpad_core::Code) -> Result<()> {
        for symbol in code.symbols() {
            self.send_symbol(*symbol)?;
        }
        self.send_symbol(Symbol::A)
    }
}

//! Code entry engine.
//!
//! A small line editor that reads keys until a complete 4-symbol code is
//! accepted. It draws on the display at the current cursor position, which
//! is normally the start of line 2.
//!
//! | Key | Effect |
//! |---|---|
//! | `0`-`9` | Append (ignored when 4 symbols are already entered) |
//! | `A` | Accept, only with exactly 4 symbols |
//! | `B` | Erase the last symbol |
//! | `C` | Erase every symbol |
//! | `D` | Toggle between masked (`*`) and revealed glyphs |
//! | `*`, `#` | Nothing |
//!
//! Every redraw is a single-cell move followed by writes; the screen never
//! scrolls and nothing outside the entered glyphs is touched.

use std::time::Duration;

use lockpad_core::constants::{CODE_LENGTH, DEFAULT_NOTICE_MS};
use lockpad_core::{Code, Symbol};
use lockpad_hardware::traits::{DisplayDevice, FeedbackDevice, KeypadDevice};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::peripherals::Peripherals;

const ADMIN_REJECTED: &str = "INVALID CODE";
const ADMIN_REJECTED_HINT: &str = "CHANGE CODE";

/// What the entered code is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Opening the lock. The admin code is accepted like any other code.
    Unlock,
    /// Choosing a new passcode. The admin code is refused inline.
    Create,
}

impl EntryMode {
    /// Returns `true` if the admin code may be submitted in this mode.
    pub fn allows_admin(self) -> bool {
        matches!(self, EntryMode::Unlock)
    }
}

/// Symbols entered so far, plus the reveal flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryBuffer {
    symbols: Vec<Symbol>,
    revealed: bool,
}

impl EntryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.symbols.len() == CODE_LENGTH
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Append a symbol. Returns `false` (and does nothing) when complete.
    pub fn push(&mut self, symbol: Symbol) -> bool {
        if self.is_complete() {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    pub fn pop(&mut self) -> Option<Symbol> {
        self.symbols.pop()
    }

    /// Drop every symbol. The reveal flag is kept.
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Glyph for an entered symbol under the current reveal flag.
    pub fn glyph(&self, symbol: Symbol) -> char {
        symbol.glyph(self.revealed)
    }

    /// The entered code, if complete.
    pub fn to_code(&self) -> Option<Code> {
        Code::from_symbols(&self.symbols).ok()
    }
}

/// One configured entry prompt.
///
/// # Examples
///
/// ```
/// use lockpad_firmware::entry::{CodeEntry, EntryMode};
/// use lockpad_firmware::Peripherals;
/// use lockpad_hardware::mock::{MockFeedback, MockKeypad};
/// use lockpad_hardware::VirtualDisplay;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let keypad = MockKeypad::scripted("12D3D4A")?;
///     let mut io = Peripherals::new(keypad, VirtualDisplay::new(), MockFeedback::new());
///
///     let entry = CodeEntry::new(EntryMode::Unlock, "2580".parse()?);
///     let code = entry.read(&mut io).await?;
///
///     assert_eq!(code.to_string(), "1234");
///     assert_eq!(io.display.text(0), "****");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CodeEntry {
    mode: EntryMode,
    admin_code: Code,
    hold: Duration,
}

impl CodeEntry {
    /// Create an entry prompt with the default rejection hold.
    pub fn new(mode: EntryMode, admin_code: Code) -> Self {
        Self {
            mode,
            admin_code,
            hold: Duration::from_millis(DEFAULT_NOTICE_MS),
        }
    }

    /// Set how long each line of the inline admin rejection stays visible.
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    /// Read keys until a code is accepted.
    ///
    /// Waits indefinitely; only a peripheral failure ends the prompt early.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Hardware`](crate::LockError::Hardware) if a
    /// device fails.
    pub async fn read<K, D, F>(&self, io: &mut Peripherals<K, D, F>) -> Result<Code>
    where
        K: KeypadDevice,
        D: DisplayDevice,
        F: FeedbackDevice,
    {
        let mut buffer = EntryBuffer::new();

        loop {
            match io.keypad.read_symbol().await? {
                Symbol::Star | Symbol::Hash => {}
                Symbol::A => {
                    let Some(code) = buffer.to_code() else {
                        continue;
                    };
                    if !self.mode.allows_admin() && code == self.admin_code {
                        warn!("Admin code refused as a new passcode");
                        self.reject_admin(io).await?;
                        buffer.clear();
                        continue;
                    }
                    debug!("Code entry accepted ({:?} mode)", self.mode);
                    return Ok(code);
                }
                Symbol::B => {
                    if buffer.pop().is_some() {
                        io.display.backspace().await?;
                    }
                }
                Symbol::C => {
                    while buffer.pop().is_some() {
                        io.display.backspace().await?;
                    }
                }
                Symbol::D => {
                    buffer.toggle_reveal();
                    for _ in 0..buffer.len() {
                        io.display.cursor_left().await?;
                    }
                    for &symbol in buffer.symbols() {
                        io.display.write_char(buffer.glyph(symbol)).await?;
                    }
                }
                digit @ Symbol::Digit(_) => {
                    if !buffer.is_complete() {
                        io.display.write_char(buffer.glyph(digit)).await?;
                        buffer.push(digit);
                    }
                }
            }
        }
    }

    /// Flash the two-step refusal after the entered glyphs, then erase it and
    /// the glyphs themselves, leaving the cursor where entry began.
    async fn reject_admin<K, D, F>(&self, io: &mut Peripherals<K, D, F>) -> Result<()>
    where
        K: KeypadDevice,
        D: DisplayDevice,
        F: FeedbackDevice,
    {
        for message in [ADMIN_REJECTED, ADMIN_REJECTED_HINT] {
            io.display.write_string(message).await?;
            io.feedback.delay(self.hold).await?;
            io.display.erase(message.len()).await?;
        }
        io.display.erase(CODE_LENGTH).await?;
        Ok(())
    }
}

//! Hardware device trait definitions.
//!
//! These traits are the whole boundary between the lock's control logic and
//! its peripherals: the keypad it reads, the character display it draws on and
//! the LED/buzzer feedback it drives. The control logic never touches a pin
//! directly, so every flow can run against the mocks in [`crate::mock`] and
//! the [`VirtualDisplay`](crate::display::VirtualDisplay).
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use std::time::Duration;

use lockpad_core::Symbol;

use crate::error::Result;
use crate::types::LedState;

/// Keypad device abstraction.
///
/// # Object Safety
///
/// This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters:
///
/// ```no_run
/// use lockpad_hardware::traits::KeypadDevice;
/// use lockpad_hardware::error::Result;
/// use lockpad_core::Symbol;
///
/// async fn wait_for_confirm<K: KeypadDevice>(keypad: &mut K) -> Result<()> {
///     while keypad.read_symbol().await? != Symbol::A {}
///     Ok(())
/// }
/// ```
pub trait KeypadDevice: Send {
    /// Wait for the next key press and return its symbol.
    ///
    /// Waits indefinitely; there is no timeout. The call returns only after
    /// the key has been released, so a held key registers once.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or its input source
    /// has closed.
    async fn read_symbol(&mut self) -> Result<Symbol>;

    /// Check, without waiting or debouncing, whether any key is down.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be polled.
    async fn key_is_pressed(&mut self) -> Result<bool>;
}

/// Character display abstraction.
///
/// Cursor moves are exact single-cell moves that never scroll the display;
/// the entry editor relies on this to redraw glyphs in place.
pub trait DisplayDevice: Send {
    /// Clear every cell and move the cursor to the start of line 1.
    async fn clear_and_home(&mut self) -> Result<()>;

    /// Write one glyph at the cursor and advance the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the glyph cannot be shown (non-printable ASCII).
    async fn write_char(&mut self, glyph: char) -> Result<()>;

    /// Move the cursor one cell left.
    async fn cursor_left(&mut self) -> Result<()>;

    /// Move the cursor one cell right.
    async fn cursor_right(&mut self) -> Result<()>;

    /// Move the cursor to the start of line 2.
    async fn seek_line2(&mut self) -> Result<()>;

    /// Write every glyph of `text` in order.
    async fn write_string(&mut self, text: &str) -> Result<()> {
        for glyph in text.chars() {
            self.write_char(glyph).await?;
        }
        Ok(())
    }

    /// Erase the glyph left of the cursor: cursor-left, space, cursor-left.
    async fn backspace(&mut self) -> Result<()> {
        self.cursor_left().await?;
        self.write_char(' ').await?;
        self.cursor_left().await
    }

    /// Erase the `count` glyphs left of the cursor, one at a time.
    async fn erase(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.backspace().await?;
        }
        Ok(())
    }

    /// Clear the screen and show two lines of text, leaving the cursor at
    /// the end of line 2.
    async fn show(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.clear_and_home().await?;
        self.write_string(line1).await?;
        self.seek_line2().await?;
        self.write_string(line2).await
    }
}

/// LED bank, buzzer and delay source.
pub trait FeedbackDevice: Send {
    /// Write `state` to every LED in one update.
    async fn set_leds(&mut self, state: LedState) -> Result<()>;

    /// Start (`true`) or stop (`false`) periodic LED toggling.
    ///
    /// Stopping also resets the toggle counter, so the next flash starts
    /// from a fresh period.
    async fn flash_leds(&mut self, enable: bool) -> Result<()>;

    /// Sound the buzzer for `duration`.
    async fn buzz(&mut self, duration: Duration) -> Result<()>;

    /// Wait for `duration`.
    async fn delay(&mut self, duration: Duration) -> Result<()>;
}

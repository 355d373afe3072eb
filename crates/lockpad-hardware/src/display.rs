//! Virtual character LCD.
//!
//! Models an HD44780-style controller with 2 lines of 40 DDRAM cells. Only the
//! instruction set the lock uses is modelled: clear-and-home, write, single
//! cell cursor moves and the line-2 seek. Every instruction is recorded, so a
//! test can assert a redraw sequence exactly and not just the final screen.
//!
//! # Character Encoding - ASCII Only
//!
//! The display only accepts printable ASCII (0x20-0x7E), as the character ROM
//! of the physical module does. Anything else is rejected with
//! [`HardwareError::InvalidData`] and leaves the display untouched.
//!
//! # Cursor model
//!
//! Cells are addressed as `(line, column)`. Writing advances the cursor;
//! past the last cell of line 1 it continues on line 2, and past the last
//! cell of line 2 it wraps back to line 1. Cursor moves follow the same
//! order in both directions and never scroll.
//!
//! # Examples
//!
//! ```
//! use lockpad_hardware::display::VirtualDisplay;
//! use lockpad_hardware::traits::DisplayDevice;
//!
//! #[tokio::main]
//! async fn main() -> lockpad_hardware::Result<()> {
//!     let mut display = VirtualDisplay::new();
//!     display.show("LOCKED", "**").await?;
//!
//!     assert_eq!(display.text(0), "LOCKED");
//!     assert_eq!(display.text(1), "**");
//!     assert_eq!(display.cursor(), (1, 2));
//!     Ok(())
//! }
//! ```

use lockpad_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};

use crate::error::{HardwareError, Result};
use crate::traits::DisplayDevice;
use crate::types::DisplayInstruction;

const BLANK: char = ' ';

/// In-memory 2×40 character display.
#[derive(Debug, Clone)]
pub struct VirtualDisplay {
    /// DDRAM contents, one row of cells per line.
    cells: [[char; DISPLAY_COLUMNS]; DISPLAY_LINES],

    /// Cursor position as (line, column).
    cursor: (usize, usize),

    /// Every instruction received since creation or the last drain.
    log: Vec<DisplayInstruction>,
}

impl VirtualDisplay {
    /// Create a blank display with the cursor at home.
    pub fn new() -> Self {
        Self {
            cells: [[BLANK; DISPLAY_COLUMNS]; DISPLAY_LINES],
            cursor: (0, 0),
            log: Vec::new(),
        }
    }

    /// Full contents of a line, all 40 cells.
    ///
    /// Out-of-range lines read as empty.
    pub fn line(&self, line: usize) -> String {
        self.cells
            .get(line)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    /// Contents of a line with trailing blanks removed.
    pub fn text(&self, line: usize) -> String {
        self.line(line).trim_end().to_string()
    }

    /// Every line, trailing blanks removed.
    pub fn lines(&self) -> Vec<String> {
        (0..DISPLAY_LINES).map(|line| self.text(line)).collect()
    }

    /// Current cursor position as (line, column).
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Recorded instructions, oldest first.
    pub fn instructions(&self) -> &[DisplayInstruction] {
        &self.log
    }

    /// Drain the recorded instructions.
    pub fn take_instructions(&mut self) -> Vec<DisplayInstruction> {
        std::mem::take(&mut self.log)
    }

    /// Glyphs written since the log was last drained, in order.
    ///
    /// Convenient for asserting what a flow printed regardless of cursor
    /// moves in between.
    pub fn written(&self) -> String {
        self.log
            .iter()
            .filter_map(|instruction| match instruction {
                DisplayInstruction::Char(glyph) => Some(*glyph),
                _ => None,
            })
            .collect()
    }

    fn advance(&mut self) {
        let (line, column) = self.cursor;
        self.cursor = if column + 1 < DISPLAY_COLUMNS {
            (line, column + 1)
        } else {
            ((line + 1) % DISPLAY_LINES, 0)
        };
    }

    fn retreat(&mut self) {
        let (line, column) = self.cursor;
        self.cursor = if column > 0 {
            (line, column - 1)
        } else {
            ((line + DISPLAY_LINES - 1) % DISPLAY_LINES, DISPLAY_COLUMNS - 1)
        };
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDevice for VirtualDisplay {
    async fn clear_and_home(&mut self) -> Result<()> {
        self.cells = [[BLANK; DISPLAY_COLUMNS]; DISPLAY_LINES];
        self.cursor = (0, 0);
        self.log.push(DisplayInstruction::ClearAndHome);
        Ok(())
    }

    async fn write_char(&mut self, glyph: char) -> Result<()> {
        if !(glyph.is_ascii_graphic() || glyph == BLANK) {
            return Err(HardwareError::invalid_data(format!(
                "Display accepts printable ASCII only, got {:?}",
                glyph
            )));
        }
        let (line, column) = self.cursor;
        self.cells[line][column] = glyph;
        self.advance();
        self.log.push(DisplayInstruction::Char(glyph));
        Ok(())
    }

    async fn cursor_left(&mut self) -> Result<()> {
        self.retreat();
        self.log.push(DisplayInstruction::CursorLeft);
        Ok(())
    }

    async fn cursor_right(&mut self) -> Result<()> {
        self.advance();
        self.log.push(DisplayInstruction::CursorRight);
        Ok(())
    }

    async fn seek_line2(&mut self) -> Result<()> {
        self.cursor = (1, 0);
        self.log.push(DisplayInstruction::SeekLine2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn test_new_display_is_blank() {
        let display = VirtualDisplay::new();
        assert_eq!(display.line(0), " ".repeat(DISPLAY_COLUMNS));
        assert_eq!(display.lines(), vec!["", ""]);
        assert_eq!(display.cursor(), (0, 0));
        assert!(display.instructions().is_empty());
    }

    #[tokio::test]
    async fn test_write_and_seek() {
        let mut display = VirtualDisplay::new();
        display.write_string("SELECT PASSCODE").await.unwrap();
        display.seek_line2().await.unwrap();
        display.write_string("****").await.unwrap();

        assert_eq!(display.text(0), "SELECT PASSCODE");
        assert_eq!(display.text(1), "****");
        assert_eq!(display.cursor(), (1, 4));
    }

    #[tokio::test]
    async fn test_clear_and_home_resets_cells_and_cursor() {
        let mut display = VirtualDisplay::new();
        display.show("INVALID CODE", "1234").await.unwrap();
        display.clear_and_home().await.unwrap();

        assert_eq!(display.lines(), vec!["", ""]);
        assert_eq!(display.cursor(), (0, 0));
    }

    #[tokio::test]
    async fn test_backspace_erases_in_place() {
        let mut display = VirtualDisplay::new();
        display.seek_line2().await.unwrap();
        display.write_string("*1*").await.unwrap();
        display.take_instructions();

        display.backspace().await.unwrap();

        assert_eq!(display.text(1), "*1");
        assert_eq!(display.cursor(), (1, 2));
        assert_eq!(
            display.instructions(),
            &[
                DisplayInstruction::CursorLeft,
                DisplayInstruction::Char(' '),
                DisplayInstruction::CursorLeft,
            ]
        );
    }

    #[tokio::test]
    async fn test_write_past_line_one_continues_on_line_two() {
        let mut display = VirtualDisplay::new();
        display
            .write_string(&"X".repeat(DISPLAY_COLUMNS + 2))
            .await
            .unwrap();

        assert_eq!(display.line(0), "X".repeat(DISPLAY_COLUMNS));
        assert_eq!(display.text(1), "XX");
        assert_eq!(display.cursor(), (1, 2));
    }

    #[tokio::test]
    async fn test_write_past_line_two_wraps_to_line_one() {
        let mut display = VirtualDisplay::new();
        display.seek_line2().await.unwrap();
        display
            .write_string(&"Y".repeat(DISPLAY_COLUMNS))
            .await
            .unwrap();
        assert_eq!(display.cursor(), (0, 0));

        display.write_char('Z').await.unwrap();
        assert_eq!(display.text(0), "Z");
    }

    #[rstest]
    #[case((1, 0), (0, DISPLAY_COLUMNS - 1))]
    #[case((0, 0), (1, DISPLAY_COLUMNS - 1))]
    #[case((1, 7), (1, 6))]
    #[tokio::test]
    async fn test_cursor_left_wrapping(
        #[case] start: (usize, usize),
        #[case] expected: (usize, usize),
    ) {
        let mut display = VirtualDisplay::new();
        display.cursor = start;
        display.cursor_left().await.unwrap();
        assert_eq!(display.cursor(), expected);
    }

    #[tokio::test]
    async fn test_cursor_right_does_not_write() {
        let mut display = VirtualDisplay::new();
        display.write_string("AB").await.unwrap();
        display.cursor_left().await.unwrap();
        display.cursor_left().await.unwrap();
        display.cursor_right().await.unwrap();

        assert_eq!(display.cursor(), (0, 1));
        assert_eq!(display.text(0), "AB");
    }

    #[rstest]
    #[case('é')]
    #[case('\n')]
    #[case('\u{7f}')]
    #[tokio::test]
    async fn test_non_printable_rejected(#[case] glyph: char) {
        let mut display = VirtualDisplay::new();
        let result = display.write_char(glyph).await;

        assert!(matches!(result, Err(HardwareError::InvalidData { .. })));
        assert_eq!(display.cursor(), (0, 0));
        assert!(display.instructions().is_empty());
    }

    #[tokio::test]
    async fn test_written_collects_glyphs_only() {
        let mut display = VirtualDisplay::new();
        display.show("LOCKED", "*").await.unwrap();
        display.backspace().await.unwrap();

        assert_eq!(display.written(), "LOCKED* ");
        assert_eq!(display.instructions()[0], DisplayInstruction::ClearAndHome);
    }

    #[tokio::test]
    async fn test_out_of_range_line_reads_empty() {
        let display = VirtualDisplay::new();
        assert_eq!(display.line(DISPLAY_LINES), "");
    }
}

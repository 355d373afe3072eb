//! Common types shared across device implementations.
//!
//! LED bank states, the display instruction set and the feedback events
//! recorded by the mock feedback device.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// State written to every LED of the indicator bank at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedState {
    /// LEDs lit (lock engaged).
    On,
    /// LEDs dark (lock open).
    Off,
}

impl LedState {
    /// Returns `true` if the LEDs are lit.
    #[inline]
    pub fn is_on(self) -> bool {
        matches!(self, LedState::On)
    }
}

/// One instruction of the character display's fixed instruction set.
///
/// Strings are written glyph by glyph, so a `write_string` call shows up as
/// a run of [`DisplayInstruction::Char`] entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayInstruction {
    /// Clear every cell and move the cursor to line 1, column 0.
    ClearAndHome,
    /// Write a glyph at the cursor and advance it.
    Char(char),
    /// Move the cursor one cell left.
    CursorLeft,
    /// Move the cursor one cell right.
    CursorRight,
    /// Move the cursor to line 2, column 0.
    SeekLine2,
}

/// Side effect performed by a feedback device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// LED bank written.
    Leds(LedState),
    /// Periodic LED flashing enabled or disabled.
    Flash(bool),
    /// Buzzer sounded for the given duration.
    Buzz(Duration),
    /// Idle wait.
    Delay(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_state_is_on() {
        assert!(LedState::On.is_on());
        assert!(!LedState::Off.is_on());
    }

    #[test]
    fn test_led_state_serialization() {
        let json = serde_json::to_string(&LedState::On).unwrap();
        assert_eq!(json, "\"on\"");
    }

    #[test]
    fn test_display_instruction_serialization() {
        let json = serde_json::to_string(&DisplayInstruction::SeekLine2).unwrap();
        assert_eq!(json, "\"seek_line2\"");
    }
}

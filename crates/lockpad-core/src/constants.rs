//! Core constants for the lockpad combination lock.
//!
//! Keypad geometry, code shape, store defaults and the default timings of the
//! human-facing flows. Everything tunable at runtime is mirrored by a field of
//! the firmware's `LockConfig`; these values are its defaults.
//!
//! # Keypad Layout
//!
//! ```text
//!        col0 col1 col2 col3
//! row0    1    2    3    A
//! row1    4    5    6    B
//! row2    7    8    9    C
//! row3    *    0    #    D
//! ```
//!
//! # Usage
//!
//! ```
//! use lockpad_core::constants::*;
//!
//! assert_eq!(KEYMAP[3][3], 'D');
//! assert_eq!(CODE_LENGTH, 4);
//! ```

// ============================================================================
// Keypad
// ============================================================================

/// Number of rows in the keypad matrix.
pub const KEYPAD_ROWS: usize = 4;

/// Number of columns in the keypad matrix.
pub const KEYPAD_COLUMNS: usize = 4;

/// Character printed on each key, indexed `[row][column]`.
pub const KEYMAP: [[char; KEYPAD_COLUMNS]; KEYPAD_ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

// ============================================================================
// Codes
// ============================================================================

/// Number of symbols in a passcode.
pub const CODE_LENGTH: usize = 4;

/// Glyph rendered in place of a masked code symbol.
pub const MASK_GLYPH: char = '*';

/// Administrator code used when no configuration overrides it.
pub const DEFAULT_ADMIN_CODE: [u8; CODE_LENGTH] = [2, 5, 8, 0];

// ============================================================================
// Passcode store
// ============================================================================

/// Default number of passcodes the store can hold.
pub const DEFAULT_STORE_CAPACITY: usize = 5;

// ============================================================================
// Display
// ============================================================================

/// Number of lines on the character display.
pub const DISPLAY_LINES: usize = 2;

/// Number of addressable character cells per display line.
pub const DISPLAY_COLUMNS: usize = 40;

// ============================================================================
// Timings (milliseconds unless noted)
// ============================================================================

/// Splash screen duration at boot.
pub const DEFAULT_SPLASH_MS: u64 = 2500;

/// Hold time for inline rejections and menu notices.
pub const DEFAULT_NOTICE_MS: u64 = 1250;

/// Duration of the buzzer alarm after an invalid code.
pub const DEFAULT_ALARM_MS: u64 = 3500;

/// Number of seconds shown by the unlock countdown.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;

/// Length of one countdown step.
pub const DEFAULT_COUNTDOWN_TICK_MS: u64 = 1000;

/// LED flash period (one toggle per period).
pub const DEFAULT_FLASH_PERIOD_MS: u64 = 500;

/// Half period of the buzzer square wave.
pub const DEFAULT_BUZZ_HALF_PERIOD_MS: u64 = 1;

/// Polling interval of the matrix keypad scanner.
pub const DEFAULT_KEYPAD_POLL_MS: u64 = 1;

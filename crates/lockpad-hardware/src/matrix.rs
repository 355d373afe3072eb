//! 4×4 matrix keypad scanner.
//!
//! The keypad's four column lines are outputs and its four row lines are
//! inputs (pulled down). A pressed key connects its column to its row, so a
//! row reads high only while its pressed key's column is driven high.
//!
//! # Scan protocol
//!
//! 1. Drive all columns high and wait until any row reads high.
//! 2. Take the first high row, scanning rows 0→3.
//! 3. Drive one column high at a time, 0→3, and take the first column that
//!    makes a row read high again.
//! 4. Drive all columns high and wait until every row reads low, so a held
//!    key is reported once.
//!
//! A key released in the middle of steps 2-3 produces no symbol; the scan
//! starts over.

use std::time::Duration;

use lockpad_core::constants::{DEFAULT_KEYPAD_POLL_MS, KEYPAD_COLUMNS, KEYPAD_ROWS};
use lockpad_core::Symbol;
use tracing::{debug, trace};

use crate::error::{HardwareError, Result};
use crate::pins::{InputPin, OutputPin};
use crate::traits::KeypadDevice;

/// Keypad driven through four column outputs and four row inputs.
///
/// # Examples
///
/// ```
/// use lockpad_hardware::matrix::MatrixKeypad;
/// use lockpad_hardware::mock::MockPin;
///
/// let columns = ["C0", "C1", "C2", "C3"].map(MockPin::new);
/// let rows = ["R0", "R1", "R2", "R3"].map(MockPin::new);
/// let keypad = MatrixKeypad::new(columns, rows);
/// ```
#[derive(Debug)]
pub struct MatrixKeypad<C, R> {
    columns: [C; KEYPAD_COLUMNS],
    rows: [R; KEYPAD_ROWS],
    poll_interval: Duration,
}

impl<C: OutputPin, R: InputPin> MatrixKeypad<C, R> {
    /// Create a scanner over the given column outputs and row inputs.
    pub fn new(columns: [C; KEYPAD_COLUMNS], rows: [R; KEYPAD_ROWS]) -> Self {
        Self {
            columns,
            rows,
            poll_interval: Duration::from_millis(DEFAULT_KEYPAD_POLL_MS),
        }
    }

    /// Set how long the scanner sleeps between row polls while waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero.
    pub fn with_poll_interval(mut self, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(HardwareError::invalid_data(
                "Keypad poll interval must be non-zero",
            ));
        }
        self.poll_interval = interval;
        Ok(self)
    }

    fn drive_all(&mut self, high: bool) {
        for column in &mut self.columns {
            column.set_state(high);
        }
    }

    fn any_row_active(&self) -> bool {
        self.rows.iter().any(|row| row.is_high())
    }

    fn first_active_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.is_high())
    }

    fn resolve_column(&mut self) -> Option<usize> {
        (0..KEYPAD_COLUMNS).find(|&index| {
            self.drive_all(false);
            self.columns[index].set_high();
            self.any_row_active()
        })
    }

    async fn wait_until(&self, pressed: bool) {
        while self.any_row_active() != pressed {
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

impl<C: OutputPin, R: InputPin> KeypadDevice for MatrixKeypad<C, R> {
    async fn read_symbol(&mut self) -> Result<Symbol> {
        loop {
            self.drive_all(true);
            self.wait_until(true).await;

            let position = match self.first_active_row() {
                Some(row) => self.resolve_column().map(|col| (row, col)),
                None => None,
            };

            self.drive_all(true);
            self.wait_until(false).await;

            match position.and_then(|(row, col)| Symbol::at(row, col)) {
                Some(symbol) => {
                    trace!("Key resolved at {:?}", position);
                    return Ok(symbol);
                }
                None => debug!("Key released during scan, rescanning"),
            }
        }
    }

    async fn key_is_pressed(&mut self) -> Result<bool> {
        self.drive_all(true);
        Ok(self.any_row_active())
    }
}

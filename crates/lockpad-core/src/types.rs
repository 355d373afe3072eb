use crate::{
    Result,
    constants::{CODE_LENGTH, KEYMAP, KEYPAD_COLUMNS, KEYPAD_ROWS, MASK_GLYPH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// One key of the 4×4 keypad.
///
/// Digits carry the code payload. The letters and `*`/`#` are command keys
/// whose meaning depends on the screen the lock is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Symbol {
    /// Numeric key (0-9).
    Digit(u8),
    A,
    B,
    C,
    D,
    /// Star key (*).
    Star,
    /// Hash/pound key (#).
    Hash,
}

impl Symbol {
    /// All 16 symbols in keymap order (row by row).
    pub const ALL: [Symbol; 16] = [
        Symbol::Digit(1),
        Symbol::Digit(2),
        Symbol::Digit(3),
        Symbol::A,
        Symbol::Digit(4),
        Symbol::Digit(5),
        Symbol::Digit(6),
        Symbol::B,
        Symbol::Digit(7),
        Symbol::Digit(8),
        Symbol::Digit(9),
        Symbol::C,
        Symbol::Star,
        Symbol::Digit(0),
        Symbol::Hash,
        Symbol::D,
    ];

    /// Create a digit symbol.
    ///
    /// # Errors
    /// Returns `Error::InvalidSymbol` if the digit is greater than 9.
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(Error::InvalidSymbol(char::from(b'0'.saturating_add(d))));
        }
        Ok(Symbol::Digit(d))
    }

    /// Parse the character printed on a key.
    ///
    /// Letters are accepted in either case.
    ///
    /// # Errors
    /// Returns `Error::InvalidSymbol` if the character is not on the keypad.
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            d @ '0'..='9' => Ok(Symbol::Digit(d as u8 - b'0')),
            'A' => Ok(Symbol::A),
            'B' => Ok(Symbol::B),
            'C' => Ok(Symbol::C),
            'D' => Ok(Symbol::D),
            '*' => Ok(Symbol::Star),
            '#' => Ok(Symbol::Hash),
            _ => Err(Error::InvalidSymbol(c)),
        }
    }

    /// Look up the symbol at a matrix position.
    ///
    /// Returns `None` when the position is outside the 4×4 matrix.
    #[must_use]
    pub fn at(row: usize, col: usize) -> Option<Self> {
        if row >= KEYPAD_ROWS || col >= KEYPAD_COLUMNS {
            return None;
        }
        Symbol::from_char(KEYMAP[row][col]).ok()
    }

    /// The character printed on the key.
    ///
    /// A `Digit` outside 0-9 names no key and renders as `?`.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Symbol::Digit(d) => char::from_digit(u32::from(d), 10).unwrap_or('?'),
            Symbol::A => 'A',
            Symbol::B => 'B',
            Symbol::C => 'C',
            Symbol::D => 'D',
            Symbol::Star => '*',
            Symbol::Hash => '#',
        }
    }

    /// Returns `true` for the digit keys, the only symbols the entry editor
    /// appends to a code.
    #[inline]
    #[must_use]
    pub fn is_digit(self) -> bool {
        matches!(self, Symbol::Digit(_))
    }

    /// Glyph shown for this symbol while entry is masked or revealed.
    #[inline]
    #[must_use]
    pub fn glyph(self, revealed: bool) -> char {
        if revealed { self.to_char() } else { MASK_GLYPH }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<char> for Symbol {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        Symbol::from_char(c)
    }
}

impl From<Symbol> for char {
    fn from(symbol: Symbol) -> char {
        symbol.to_char()
    }
}

/// A passcode: exactly four keypad symbols compared position by position.
///
/// # Security
/// Equality is evaluated in constant time so that comparing an entry against
/// the stored codes does not leak how many leading symbols matched.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code([Symbol; CODE_LENGTH]);

impl Code {
    /// Create a code from its four symbols.
    #[must_use]
    pub fn new(symbols: [Symbol; CODE_LENGTH]) -> Self {
        Code(symbols)
    }

    /// Create a code from a symbol slice.
    ///
    /// # Errors
    /// Returns `Error::InvalidCode` if the slice does not hold exactly four symbols.
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self> {
        let symbols: [Symbol; CODE_LENGTH] = symbols.try_into().map_err(|_| {
            Error::InvalidCode(format!(
                "Code must be {CODE_LENGTH} symbols, got {}",
                symbols.len()
            ))
        })?;
        Ok(Code(symbols))
    }

    /// The four symbols in entry order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol; CODE_LENGTH] {
        &self.0
    }

    /// Returns `true` if every symbol is a digit, i.e. the code can be typed
    /// through the entry editor.
    #[must_use]
    pub fn is_enterable(&self) -> bool {
        self.0.iter().all(|s| s.is_digit())
    }

    /// Two bytes per symbol: a variant tag and the raw digit value, so
    /// distinct symbols never share an encoding.
    fn as_bytes(&self) -> [u8; 2 * CODE_LENGTH] {
        let mut bytes = [0; 2 * CODE_LENGTH];
        for (pair, symbol) in bytes.chunks_exact_mut(2).zip(self.0) {
            let (tag, value) = match symbol {
                Symbol::Digit(d) => (0, d),
                Symbol::A => (1, 0),
                Symbol::B => (2, 0),
                Symbol::C => (3, 0),
                Symbol::D => (4, 0),
                Symbol::Star => (5, 0),
                Symbol::Hash => (6, 0),
            };
            pair[0] = tag;
            pair[1] = value;
        }
        bytes
    }
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes()[..].ct_eq(&other.as_bytes()[..]).into()
    }
}

impl std::hash::Hash for Code {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for symbol in self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let symbols = s
            .trim()
            .chars()
            .map(Symbol::from_char)
            .collect::<Result<Vec<_>>>()?;
        Code::from_symbols(&symbols)
    }
}

impl TryFrom<String> for Code {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> String {
        code.to_string()
    }
}

/// Render `value` as exactly `width` zero-padded decimal glyphs.
///
/// Values with more digits than `width` keep their low-order digits, the
/// way a fixed-width counter field on the LCD rolls over.
///
/// # Examples
///
/// ```
/// use lockpad_core::format_decimal;
///
/// assert_eq!(format_decimal(7, 2), "07");
/// assert_eq!(format_decimal(42, 4), "0042");
/// assert_eq!(format_decimal(123, 2), "23");
/// ```
#[must_use]
pub fn format_decimal(value: u32, width: usize) -> String {
    let padded = format!("{value:0width$}");
    let skip = padded.len().saturating_sub(width);
    padded[skip..].to_string()
}

//! Keypad fed from a byte stream, normally stdin.

use lockpad_core::Symbol;
use lockpad_hardware::traits::KeypadDevice;
use lockpad_hardware::{HardwareError, Result};
use tokio::io::{AsyncRead, AsyncReadExt, BufReader, Stdin};
use tracing::trace;

/// Each byte that names a keypad symbol is one key press. Everything else,
/// newlines included, is skipped.
#[derive(Debug)]
pub struct StdinKeypad<R> {
    reader: BufReader<R>,
}

impl StdinKeypad<Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin> StdinKeypad<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }
}

impl<R: AsyncRead + Unpin + Send> KeypadDevice for StdinKeypad<R> {
    async fn read_symbol(&mut self) -> Result<Symbol> {
        loop {
            let byte = match self.reader.read_u8().await {
                Ok(byte) => byte,
                Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(HardwareError::disconnected("stdin keypad"));
                }
                Err(err) => return Err(err.into()),
            };
            match Symbol::from_char(char::from(byte)) {
                Ok(symbol) => return Ok(symbol),
                Err(_) => trace!("Ignoring input byte {:#04x}", byte),
            }
        }
    }

    async fn key_is_pressed(&mut self) -> Result<bool> {
        Ok(!self.reader.buffer().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_symbols_and_skips_noise() {
        let mut keypad = StdinKeypad::new(&b"1 a\n#x"[..]);

        assert_eq!(keypad.read_symbol().await.unwrap(), Symbol::Digit(1));
        assert_eq!(keypad.read_symbol().await.unwrap(), Symbol::A);
        assert_eq!(keypad.read_symbol().await.unwrap(), Symbol::Hash);
    }

    #[tokio::test]
    async fn test_end_of_input_disconnects() {
        let mut keypad = StdinKeypad::new(&b"\n"[..]);

        let err = keypad.read_symbol().await.unwrap_err();
        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn test_key_is_pressed_reflects_buffered_input() {
        let mut keypad = StdinKeypad::new(&b"12"[..]);
        assert!(!keypad.key_is_pressed().await.unwrap());

        keypad.read_symbol().await.unwrap();
        assert!(keypad.key_is_pressed().await.unwrap());

        keypad.read_symbol().await.unwrap();
        assert!(!keypad.key_is_pressed().await.unwrap());
    }
}

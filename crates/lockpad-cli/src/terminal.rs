//! Character display drawn on the terminal.
//!
//! Drawing is split in two. [`TerminalDisplay`] applies every instruction to
//! a [`VirtualDisplay`] and publishes the resulting lines on a watch channel.
//! A renderer task waits for the screen to settle and prints one frame, so a
//! full `show` costs one redraw rather than one per glyph.

use std::time::Duration;

use lockpad_core::constants::DISPLAY_COLUMNS;
use lockpad_hardware::traits::DisplayDevice;
use lockpad_hardware::{HardwareError, Result, VirtualDisplay};
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet time before a changed screen is printed.
const FRAME_SETTLE: Duration = Duration::from_millis(20);

#[derive(Debug)]
pub struct TerminalDisplay {
    screen: VirtualDisplay,
    frames: watch::Sender<Vec<String>>,
}

impl TerminalDisplay {
    /// Create the display and start its renderer on stdout.
    ///
    /// The renderer finishes once the display is dropped.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let screen = VirtualDisplay::new();
        let (frames, rx) = watch::channel(screen.lines());
        let renderer = tokio::spawn(render(rx));
        (Self { screen, frames }, renderer)
    }

    /// Hand the current screen to the renderer.
    ///
    /// Fails once the renderer has stopped, which happens when stdout can no
    /// longer be written.
    fn publish(&mut self) -> Result<()> {
        // No instruction log is kept for the terminal.
        self.screen.take_instructions();
        self.frames
            .send(self.screen.lines())
            .map_err(|_| HardwareError::communication("terminal renderer stopped"))
    }
}

impl DisplayDevice for TerminalDisplay {
    async fn clear_and_home(&mut self) -> Result<()> {
        self.screen.clear_and_home().await?;
        self.publish()
    }

    async fn write_char(&mut self, glyph: char) -> Result<()> {
        self.screen.write_char(glyph).await?;
        self.publish()
    }

    async fn cursor_left(&mut self) -> Result<()> {
        self.screen.cursor_left().await
    }

    async fn cursor_right(&mut self) -> Result<()> {
        self.screen.cursor_right().await
    }

    async fn seek_line2(&mut self) -> Result<()> {
        self.screen.seek_line2().await
    }
}

async fn render(mut rx: watch::Receiver<Vec<String>>) {
    let mut stdout = tokio::io::stdout();
    while rx.changed().await.is_ok() {
        tokio::time::sleep(FRAME_SETTLE).await;
        let frame = frame(&rx.borrow_and_update());
        if stdout.write_all(frame.as_bytes()).await.is_err() {
            return;
        }
        let _ = stdout.flush().await;
    }
}

/// Boxed text for one screen.
pub fn frame(lines: &[String]) -> String {
    let border = format!("+{}+\n", "-".repeat(DISPLAY_COLUMNS));
    let mut out = border.clone();
    for line in lines {
        out.push_str(&format!("|{:<width$}|\n", line, width = DISPLAY_COLUMNS));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_pads_every_line() {
        let text = frame(&["LOCKED".to_string(), "**".to_string()]);
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.len() == DISPLAY_COLUMNS + 2));
        assert!(rows[1].starts_with("|LOCKED "));
        assert!(rows[2].starts_with("|** "));
    }

    #[tokio::test]
    async fn test_publishes_screen_after_writes() {
        let (mut display, _renderer) = TerminalDisplay::spawn();
        let rx = display.frames.subscribe();

        display.show("UNLOCKED", "10").await.unwrap();

        assert_eq!(*rx.borrow(), vec!["UNLOCKED".to_string(), "10".to_string()]);
        assert!(display.screen.instructions().is_empty());
    }

    #[tokio::test]
    async fn test_write_fails_once_renderer_is_gone() {
        let (mut display, renderer) = TerminalDisplay::spawn();
        renderer.abort();
        let _ = renderer.await;

        let err = display.write_char('1').await.unwrap_err();
        assert!(matches!(err, HardwareError::CommunicationError { .. }));
    }
}

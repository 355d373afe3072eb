//! Mock feedback device for testing and development.

use std::time::Duration;

use crate::error::Result;
use crate::traits::FeedbackDevice;
use crate::types::{FeedbackEvent, LedState};

/// Feedback device that records every call instead of driving pins.
///
/// Nothing sleeps: `buzz` and `delay` return immediately, so flows that hold
/// notices for seconds run instantly in tests. The recorded durations still
/// show how long real hardware would have waited.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lockpad_hardware::mock::MockFeedback;
/// use lockpad_hardware::traits::FeedbackDevice;
/// use lockpad_hardware::types::{FeedbackEvent, LedState};
///
/// #[tokio::main]
/// async fn main() -> lockpad_hardware::Result<()> {
///     let mut feedback = MockFeedback::new();
///     feedback.set_leds(LedState::On).await?;
///     feedback.buzz(Duration::from_millis(3500)).await?;
///
///     assert_eq!(feedback.leds(), LedState::On);
///     assert_eq!(feedback.buzz_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockFeedback {
    events: Vec<FeedbackEvent>,
    leds: LedState,
    flashing: bool,
}

impl MockFeedback {
    /// Create a recorder with the LEDs off and flashing disabled.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            leds: LedState::Off,
            flashing: false,
        }
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Last state written with `set_leds`.
    pub fn leds(&self) -> LedState {
        self.leds
    }

    /// Whether flashing is currently enabled.
    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    /// Number of buzzer pulses recorded.
    pub fn buzz_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, FeedbackEvent::Buzz(_)))
            .count()
    }

    /// Sum of every recorded delay and buzz.
    pub fn total_wait(&self) -> Duration {
        self.events
            .iter()
            .map(|event| match event {
                FeedbackEvent::Buzz(duration) | FeedbackEvent::Delay(duration) => *duration,
                _ => Duration::ZERO,
            })
            .sum()
    }
}

impl Default for MockFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackDevice for MockFeedback {
    async fn set_leds(&mut self, state: LedState) -> Result<()> {
        self.leds = state;
        self.events.push(FeedbackEvent::Leds(state));
        Ok(())
    }

    async fn flash_leds(&mut self, enable: bool) -> Result<()> {
        self.flashing = enable;
        self.events.push(FeedbackEvent::Flash(enable));
        Ok(())
    }

    async fn buzz(&mut self, duration: Duration) -> Result<()> {
        self.events.push(FeedbackEvent::Buzz(duration));
        Ok(())
    }

    async fn delay(&mut self, duration: Duration) -> Result<()> {
        self.events.push(FeedbackEvent::Delay(duration));
        Ok(())
    }
}

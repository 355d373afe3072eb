//! GPIO feedback driver: LED bank, buzzer and delays.
//!
//! LED flashing runs as a separate tokio task that only ever toggles the LED
//! outputs. It shares nothing else with the control flow, and each write to
//! the bank happens under one short mutex hold, so the main flow and the
//! flasher can never observe a half-written bank.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lockpad_core::constants::{DEFAULT_BUZZ_HALF_PERIOD_MS, DEFAULT_FLASH_PERIOD_MS};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{HardwareError, Result};
use crate::pins::OutputPin;
use crate::traits::FeedbackDevice;
use crate::types::LedState;

/// Feedback device driving LED and buzzer pins directly.
///
/// # Examples
///
/// ```
/// use lockpad_hardware::feedback::GpioFeedback;
/// use lockpad_hardware::mock::MockPin;
/// use lockpad_hardware::traits::FeedbackDevice;
/// use lockpad_hardware::types::LedState;
///
/// #[tokio::main]
/// async fn main() -> lockpad_hardware::Result<()> {
///     let led = MockPin::new("LED0");
///     let mut feedback = GpioFeedback::new(vec![led.clone()], MockPin::new("BUZZ"));
///
///     feedback.set_leds(LedState::On).await?;
///     assert!(led.level());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct GpioFeedback<L, B> {
    leds: Arc<Mutex<Vec<L>>>,
    buzzer: B,
    flash_period: Duration,
    buzz_half_period: Duration,
    flasher: Option<JoinHandle<()>>,
    toggles: Arc<AtomicUsize>,
}

impl<L: OutputPin + 'static, B: OutputPin> GpioFeedback<L, B> {
    /// Create a driver with the default flash period and buzzer tone.
    pub fn new(leds: Vec<L>, buzzer: B) -> Self {
        Self {
            leds: Arc::new(Mutex::new(leds)),
            buzzer,
            flash_period: Duration::from_millis(DEFAULT_FLASH_PERIOD_MS),
            buzz_half_period: Duration::from_millis(DEFAULT_BUZZ_HALF_PERIOD_MS),
            flasher: None,
            toggles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the LED flash period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is zero.
    pub fn with_flash_period(mut self, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(HardwareError::invalid_data("Flash period must be non-zero"));
        }
        self.flash_period = period;
        Ok(self)
    }

    /// Set the buzzer square-wave half period (the duration counter step).
    ///
    /// # Errors
    ///
    /// Returns an error if the half period is zero.
    pub fn with_buzz_half_period(mut self, half_period: Duration) -> Result<Self> {
        if half_period.is_zero() {
            return Err(HardwareError::invalid_data(
                "Buzzer half period must be non-zero",
            ));
        }
        self.buzz_half_period = half_period;
        Ok(self)
    }

    /// Returns `true` while the flash task is running.
    pub fn is_flashing(&self) -> bool {
        self.flasher.is_some()
    }

    /// Number of LED toggles performed since flashing was last enabled.
    pub fn toggle_count(&self) -> usize {
        self.toggles.load(Ordering::SeqCst)
    }

    fn stop_flasher(&mut self) {
        if let Some(flasher) = self.flasher.take() {
            flasher.abort();
        }
        self.toggles.store(0, Ordering::SeqCst);
    }
}

impl<L: OutputPin + 'static, B: OutputPin> FeedbackDevice for GpioFeedback<L, B> {
    async fn set_leds(&mut self, state: LedState) -> Result<()> {
        let mut leds = self
            .leds
            .lock()
            .map_err(|_| HardwareError::other("LED bank lock poisoned"))?;
        for led in leds.iter_mut() {
            led.set_state(state.is_on());
        }
        Ok(())
    }

    async fn flash_leds(&mut self, enable: bool) -> Result<()> {
        if !enable {
            if self.flasher.is_some() {
                debug!("LED flashing disabled");
            }
            self.stop_flasher();
            return Ok(());
        }
        if self.flasher.is_some() {
            return Ok(());
        }

        debug!("LED flashing enabled, period {:?}", self.flash_period);
        let leds = Arc::clone(&self.leds);
        let toggles = Arc::clone(&self.toggles);
        let period = self.flash_period;

        self.flasher = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Ok(mut leds) = leds.lock() else {
                    return;
                };
                for led in leds.iter_mut() {
                    led.toggle();
                }
                toggles.fetch_add(1, Ordering::SeqCst);
            }
        }));
        Ok(())
    }

    async fn buzz(&mut self, duration: Duration) -> Result<()> {
        let mut remaining = duration;
        while !remaining.is_zero() {
            self.buzzer.toggle();
            tokio::time::sleep(self.buzz_half_period).await;
            remaining = remaining.saturating_sub(self.buzz_half_period);
        }
        self.buzzer.set_low();
        Ok(())
    }

    async fn delay(&mut self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

impl<L, B> Drop for GpioFeedback<L, B> {
    fn drop(&mut self) {
        if let Some(flasher) = self.flasher.take() {
            flasher.abort();
        }
    }
}

//! Output pins that exist only in the log.

use lockpad_hardware::pins::OutputPin;
use tracing::trace;

/// Simulated output pin. Level changes are traced, never driven.
#[derive(Debug, Clone)]
pub struct TracingPin {
    name: String,
    high: bool,
}

impl TracingPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            high: false,
        }
    }

    pub fn led(index: usize) -> Self {
        Self::new(format!("LED{index}"))
    }

    pub fn buzzer() -> Self {
        Self::new("BUZZER")
    }
}

impl OutputPin for TracingPin {
    fn set_high(&mut self) {
        if !self.high {
            trace!("{} high", self.name);
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if self.high {
            trace!("{} low", self.name);
        }
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

//! GPIO pin abstractions.
//!
//! Minimal digital pin traits implemented by chip-specific HALs (or by the
//! [`MockPin`](crate::mock::MockPin) used in tests). The keypad scanner and
//! the feedback driver are generic over them, so register-level pin setup
//! stays outside this crate.

/// Digital output pin
pub trait OutputPin: Send {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Toggle the pin state
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }
}

/// Digital input pin
pub trait InputPin: Send {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

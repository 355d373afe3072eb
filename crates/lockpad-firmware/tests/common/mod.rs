//! Shared helpers for the lock integration tests.
//!
//! Every lock here runs on a scripted keypad, the virtual display and the
//! recording feedback device, so nothing sleeps and a flow ends as soon as
//! its script runs out.

#![allow(dead_code)]

use lockpad_core::Code;
use lockpad_firmware::{LockConfig, LockController, Peripherals};
use lockpad_hardware::VirtualDisplay;
use lockpad_hardware::mock::{MockFeedback, MockKeypad};

pub type TestLock = LockController<MockKeypad, VirtualDisplay, MockFeedback>;

pub const ADMIN: &str = "2580";

pub fn code(s: &str) -> Code {
    s.parse().expect("test code must be valid")
}

pub fn peripherals(keys: &str) -> Peripherals<MockKeypad, VirtualDisplay, MockFeedback> {
    Peripherals::new(
        MockKeypad::scripted(keys).expect("test script must be valid"),
        VirtualDisplay::new(),
        MockFeedback::new(),
    )
}

/// Boot a lock with the default configuration. `keys` must start with the
/// first passcode entry.
pub async fn boot(keys: &str) -> TestLock {
    boot_with(keys, LockConfig::default()).await
}

pub async fn boot_with(keys: &str, config: LockConfig) -> TestLock {
    LockController::boot(peripherals(keys), config)
        .await
        .expect("boot must succeed")
}

/// Stored codes, in order, as strings.
pub fn stored(lock: &TestLock) -> Vec<String> {
    lock.store().iter().map(|c| c.to_string()).collect()
}

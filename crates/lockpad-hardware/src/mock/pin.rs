//! Mock GPIO pin for testing and development.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::pins::{InputPin, OutputPin};

/// Shared-level pin usable as input or output.
///
/// Clones observe the same level, so a test can keep one clone while a
/// driver owns another. Every level change (edge) is counted.
///
/// # Examples
///
/// ```
/// use lockpad_hardware::mock::MockPin;
/// use lockpad_hardware::pins::OutputPin;
///
/// let probe = MockPin::new("LED0");
/// let mut pin = probe.clone();
///
/// pin.set_high();
/// pin.toggle();
/// assert!(!probe.level());
/// assert_eq!(probe.edges(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockPin {
    name: Arc<str>,
    level: Arc<AtomicBool>,
    edges: Arc<AtomicUsize>,
}

impl MockPin {
    /// Create a pin that starts low.
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            level: Arc::new(AtomicBool::new(false)),
            edges: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Pin name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current level.
    pub fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    /// Number of level changes since creation.
    pub fn edges(&self) -> usize {
        self.edges.load(Ordering::SeqCst)
    }

    fn write(&self, high: bool) {
        if self.level.swap(high, Ordering::SeqCst) != high {
            self.edges.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.write(true);
    }

    fn set_low(&mut self) {
        self.write(false);
    }

    fn is_set_high(&self) -> bool {
        self.level()
    }
}

impl InputPin for MockPin {
    fn is_high(&self) -> bool {
        self.level()
    }
}

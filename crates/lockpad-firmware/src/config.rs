//! Lock configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock lock: 5 codes, admin code `2580`.
//!
//! ```
//! use lockpad_firmware::LockConfig;
//!
//! let config = LockConfig::from_json_str(r#"{ "capacity": 8, "timings": { "alarm_ms": 1000 } }"#)?;
//! assert_eq!(config.capacity, 8);
//! assert_eq!(config.timings.alarm_ms, 1000);
//! assert_eq!(config.timings.notice_ms, 1250);
//! # Ok::<(), lockpad_firmware::LockError>(())
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use lockpad_core::{Code, Symbol};
use lockpad_core::constants::{
    DEFAULT_ADMIN_CODE, DEFAULT_ALARM_MS, DEFAULT_BUZZ_HALF_PERIOD_MS, DEFAULT_COUNTDOWN_SECS,
    DEFAULT_COUNTDOWN_TICK_MS, DEFAULT_FLASH_PERIOD_MS, DEFAULT_NOTICE_MS, DEFAULT_SPLASH_MS,
    DEFAULT_STORE_CAPACITY,
};
use serde::{Deserialize, Serialize};

use crate::error::{LockError, Result};

/// Top-level lock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Maximum number of stored passcodes.
    pub capacity: usize,

    /// Code that opens the admin menu. Never stored.
    pub admin_code: Code,

    /// Delays and periods.
    pub timings: Timings,
}

/// Delays and periods, in milliseconds unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Boot splash hold.
    pub splash_ms: u64,

    /// Hold for inline rejections and menu notices.
    pub notice_ms: u64,

    /// Buzzer duration on a wrong code.
    pub alarm_ms: u64,

    /// Unlock countdown length, in ticks.
    pub countdown_secs: u32,

    /// Length of one countdown tick.
    pub countdown_tick_ms: u64,

    /// LED flash period.
    pub flash_period_ms: u64,

    /// Buzzer half period.
    pub buzz_half_period_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            splash_ms: DEFAULT_SPLASH_MS,
            notice_ms: DEFAULT_NOTICE_MS,
            alarm_ms: DEFAULT_ALARM_MS,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            countdown_tick_ms: DEFAULT_COUNTDOWN_TICK_MS,
            flash_period_ms: DEFAULT_FLASH_PERIOD_MS,
            buzz_half_period_ms: DEFAULT_BUZZ_HALF_PERIOD_MS,
        }
    }
}

impl Timings {
    pub fn splash(&self) -> Duration {
        Duration::from_millis(self.splash_ms)
    }

    pub fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    pub fn alarm(&self) -> Duration {
        Duration::from_millis(self.alarm_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    pub fn flash_period(&self) -> Duration {
        Duration::from_millis(self.flash_period_ms)
    }

    pub fn buzz_half_period(&self) -> Duration {
        Duration::from_millis(self.buzz_half_period_ms)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_STORE_CAPACITY,
            admin_code: default_admin_code(),
            timings: Timings::default(),
        }
    }
}

fn default_admin_code() -> Code {
    Code::new(DEFAULT_ADMIN_CODE.map(Symbol::Digit))
}

impl LockConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Config`] for malformed JSON and any error from
    /// [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| LockError::config(format!("invalid configuration: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Config`] if the file cannot be read or parsed,
    /// and any error from [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            LockError::config(format!(
                "failed to read configuration from '{}': {err}",
                path.display()
            ))
        })?;
        Self::from_json_str(&raw)
    }

    /// Check the configuration for values the lock cannot run with.
    ///
    /// # Errors
    ///
    /// - [`lockpad_core::Error::InvalidCapacity`] if `capacity` is zero.
    /// - [`LockError::Config`] if the admin code contains a non-digit (it
    ///   could never be typed) or a period that drives a loop is zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(lockpad_core::Error::InvalidCapacity(self.capacity).into());
        }
        if !self.admin_code.is_enterable() {
            return Err(LockError::config("admin code must be four digits"));
        }
        if self.timings.flash_period_ms == 0 {
            return Err(LockError::config("flash period must be non-zero"));
        }
        if self.timings.buzz_half_period_ms == 0 {
            return Err(LockError::config("buzzer half period must be non-zero"));
        }
        Ok(())
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_admin_code(mut self, admin_code: Code) -> Self {
        self.admin_code = admin_code;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }
}

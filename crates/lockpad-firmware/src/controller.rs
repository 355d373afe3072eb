//! Lock cycle controller.
//!
//! Owns the devices, the passcode store and the state machine, and runs the
//! lock: boot once, then prompt, validate and react, forever.

use lockpad_core::format_decimal;
use lockpad_hardware::traits::{DisplayDevice, FeedbackDevice, KeypadDevice};
use lockpad_hardware::types::LedState;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::LockConfig;
use crate::entry::{CodeEntry, EntryMode};
use crate::error::{LockError, Result};
use crate::menu::AdminMenu;
use crate::peripherals::Peripherals;
use crate::state_machine::{LockState, StateMachine};
use crate::store::{CheckResult, PasscodeStore};

const SPLASH: &str = "DIGITAL LOCK";
const FIRST_CODE_PROMPT: &str = "SELECT PASSCODE";
const LOCKED: &str = "LOCKED";
const INVALID: &str = "INVALID CODE";
const UNLOCKED: &str = "UNLOCKED";

/// Width of the countdown field on line 2.
const COUNTDOWN_WIDTH: usize = 2;

/// Width of the unlock counter field.
const UNLOCKS_WIDTH: usize = 4;

/// Transitions logged when the lock halts.
const HALT_HISTORY: usize = 4;

/// How one pass of the lock cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Wrong code; the alarm ran.
    Rejected,
    /// A stored code matched; the countdown ran. `unlocks` is the counter
    /// after this unlock.
    Unlocked { index: usize, unlocks: u32 },
    /// The admin menu was opened and closed.
    Admin,
}

/// The running lock.
///
/// # Examples
///
/// ```
/// use lockpad_firmware::{CycleOutcome, LockConfig, LockController, Peripherals};
/// use lockpad_hardware::mock::{MockFeedback, MockKeypad};
/// use lockpad_hardware::VirtualDisplay;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Boot with 1234, then open the lock with it.
///     let keypad = MockKeypad::scripted("1234A 1234A")?;
///     let io = Peripherals::new(keypad, VirtualDisplay::new(), MockFeedback::new());
///
///     let mut lock = LockController::boot(io, LockConfig::default()).await?;
///     let outcome = lock.run_cycle().await?;
///
///     assert_eq!(outcome, CycleOutcome::Unlocked { index: 0, unlocks: 1 });
///     assert_eq!(lock.peripherals().display.text(0), "UNLOCKS: 0001");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct LockController<K, D, F> {
    io: Peripherals<K, D, F>,
    store: PasscodeStore,
    machine: StateMachine,
    config: LockConfig,
    unlocks: u32,
}

impl<K, D, F> LockController<K, D, F>
where
    K: KeypadDevice,
    D: DisplayDevice,
    F: FeedbackDevice,
{
    /// Show the splash, ask for the first passcode and return a lock holding
    /// exactly that code.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a device fails.
    pub async fn boot(mut io: Peripherals<K, D, F>, config: LockConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Lock booting: capacity {}, countdown {}s",
            config.capacity, config.timings.countdown_secs
        );

        io.notice(SPLASH, "", config.timings.splash()).await?;
        io.display.show(FIRST_CODE_PROMPT, "").await?;
        let first = CodeEntry::new(EntryMode::Create, config.admin_code)
            .with_hold(config.timings.notice())
            .read(&mut io)
            .await?;

        let store = PasscodeStore::with_initial(config.capacity, config.admin_code, first)?;
        info!("First passcode set");
        Self::from_parts(io, config, store)
    }

    /// Build a lock around an existing store, skipping the boot prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the store is empty
    /// (an empty lock could never be opened), or the store's admin code or
    /// capacity differ from the configuration's.
    pub fn from_parts(
        io: Peripherals<K, D, F>,
        config: LockConfig,
        store: PasscodeStore,
    ) -> Result<Self> {
        config.validate()?;
        if store.is_empty() {
            return Err(LockError::config("passcode store must hold at least one code"));
        }
        if *store.admin_code() != config.admin_code {
            return Err(LockError::config(
                "passcode store admin code differs from the configured one",
            ));
        }
        if store.capacity() != config.capacity {
            return Err(LockError::config(format!(
                "passcode store capacity {} differs from configured capacity {}",
                store.capacity(),
                config.capacity
            )));
        }
        Ok(Self {
            io,
            store,
            machine: StateMachine::new(),
            config,
            unlocks: 0,
        })
    }

    /// Run cycles until a device fails.
    ///
    /// # Errors
    ///
    /// Only returns on failure; the error is always
    /// [`LockError::Hardware`] for a running lock.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if let Err(err) = self.run_cycle().await {
                error!("Lock halted: {}", err);
                for transition in self.machine.last_transitions(HALT_HISTORY) {
                    debug!(
                        "  {} -> {} at {}",
                        transition.from, transition.to, transition.timestamp
                    );
                }
                return Err(err);
            }
        }
    }

    /// Run one pass: prompt, validate, react, and return to `Locked`.
    ///
    /// # Errors
    ///
    /// Returns an error if a device fails mid-cycle. The state machine is
    /// reset to `Locked` first, so the lock can be driven again.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        match self.cycle().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.machine.reset();
                Err(err)
            }
        }
    }

    async fn cycle(&mut self) -> Result<CycleOutcome> {
        self.io.display.show(LOCKED, "").await?;
        self.io.feedback.set_leds(LedState::On).await?;

        let entry = CodeEntry::new(EntryMode::Unlock, self.config.admin_code)
            .with_hold(self.config.timings.notice())
            .read(&mut self.io)
            .await?;

        self.machine.transition_to(LockState::Validating)?;
        let outcome = match self.store.check(&entry) {
            CheckResult::NoMatch => {
                self.machine.transition_to(LockState::Invalid)?;
                warn!("Invalid code entered");
                self.alarm().await?;
                CycleOutcome::Rejected
            }
            CheckResult::Match { index } => {
                self.machine.transition_to(LockState::Unlocked)?;
                info!("Unlocked by stored code #{}", index);
                self.unlock().await?;
                CycleOutcome::Unlocked {
                    index,
                    unlocks: self.unlocks,
                }
            }
            CheckResult::Admin => {
                self.machine.transition_to(LockState::Admin)?;
                AdminMenu::new(&mut self.io, &mut self.store, &self.config.timings)
                    .run()
                    .await?;
                CycleOutcome::Admin
            }
        };
        debug!(
            "{} for {} ms",
            self.machine.current_state(),
            self.machine.time_in_current_state().num_milliseconds()
        );
        self.machine.transition_to(LockState::Locked)?;
        Ok(outcome)
    }

    async fn alarm(&mut self) -> Result<()> {
        self.io.display.show(INVALID, "").await?;
        self.io.feedback.flash_leds(true).await?;
        self.io.feedback.buzz(self.config.timings.alarm()).await?;
        self.io.feedback.flash_leds(false).await?;
        Ok(())
    }

    async fn unlock(&mut self) -> Result<()> {
        self.io.display.show(UNLOCKED, "").await?;
        self.io.feedback.set_leds(LedState::Off).await?;

        for remaining in (1..=self.config.timings.countdown_secs).rev() {
            let field = format_decimal(remaining, COUNTDOWN_WIDTH);
            self.io.display.write_string(&field).await?;
            self.io
                .feedback
                .delay(self.config.timings.countdown_tick())
                .await?;
            self.io.display.erase(field.len()).await?;
        }

        self.unlocks = self.unlocks.saturating_add(1);
        debug!("Unlock count now {}", self.unlocks);
        let count = format!("UNLOCKS: {}", format_decimal(self.unlocks, UNLOCKS_WIDTH));
        self.io
            .notice(&count, "", self.config.timings.notice())
            .await?;
        Ok(())
    }

    /// Successful non-admin unlocks since boot.
    pub fn unlock_count(&self) -> u32 {
        self.unlocks
    }

    pub fn state(&self) -> LockState {
        self.machine.current_state()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn store(&self) -> &PasscodeStore {
        &self.store
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn peripherals(&self) -> &Peripherals<K, D, F> {
        &self.io
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<K, D, F> {
        &mut self.io
    }
}

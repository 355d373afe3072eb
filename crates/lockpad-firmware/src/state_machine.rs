//! Lock cycle state machine.
//!
//! Tracks where the lock is in its cycle and refuses out-of-order moves.
//!
//! # States
//!
//! - `Locked`: prompting for a code
//! - `Validating`: checking the entered code
//! - `Invalid`: wrong code, alarm sounding
//! - `Unlocked`: correct code, countdown running
//! - `Admin`: admin menu open
//!
//! # Valid Transitions
//!
//! - Locked → Validating → Invalid/Unlocked/Admin
//! - Invalid/Unlocked/Admin → Locked
//!
//! # Examples
//!
//! ```
//! use lockpad_firmware::{LockState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! machine.transition_to(LockState::Validating).unwrap();
//! machine.transition_to(LockState::Unlocked).unwrap();
//! machine.transition_to(LockState::Locked).unwrap();
//!
//! assert_eq!(machine.history().len(), 3);
//! assert!(machine.transition_to(LockState::Unlocked).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use lockpad_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Transitions kept in history. A full lock cycle is two transitions.
const MAX_HISTORY_SIZE: usize = 100;

/// Phase of the lock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Prompting for a code. LEDs on.
    Locked,

    /// Comparing the entry against the admin code and the store.
    Validating,

    /// The entry matched nothing.
    Invalid,

    /// The entry matched a stored code. LEDs off.
    Unlocked,

    /// The entry was the admin code; the admin menu is open.
    Admin,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LockState::Locked => "Locked",
            LockState::Validating => "Validating",
            LockState::Invalid => "Invalid",
            LockState::Unlocked => "Unlocked",
            LockState::Admin => "Admin",
        };
        write!(f, "{name}")
    }
}

impl LockState {
    /// Check if the cycle may move from this state to `target`.
    ///
    /// ```
    /// use lockpad_firmware::LockState;
    ///
    /// assert!(LockState::Locked.can_transition_to(&LockState::Validating));
    /// assert!(!LockState::Locked.can_transition_to(&LockState::Unlocked));
    /// ```
    pub fn can_transition_to(&self, target: &LockState) -> bool {
        matches!(
            (self, target),
            (LockState::Locked, LockState::Validating)
                | (
                    LockState::Validating,
                    LockState::Invalid | LockState::Unlocked | LockState::Admin
                )
                | (
                    LockState::Invalid | LockState::Unlocked | LockState::Admin,
                    LockState::Locked
                )
        )
    }

    /// Returns `true` for the states that end a validation.
    pub fn is_verdict(&self) -> bool {
        matches!(
            self,
            LockState::Invalid | LockState::Unlocked | LockState::Admin
        )
    }
}

/// One recorded state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: LockState,
    pub to: LockState,
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(from: LockState, to: LockState) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Validating state holder with a bounded transition history.
///
/// Not thread-safe; the lock's single control flow owns it.
#[derive(Debug, Clone)]
pub struct StateMachine {
    current_state: LockState,
    state_entered_at: DateTime<Utc>,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a machine in the `Locked` state with empty history.
    pub fn new() -> Self {
        Self {
            current_state: LockState::Locked,
            state_entered_at: Utc::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> LockState {
        self.current_state
    }

    /// Wall-clock time since the current state was entered.
    pub fn time_in_current_state(&self) -> TimeDelta {
        Utc::now() - self.state_entered_at
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Up to `count` most recent transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Move to `new_state` if the cycle allows it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] and leaves the machine
    /// untouched if the move is out of order.
    pub fn transition_to(&mut self, new_state: LockState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.apply(transition.clone());
        Ok(transition)
    }

    /// Force the machine back to `Locked` from any state.
    pub fn reset(&mut self) -> StateTransition {
        let transition = StateTransition::new(self.current_state, LockState::Locked);
        self.apply(transition.clone());
        transition
    }

    fn apply(&mut self, transition: StateTransition) {
        trace!("Lock state {} -> {}", transition.from, transition.to);
        self.current_state = transition.to;
        self.state_entered_at = transition.timestamp;
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALL: [LockState; 5] = [
        LockState::Locked,
        LockState::Validating,
        LockState::Invalid,
        LockState::Unlocked,
        LockState::Admin,
    ];

    #[test]
    fn test_new_machine_starts_locked() {
        let machine = StateMachine::new();
        assert_eq!(machine.current_state(), LockState::Locked);
        assert!(machine.history().is_empty());
    }

    #[rstest]
    #[case(LockState::Invalid)]
    #[case(LockState::Unlocked)]
    #[case(LockState::Admin)]
    fn test_full_cycle_through_each_verdict(#[case] verdict: LockState) {
        let mut machine = StateMachine::new();
        machine.transition_to(LockState::Validating).unwrap();
        let transition = machine.transition_to(verdict).unwrap();
        assert_eq!(transition.from, LockState::Validating);
        assert_eq!(transition.to, verdict);
        assert!(verdict.is_verdict());

        machine.transition_to(LockState::Locked).unwrap();
        assert_eq!(machine.current_state(), LockState::Locked);
        assert_eq!(machine.history().len(), 3);
    }

    #[test]
    fn test_transition_table() {
        let valid = [
            (LockState::Locked, LockState::Validating),
            (LockState::Validating, LockState::Invalid),
            (LockState::Validating, LockState::Unlocked),
            (LockState::Validating, LockState::Admin),
            (LockState::Invalid, LockState::Locked),
            (LockState::Unlocked, LockState::Locked),
            (LockState::Admin, LockState::Locked),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    valid.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_invalid_transition_leaves_state() {
        let mut machine = StateMachine::new();
        let err = machine.transition_to(LockState::Unlocked).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition from Locked to Unlocked"
        );
        assert_eq!(machine.current_state(), LockState::Locked);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_reset_from_anywhere() {
        let mut machine = StateMachine::new();
        machine.transition_to(LockState::Validating).unwrap();

        let transition = machine.reset();
        assert_eq!(transition.from, LockState::Validating);
        assert_eq!(machine.current_state(), LockState::Locked);
    }

    #[test]
    fn test_history_size_limit() {
        let mut machine = StateMachine::new();
        for _ in 0..(MAX_HISTORY_SIZE) {
            machine.transition_to(LockState::Validating).unwrap();
            machine.transition_to(LockState::Invalid).unwrap();
            machine.transition_to(LockState::Locked).unwrap();
        }
        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        assert_eq!(
            machine.history().back().map(|t| t.to),
            Some(LockState::Locked)
        );
    }

    #[test]
    fn test_last_transitions_returns_most_recent() {
        let mut machine = StateMachine::new();
        machine.transition_to(LockState::Validating).unwrap();
        machine.transition_to(LockState::Admin).unwrap();
        machine.transition_to(LockState::Locked).unwrap();

        let last = machine.last_transitions(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].to, LockState::Admin);
        assert_eq!(last[1].to, LockState::Locked);
        assert_eq!(machine.last_transitions(10).len(), 3);
    }

    #[test]
    fn test_timestamps_are_ordered() {
        let mut machine = StateMachine::new();
        machine.transition_to(LockState::Validating).unwrap();
        machine.transition_to(LockState::Invalid).unwrap();

        let history = machine.history();
        assert!(history[0].timestamp <= history[1].timestamp);
        assert!(machine.time_in_current_state() >= TimeDelta::zero());
    }

    #[test]
    fn test_transition_serialization() {
        let transition = StateTransition::new(LockState::Validating, LockState::Admin);
        let json = serde_json::to_string(&transition).unwrap();
        assert!(json.contains(r#""from":"validating""#));
        assert!(json.contains(r#""to":"admin""#));

        let back: StateTransition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transition);
    }
}

//! PIN secret and the attempt/lockout state machine.

use crate::config::Limits;
use crate::error::{AtmError, SecurityError};
use std::fmt;

/// A PIN. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Accepts exactly `length` ASCII digits, ignoring surrounding whitespace.
    pub fn parse(input: &str, length: usize) -> Result<Self, AtmError> {
        let trimmed = input.trim();
        if trimmed.len() != length || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AtmError::MalformedPin { length });
        }
        Ok(Pin(trimmed.to_string()))
    }

    /// Compares against a raw entry without allocating.
    pub fn matches(&self, input: &str) -> bool {
        self.0 == input.trim()
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Where the gate currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Accepting attempts; `attempts` consecutive failures so far.
    Unlocked { attempts: u32 },
    /// Terminal until [`SecurityGate::unlock`].
    Locked,
}

/// Per-user PIN attempt counter.
///
/// # States
///
/// - `Unlocked { attempts }` with `attempts < max_attempts`, initially 0
/// - `Locked`, reached after `max_attempts` consecutive failures
///
/// A correct PIN resets the counter. Attempts made while locked are
/// rejected without being counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGate {
    state: GateState,
    max_attempts: u32,
}

impl SecurityGate {
    pub fn new(max_attempts: u32) -> Self {
        SecurityGate {
            state: GateState::Unlocked { attempts: 0 },
            max_attempts,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    /// Checks one PIN entry against the stored PIN.
    pub fn attempt(&mut self, input_pin: &str, actual_pin: &Pin) -> Result<(), SecurityError> {
        let attempts = match self.state {
            GateState::Locked => return Err(SecurityError::AccountLocked),
            GateState::Unlocked { attempts } => attempts,
        };

        if actual_pin.matches(input_pin) {
            self.state = GateState::Unlocked { attempts: 0 };
            return Ok(());
        }

        let attempts = attempts + 1;
        if attempts >= self.max_attempts {
            self.state = GateState::Locked;
            Err(SecurityError::LockedOut)
        } else {
            self.state = GateState::Unlocked { attempts };
            Err(SecurityError::InvalidPin {
                remaining: self.max_attempts - attempts,
            })
        }
    }

    /// Clears a lockout. Only customer support calls this.
    pub fn unlock(&mut self) {
        self.state = GateState::Unlocked { attempts: 0 };
    }
}

impl Default for SecurityGate {
    fn default() -> Self {
        Self::new(Limits::MAX_ATTEMPTS)
    }
}

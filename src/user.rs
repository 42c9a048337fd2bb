//! A provisioned ATM user.

use crate::config::Limits;
use crate::error::SecurityError;
use crate::ledger::{Ledger, Taka};
use crate::security::{Pin, SecurityGate};
use crate::withdrawal::WithdrawalWindow;

/// One user and everything it exclusively owns: ledger, PIN gate and
/// daily withdrawal window.
#[derive(Debug, Clone)]
pub struct User {
    username: String,
    pin: Pin,
    pub(crate) ledger: Ledger,
    pub(crate) security: SecurityGate,
    pub(crate) window: WithdrawalWindow,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        pin: Pin,
        opening_balance: Taka,
        limits: &Limits,
    ) -> Self {
        User {
            username: username.into().trim().to_lowercase(),
            pin,
            ledger: Ledger::new(opening_balance),
            security: SecurityGate::new(limits.max_pin_attempts),
            window: WithdrawalWindow::default(),
        }
    }

    /// Trimmed, lowercased identifier.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn balance(&self) -> Taka {
        self.ledger.balance()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable handle for debit/credit; the balance itself stays private
    /// to [`Ledger`].
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn security(&self) -> &SecurityGate {
        &self.security
    }

    pub fn window(&self) -> &WithdrawalWindow {
        &self.window
    }

    pub fn is_locked(&self) -> bool {
        self.security.is_locked()
    }

    /// Runs one PIN entry through this user's gate.
    pub fn authenticate(&mut self, input_pin: &str) -> Result<(), SecurityError> {
        self.security.attempt(input_pin, &self.pin)
    }

    /// Customer-support reset of a lockout.
    pub fn unlock(&mut self) {
        self.security.unlock();
    }

    pub(crate) fn replace_pin(&mut self, new_pin: Pin) {
        self.pin = new_pin;
    }
}

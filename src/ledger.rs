//! Balance and transaction history for a single user.
//!
//! Maintains the invariant: the balance never goes negative, and every
//! change to it is paired with exactly one appended history record.

use crate::error::{BalanceOverflow, InsufficientFunds};
use std::fmt;

/// Amount in the smallest currency unit. No fractional precision.
pub type Taka = u64;

/// Which way money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
}

/// One immutable history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    direction: Direction,
    amount: Taka,
    description: String,
}

impl TransactionRecord {
    fn new(direction: Direction, amount: Taka, description: impl Into<String>) -> Self {
        TransactionRecord {
            direction,
            amount,
            description: description.into(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Unsigned magnitude.
    pub fn amount(&self) -> Taka {
        self.amount
    }

    /// Negative for debits, positive for credits.
    pub fn signed_amount(&self) -> i128 {
        match self.direction {
            Direction::Debit => -i128::from(self.amount),
            Direction::Credit => i128::from(self.amount),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }
}

/// Mini statement line, e.g. `-500 TAKA: Withdrawal`.
impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            Direction::Debit => '-',
            Direction::Credit => '+',
        };
        write!(f, "{}{} TAKA: {}", sign, self.amount, self.description)
    }
}

/// A user's balance plus its append-only history.
///
/// # Invariants
///
/// - `balance` is never negative (enforced by `Taka` and the debit check)
/// - History only grows, in the order operations were applied
/// - A failed debit or credit changes neither balance nor history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balance: Taka,
    history: Vec<TransactionRecord>,
}

impl Ledger {
    /// Creates a ledger with an opening balance and empty history.
    pub fn new(opening_balance: Taka) -> Self {
        Ledger {
            balance: opening_balance,
            history: Vec::new(),
        }
    }

    pub fn balance(&self) -> Taka {
        self.balance
    }

    /// Read-only view of the history, oldest first.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Removes `amount` from the balance and records it.
    ///
    /// Fails without side effects if `amount` exceeds the balance.
    pub fn debit(
        &mut self,
        amount: Taka,
        description: impl Into<String>,
    ) -> Result<(), InsufficientFunds> {
        if amount > self.balance {
            return Err(InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        self.history
            .push(TransactionRecord::new(Direction::Debit, amount, description));
        Ok(())
    }

    /// Checks that `amount` can be credited without overflowing.
    pub fn check_credit(&self, amount: Taka) -> Result<Taka, BalanceOverflow> {
        self.balance.checked_add(amount).ok_or(BalanceOverflow {
            amount,
            balance: self.balance,
        })
    }

    /// Adds `amount` to the balance and records it.
    ///
    /// Fails without side effects if the new balance would not fit in `Taka`.
    pub fn credit(
        &mut self,
        amount: Taka,
        description: impl Into<String>,
    ) -> Result<(), BalanceOverflow> {
        self.balance = self.check_credit(amount)?;
        self.history
            .push(TransactionRecord::new(Direction::Credit, amount, description));
        Ok(())
    }

    /// Returns `true` if the balance equals the opening balance plus the
    /// signed sum of the history.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self, opening_balance: Taka) -> bool {
        let net: i128 = self.history.iter().map(|r| r.signed_amount()).sum();
        i128::from(opening_balance) + net == i128::from(self.balance)
    }
}

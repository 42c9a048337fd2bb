//! Error types for the ATM ledger.
//!
//! Every core error is recoverable at the call site. A failed operation
//! never leaves a ledger partially mutated.

use crate::ledger::Taka;
use thiserror::Error;

/// Result type alias for session driver operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Rejections from the amount rule check.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// Amount is smaller than the configured minimum
    #[error("minimum amount is {minimum} TAKA")]
    BelowMinimum { minimum: Taka },

    /// Amount is not a whole multiple of the note size
    #[error("amount must be a multiple of {step} TAKA")]
    NotAMultiple { step: Taka },
}

/// A debit larger than the current balance.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("insufficient balance: requested {requested} TAKA, available {available} TAKA")]
pub struct InsufficientFunds {
    pub requested: Taka,
    pub available: Taka,
}

/// A credit that would push the balance past the largest representable amount.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("balance overflow: cannot add {amount} TAKA to {balance} TAKA")]
pub struct BalanceOverflow {
    pub amount: Taka,
    pub balance: Taka,
}

/// PIN check failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityError {
    /// The account was already locked before this attempt
    #[error("account is locked, please contact customer support")]
    AccountLocked,

    /// Wrong PIN, more attempts remain
    #[error("invalid PIN, {remaining} attempts remaining")]
    InvalidPin { remaining: u32 },

    /// Wrong PIN and this attempt exhausted the allowance
    #[error("too many failed attempts, account locked")]
    LockedOut,
}

/// Withdrawal cap violations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalError {
    #[error("maximum withdrawal per transaction is {limit} TAKA")]
    ExceedsPerTransactionLimit { limit: Taka },

    #[error("daily limit of {limit} TAKA reached ({withdrawn_today} TAKA withdrawn today)")]
    ExceedsDailyLimit { limit: Taka, withdrawn_today: Taka },
}

/// Any failure of a single ATM operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtmError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Funds(#[from] InsufficientFunds),

    #[error(transparent)]
    Overflow(#[from] BalanceOverflow),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),

    /// Username not present in the directory
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Sender and recipient are the same account
    #[error("cannot transfer funds to the same account")]
    SelfTransfer,

    /// New PIN and confirmation differ
    #[error("new PIN and confirmation PIN do not match")]
    PinMismatch,

    /// New PIN is not the right number of digits
    #[error("PIN must be exactly {length} digits")]
    MalformedPin { length: usize },
}

/// Errors raised by the scripted session driver.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Row could not be turned into a session command
    #[error("Invalid command at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Operation requires a logged-in user
    #[error("No active session at row {row}")]
    NoActiveSession { row: usize },

    /// Operation was rejected by the ledger core
    #[error("Row {row}: {source}")]
    Rejected {
        row: usize,
        #[source]
        source: AtmError,
    },

    /// Default roster could not be provisioned under the given limits
    #[error("Invalid roster: {0}")]
    Roster(#[source] AtmError),

    /// Limits file did not contain a row
    #[error("Limits file is empty")]
    EmptyLimits,

    /// Missing input file argument
    #[error("Missing input file argument. Usage: atm-ledger <session.csv> [limits.csv]")]
    MissingArgument,
}

//! # ATM Ledger
//!
//! The account and transaction engine behind a teaching ATM: PIN
//! authentication with lockout, balance inquiry, deposits, capped
//! withdrawals with an optional receipt fee, bill payments, mobile
//! top-ups and transfers between users.
//!
//! ## Design Principles
//!
//! - **Whole units**: amounts are `u64` TAKA, no fractional precision
//! - **All-or-nothing mutations**: a failed operation leaves balances and
//!   histories untouched
//! - **Injected limits and roster**: every constant lives in [`Limits`],
//!   users come from a [`Directory`]
//! - **No clock**: the daily withdrawal window is keyed by a caller-supplied
//!   [`DayEpoch`]
//!
//! ## Example
//!
//! ```
//! use atm_ledger::{AccountService, Limits, Pin, User};
//!
//! let limits = Limits::default();
//! let service = AccountService::new(&limits);
//! let mut alice = User::new("alice", Pin::parse("1234", 4).unwrap(), 50_000, &limits);
//! let mut bob = User::new("bob", Pin::parse("4321", 4).unwrap(), 60_000, &limits);
//!
//! alice.authenticate("1234").unwrap();
//! service.transfer(&mut alice, &mut bob, 1_000).unwrap();
//! assert_eq!(alice.balance(), 49_000);
//! assert_eq!(bob.balance(), 61_000);
//! ```

pub mod amount;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod security;
pub mod service;
pub mod session;
pub mod user;
pub mod withdrawal;

pub use amount::AmountValidator;
pub use config::Limits;
pub use directory::Directory;
pub use engine::{AtmEngine, Event, Outcome};
pub use error::{
    AmountError, AtmError, BalanceOverflow, EngineError, InsufficientFunds, Result, SecurityError,
    WithdrawalError,
};
pub use ledger::{Direction, Ledger, Taka, TransactionRecord};
pub use security::{GateState, Pin, SecurityGate};
pub use service::{AccountService, BillCategory, TransferOutcome};
pub use session::{CommandRecord, SessionCommand};
pub use user::User;
pub use withdrawal::{
    DayEpoch, ReceiptOutcome, WithdrawalOutcome, WithdrawalPolicy, WithdrawalWindow,
};

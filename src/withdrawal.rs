//! Cash withdrawal with per-transaction and per-day caps, and the
//! optional receipt fee.
//!
//! The receipt is a second, independent debit. If it cannot be paid the
//! receipt is simply not printed; the withdrawal stays committed.

use crate::amount::AmountValidator;
use crate::config::Limits;
use crate::error::{AtmError, InsufficientFunds, WithdrawalError};
use crate::ledger::{Ledger, Taka};
use log::debug;

pub const WITHDRAWAL_DESCRIPTION: &str = "Withdrawal";
pub const RECEIPT_FEE_DESCRIPTION: &str = "Receipt Fee";

/// Identifies a daily withdrawal window. Supplied by the caller; the
/// policy never reads a clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayEpoch(pub u64);

impl DayEpoch {
    pub fn next(self) -> Self {
        DayEpoch(self.0 + 1)
    }
}

/// Amount withdrawn by one user within one day epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithdrawalWindow {
    epoch: DayEpoch,
    total: Taka,
}

impl WithdrawalWindow {
    pub fn epoch(&self) -> DayEpoch {
        self.epoch
    }

    /// Total withdrawn as of `day`. A window from another epoch counts as empty.
    pub fn withdrawn_on(&self, day: DayEpoch) -> Taka {
        if self.epoch == day {
            self.total
        } else {
            0
        }
    }

    fn record(&mut self, day: DayEpoch, amount: Taka) {
        if self.epoch != day {
            self.epoch = day;
            self.total = 0;
        }
        self.total += amount;
    }
}

/// What happened to the receipt after a successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptOutcome {
    NotRequested,
    /// Fee debited, receipt printed.
    Printed { fee: Taka },
    /// Fee could not be paid; nothing printed, withdrawal kept.
    Declined(InsufficientFunds),
}

/// Result of a committed withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalOutcome {
    pub amount: Taka,
    pub receipt: ReceiptOutcome,
    pub balance: Taka,
}

/// Withdrawal caps layered over a [`Ledger`].
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalPolicy {
    validator: AmountValidator,
    max_per_transaction: Taka,
    max_per_day: Taka,
    receipt_fee: Taka,
}

impl WithdrawalPolicy {
    pub fn new(limits: &Limits) -> Self {
        WithdrawalPolicy {
            validator: AmountValidator::from_limits(limits),
            max_per_transaction: limits.max_per_transaction,
            max_per_day: limits.max_per_day,
            receipt_fee: limits.receipt_fee,
        }
    }

    /// Checks, in order, the per-transaction cap, the daily cap and the
    /// amount rules, then debits. The daily total grows only when the
    /// debit succeeds.
    pub fn withdraw(
        &self,
        ledger: &mut Ledger,
        window: &mut WithdrawalWindow,
        day: DayEpoch,
        amount: Taka,
    ) -> Result<Taka, AtmError> {
        if amount > self.max_per_transaction {
            return Err(WithdrawalError::ExceedsPerTransactionLimit {
                limit: self.max_per_transaction,
            }
            .into());
        }

        let withdrawn_today = window.withdrawn_on(day);
        if withdrawn_today.saturating_add(amount) > self.max_per_day {
            return Err(WithdrawalError::ExceedsDailyLimit {
                limit: self.max_per_day,
                withdrawn_today,
            }
            .into());
        }

        self.validator.validate(amount)?;
        ledger.debit(amount, WITHDRAWAL_DESCRIPTION)?;
        window.record(day, amount);

        debug!(
            "Withdrew {} TAKA, {} TAKA withdrawn in day {}",
            amount, window.total, day.0
        );
        Ok(ledger.balance())
    }

    /// Debits the receipt fee as its own step.
    pub fn charge_receipt(&self, ledger: &mut Ledger) -> Result<(), InsufficientFunds> {
        ledger.debit(self.receipt_fee, RECEIPT_FEE_DESCRIPTION)
    }

    /// Withdraws, then charges the receipt fee if asked. A declined fee
    /// does not roll back the withdrawal.
    pub fn withdraw_with_receipt(
        &self,
        ledger: &mut Ledger,
        window: &mut WithdrawalWindow,
        day: DayEpoch,
        amount: Taka,
        wants_receipt: bool,
    ) -> Result<WithdrawalOutcome, AtmError> {
        self.withdraw(ledger, window, day, amount)?;

        let receipt = if !wants_receipt {
            ReceiptOutcome::NotRequested
        } else {
            match self.charge_receipt(ledger) {
                Ok(()) => ReceiptOutcome::Printed {
                    fee: self.receipt_fee,
                },
                Err(e) => {
                    debug!("Receipt not printed: {}", e);
                    ReceiptOutcome::Declined(e)
                }
            }
        };

        Ok(WithdrawalOutcome {
            amount,
            receipt,
            balance: ledger.balance(),
        })
    }
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self::new(&Limits::default())
    }
}

//! Compound account operations.
//!
//! Every money-moving operation validates the amount first and only then
//! touches a ledger, so a rejected operation leaves no trace.

use crate::amount::AmountValidator;
use crate::config::Limits;
use crate::error::AtmError;
use crate::ledger::{Ledger, Taka};
use crate::security::Pin;
use crate::user::User;
use crate::withdrawal::{DayEpoch, WithdrawalOutcome, WithdrawalPolicy};
use log::{debug, info};
use std::fmt;

/// Utility bill types offered at the ATM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillCategory {
    Electricity,
    Water,
    Internet,
    Gas,
    Telephone,
    Tv,
    /// Any other bill, name stored capitalized.
    Other(String),
}

impl BillCategory {
    /// Maps a known name (any case) to its variant; anything else becomes
    /// [`BillCategory::Other`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        match name.to_lowercase().as_str() {
            "electricity" => BillCategory::Electricity,
            "water" => BillCategory::Water,
            "internet" => BillCategory::Internet,
            "gas" => BillCategory::Gas,
            "telephone" => BillCategory::Telephone,
            "tv" => BillCategory::Tv,
            _ => BillCategory::Other(capitalize(name)),
        }
    }
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BillCategory::Electricity => "Electricity",
            BillCategory::Water => "Water",
            BillCategory::Internet => "Internet",
            BillCategory::Gas => "Gas",
            BillCategory::Telephone => "Telephone",
            BillCategory::Tv => "TV",
            BillCategory::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// First character upper case, the rest lower case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Balances after a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub amount: Taka,
    pub source_balance: Taka,
    pub destination_balance: Taka,
}

/// Orchestrates deposits, payments, transfers, withdrawals and PIN changes.
#[derive(Debug, Clone, Copy)]
pub struct AccountService {
    validator: AmountValidator,
    withdrawals: WithdrawalPolicy,
    pin_length: usize,
}

impl AccountService {
    pub fn new(limits: &Limits) -> Self {
        AccountService {
            validator: AmountValidator::from_limits(limits),
            withdrawals: WithdrawalPolicy::new(limits),
            pin_length: limits.pin_length,
        }
    }

    /// Returns the new balance.
    pub fn deposit(&self, ledger: &mut Ledger, amount: Taka) -> Result<Taka, AtmError> {
        self.validator.validate(amount)?;
        ledger.credit(amount, "Deposit")?;
        debug!("Deposited {} TAKA", amount);
        Ok(ledger.balance())
    }

    /// Records `"<category> Bill Payment"`. Returns the new balance.
    pub fn pay_bill(
        &self,
        ledger: &mut Ledger,
        category: &BillCategory,
        amount: Taka,
    ) -> Result<Taka, AtmError> {
        self.validator.validate(amount)?;
        ledger.debit(amount, format!("{} Bill Payment", category))?;
        debug!("Paid {} bill of {} TAKA", category, amount);
        Ok(ledger.balance())
    }

    /// Records `"Mobile Top-up (<phone>)"`. Returns the new balance.
    pub fn mobile_top_up(
        &self,
        ledger: &mut Ledger,
        phone_number: &str,
        amount: Taka,
    ) -> Result<Taka, AtmError> {
        self.validator.validate(amount)?;
        ledger.debit(amount, format!("Mobile Top-up ({})", phone_number))?;
        debug!("Topped up {} with {} TAKA", phone_number, amount);
        Ok(ledger.balance())
    }

    /// Moves `amount` from `source` to `destination`.
    ///
    /// Holding both users mutably for the whole call makes the debit and
    /// credit one unit. The destination's headroom is checked before the
    /// debit, so once the debit succeeds the credit cannot fail, and any
    /// rejection leaves both ledgers unchanged.
    pub fn transfer(
        &self,
        source: &mut User,
        destination: &mut User,
        amount: Taka,
    ) -> Result<TransferOutcome, AtmError> {
        if source.username() == destination.username() {
            return Err(AtmError::SelfTransfer);
        }
        self.validator.validate(amount)?;
        destination.ledger.check_credit(amount)?;

        source
            .ledger
            .debit(amount, format!("Transfer to {}", destination.username()))?;
        destination
            .ledger
            .credit(amount, format!("Transfer from {}", source.username()))?;

        info!(
            "Transferred {} TAKA from {} to {}",
            amount,
            source.username(),
            destination.username()
        );
        Ok(TransferOutcome {
            amount,
            source_balance: source.balance(),
            destination_balance: destination.balance(),
        })
    }

    /// Cash withdrawal for `user` within `day`, with an optional receipt.
    pub fn withdraw(
        &self,
        user: &mut User,
        day: DayEpoch,
        amount: Taka,
        wants_receipt: bool,
    ) -> Result<WithdrawalOutcome, AtmError> {
        self.withdrawals.withdraw_with_receipt(
            &mut user.ledger,
            &mut user.window,
            day,
            amount,
            wants_receipt,
        )
    }

    /// Replaces the user's PIN.
    ///
    /// The current PIN goes through the user's security gate, so wrong
    /// entries count towards lockout. The new PIN must match its
    /// confirmation and have the configured number of digits.
    pub fn change_pin(
        &self,
        user: &mut User,
        current: &str,
        new_pin: &str,
        confirmation: &str,
    ) -> Result<(), AtmError> {
        user.authenticate(current)?;

        if new_pin.trim() != confirmation.trim() {
            return Err(AtmError::PinMismatch);
        }
        let pin = Pin::parse(new_pin, self.pin_length)?;
        user.replace_pin(pin);

        info!("PIN changed for {}", user.username());
        Ok(())
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new(&Limits::default())
    }
}

//! Session command models for CSV parsing.

use crate::ledger::Taka;
use crate::service::BillCategory;
use serde::Deserialize;
use std::fmt;

const REDACTED: &str = "****";

/// Raw session command as read from CSV.
///
/// Columns beyond `op` are optional; which ones are needed depends on the
/// operation.
#[derive(Default, Deserialize)]
pub struct CommandRecord {
    /// Operation name: login, logout, balance, statement, withdraw, deposit,
    /// bill, topup, transfer, change_pin, unlock, new_day
    pub op: String,

    /// Username for login and unlock
    #[serde(default)]
    pub user: Option<String>,

    /// PIN for login, current PIN for change_pin
    #[serde(default)]
    pub pin: Option<String>,

    /// Whole TAKA amount
    #[serde(default)]
    pub amount: Option<String>,

    /// Transfer recipient, or PIN confirmation for change_pin
    #[serde(default)]
    pub target: Option<String>,

    /// Bill category, phone number, or new PIN for change_pin
    #[serde(default)]
    pub detail: Option<String>,

    /// `y` or `n` for a withdrawal receipt
    #[serde(default)]
    pub receipt: Option<String>,
}

/// PIN-bearing columns print as `****`.
impl fmt::Debug for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let carries_pins = self.op.trim().eq_ignore_ascii_case("change_pin");
        let redact = |field: &Option<String>, secret: bool| match field {
            Some(_) if secret => Some(REDACTED.to_string()),
            other => other.clone(),
        };

        f.debug_struct("CommandRecord")
            .field("op", &self.op)
            .field("user", &self.user)
            .field("pin", &redact(&self.pin, true))
            .field("amount", &self.amount)
            .field("target", &redact(&self.target, carries_pins))
            .field("detail", &redact(&self.detail, carries_pins))
            .field("receipt", &self.receipt)
            .finish()
    }
}

impl CommandRecord {
    /// Parses the raw CSV record into a typed command.
    ///
    /// Returns a message naming the first problem found.
    pub fn parse(&self) -> Result<SessionCommand, String> {
        let op = self.op.trim().to_lowercase();

        let command = match op.as_str() {
            "login" => SessionCommand::Login {
                user: self.required("user", &self.user)?,
                pin: self.required("pin", &self.pin)?,
            },
            "logout" => SessionCommand::Logout,
            "balance" => SessionCommand::Balance,
            "statement" => SessionCommand::Statement,
            "withdraw" => SessionCommand::Withdraw {
                amount: self.parse_amount()?,
                wants_receipt: self.parse_receipt()?,
            },
            "deposit" => SessionCommand::Deposit {
                amount: self.parse_amount()?,
            },
            "bill" => SessionCommand::PayBill {
                category: BillCategory::from_name(&self.required("detail", &self.detail)?),
                amount: self.parse_amount()?,
            },
            "topup" => SessionCommand::TopUp {
                phone_number: self.required("detail", &self.detail)?,
                amount: self.parse_amount()?,
            },
            "transfer" => SessionCommand::Transfer {
                recipient: self.required("target", &self.target)?,
                amount: self.parse_amount()?,
            },
            "change_pin" => SessionCommand::ChangePin {
                current: self.required("pin", &self.pin)?,
                new_pin: self.required("detail", &self.detail)?,
                confirmation: self.required("target", &self.target)?,
            },
            "unlock" => SessionCommand::Unlock {
                user: self.required("user", &self.user)?,
            },
            "new_day" => SessionCommand::NewDay,
            other => return Err(format!("unknown operation '{}'", other)),
        };

        Ok(command)
    }

    fn required(&self, name: &str, field: &Option<String>) -> Result<String, String> {
        match field.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(format!("missing {} for {}", name, self.op.trim())),
        }
    }

    /// Whole, non-negative amounts only; anything else never reaches the core.
    fn parse_amount(&self) -> Result<Taka, String> {
        let raw = self.required("amount", &self.amount)?;
        raw.parse::<Taka>()
            .map_err(|_| format!("invalid amount '{}'", raw))
    }

    fn parse_receipt(&self) -> Result<bool, String> {
        match self.receipt.as_deref().map(|r| r.trim().to_lowercase()) {
            None => Ok(false),
            Some(r) => match r.as_str() {
                "" | "n" | "no" => Ok(false),
                "y" | "yes" => Ok(true),
                _ => Err(format!("invalid receipt flag '{}'", r)),
            },
        }
    }
}

/// A parsed session command ready for the engine.
///
/// `Debug` never prints PINs.
#[derive(Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Resolve the user and check the PIN; starts a session on success.
    Login { user: String, pin: String },

    Logout,

    Balance,

    /// Mini statement of the active user.
    Statement,

    Withdraw { amount: Taka, wants_receipt: bool },

    Deposit { amount: Taka },

    PayBill { category: BillCategory, amount: Taka },

    TopUp { phone_number: String, amount: Taka },

    Transfer { recipient: String, amount: Taka },

    ChangePin {
        current: String,
        new_pin: String,
        confirmation: String,
    },

    /// Customer support clears a lockout. No session needed.
    Unlock { user: String },

    /// Advance the day epoch used for the withdrawal cap.
    NewDay,
}

impl SessionCommand {
    /// Whether the command acts on the logged-in user.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            SessionCommand::Login { .. } | SessionCommand::Unlock { .. } | SessionCommand::NewDay
        )
    }
}

impl fmt::Debug for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCommand::Login { user, .. } => f
                .debug_struct("Login")
                .field("user", user)
                .field("pin", &REDACTED)
                .finish(),
            SessionCommand::Logout => f.write_str("Logout"),
            SessionCommand::Balance => f.write_str("Balance"),
            SessionCommand::Statement => f.write_str("Statement"),
            SessionCommand::Withdraw {
                amount,
                wants_receipt,
            } => f
                .debug_struct("Withdraw")
                .field("amount", amount)
                .field("wants_receipt", wants_receipt)
                .finish(),
            SessionCommand::Deposit { amount } => {
                f.debug_struct("Deposit").field("amount", amount).finish()
            }
            SessionCommand::PayBill { category, amount } => f
                .debug_struct("PayBill")
                .field("category", category)
                .field("amount", amount)
                .finish(),
            SessionCommand::TopUp {
                phone_number,
                amount,
            } => f
                .debug_struct("TopUp")
                .field("phone_number", phone_number)
                .field("amount", amount)
                .finish(),
            SessionCommand::Transfer { recipient, amount } => f
                .debug_struct("Transfer")
                .field("recipient", recipient)
                .field("amount", amount)
                .finish(),
            SessionCommand::ChangePin { .. } => f
                .debug_struct("ChangePin")
                .field("current", &REDACTED)
                .field("new_pin", &REDACTED)
                .field("confirmation", &REDACTED)
                .finish(),
            SessionCommand::Unlock { user } => {
                f.debug_struct("Unlock").field("user", user).finish()
            }
            SessionCommand::NewDay => f.write_str("NewDay"),
        }
    }
}

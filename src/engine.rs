//! Scripted ATM session driver.
//!
//! Reads session commands from CSV, resolves users through the
//! [`Directory`], authenticates them, and dispatches each command to the
//! ledger core. Only one session is active at a time.

use crate::config::Limits;
use crate::directory::Directory;
use crate::error::{AtmError, EngineError, Result};
use crate::ledger::Taka;
use crate::service::{AccountService, BillCategory, TransferOutcome};
use crate::session::{CommandRecord, SessionCommand};
use crate::user::User;
use crate::withdrawal::{DayEpoch, ReceiptOutcome, WithdrawalOutcome};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::io::{Read, Write};

/// What a successfully executed command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoggedIn { user: String },
    LoggedOut { user: String },
    Balance { user: String, balance: Taka },
    Statement { user: String, lines: Vec<String> },
    Withdrawn { user: String, outcome: WithdrawalOutcome },
    Deposited { user: String, balance: Taka },
    BillPaid { user: String, category: BillCategory, balance: Taka },
    ToppedUp { user: String, phone_number: String, balance: Taka },
    Transferred { from: String, to: String, outcome: TransferOutcome },
    PinChanged { user: String },
    Unlocked { user: String },
    DayStarted { day: DayEpoch },
}

/// Result of one CSV row, kept in input order.
#[derive(Debug)]
pub struct Outcome {
    /// 1-indexed row number, counting the header.
    pub row: usize,
    pub result: Result<Event>,
}

/// The session engine.
///
/// Owns the directory and the current day epoch. Commands that act on a
/// user require a prior successful `login`.
pub struct AtmEngine {
    directory: Directory,
    service: AccountService,
    day: DayEpoch,
    /// Username of the logged-in user.
    active: Option<String>,
    outcomes: Vec<Outcome>,
}

impl AtmEngine {
    /// Creates an engine over the default roster with default limits.
    pub fn new() -> Result<Self> {
        Self::with_limits(Limits::default())
    }

    /// Creates an engine over the default roster.
    pub fn with_limits(limits: Limits) -> Result<Self> {
        let directory = Directory::with_default_roster(&limits).map_err(EngineError::Roster)?;
        Ok(Self::with_directory(directory, limits))
    }

    /// Creates an engine over an injected directory.
    pub fn with_directory(directory: Directory, limits: Limits) -> Self {
        AtmEngine {
            directory,
            service: AccountService::new(&limits),
            day: DayEpoch::default(),
            active: None,
            outcomes: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn day(&self) -> DayEpoch {
        self.day
    }

    pub fn active_user(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Every processed row so far, in input order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Processes session commands from a CSV reader in streaming fashion.
    ///
    /// Invalid rows and rejected operations are logged at warn level,
    /// recorded as failed outcomes, and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row

            let result = match result {
                Ok(record) => match record.parse() {
                    Ok(command) => self.execute(command, row),
                    Err(message) => Err(EngineError::InvalidRecord { row, message }),
                },
                Err(e) => Err(EngineError::Csv(e)),
            };

            match &result {
                Ok(event) => debug!("Row {}: {:?}", row, event),
                Err(e) => warn!("Row {}: {}", row, e),
            }
            self.outcomes.push(Outcome { row, result });
        }

        Ok(())
    }

    /// Executes a single command.
    pub fn execute(&mut self, command: SessionCommand, row: usize) -> Result<Event> {
        let rejected = move |source: AtmError| EngineError::Rejected { row, source };

        let user = if command.needs_session() {
            self.active
                .clone()
                .ok_or(EngineError::NoActiveSession { row })?
        } else {
            String::new()
        };

        match command {
            SessionCommand::Login { user, pin } => self.login(&user, &pin).map_err(rejected),
            SessionCommand::Logout => {
                self.active = None;
                info!("{} logged out", user);
                Ok(Event::LoggedOut { user })
            }
            SessionCommand::Balance => {
                let balance = self.active_mut(&user).map_err(rejected)?.balance();
                Ok(Event::Balance { user, balance })
            }
            SessionCommand::Statement => {
                let lines = self
                    .active_mut(&user)
                    .map_err(rejected)?
                    .ledger()
                    .history()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                Ok(Event::Statement { user, lines })
            }
            SessionCommand::Withdraw {
                amount,
                wants_receipt,
            } => {
                let day = self.day;
                let service = self.service;
                let account = self.active_mut(&user).map_err(rejected)?;
                let outcome = service
                    .withdraw(account, day, amount, wants_receipt)
                    .map_err(rejected)?;
                if let ReceiptOutcome::Declined(e) = outcome.receipt {
                    info!("Row {}: receipt not printed for {}: {}", row, user, e);
                }
                Ok(Event::Withdrawn { user, outcome })
            }
            SessionCommand::Deposit { amount } => {
                let service = self.service;
                let account = self.active_mut(&user).map_err(rejected)?;
                let balance = service
                    .deposit(account.ledger_mut(), amount)
                    .map_err(rejected)?;
                Ok(Event::Deposited { user, balance })
            }
            SessionCommand::PayBill { category, amount } => {
                let service = self.service;
                let account = self.active_mut(&user).map_err(rejected)?;
                let balance = service
                    .pay_bill(account.ledger_mut(), &category, amount)
                    .map_err(rejected)?;
                Ok(Event::BillPaid {
                    user,
                    category,
                    balance,
                })
            }
            SessionCommand::TopUp {
                phone_number,
                amount,
            } => {
                let service = self.service;
                let account = self.active_mut(&user).map_err(rejected)?;
                let balance = service
                    .mobile_top_up(account.ledger_mut(), &phone_number, amount)
                    .map_err(rejected)?;
                Ok(Event::ToppedUp {
                    user,
                    phone_number,
                    balance,
                })
            }
            SessionCommand::Transfer { recipient, amount } => {
                let service = self.service;
                let (source, destination) = self
                    .directory
                    .pair_mut(&user, &recipient)
                    .map_err(rejected)?;
                let outcome = service
                    .transfer(source, destination, amount)
                    .map_err(rejected)?;
                Ok(Event::Transferred {
                    from: user,
                    to: destination.username().to_string(),
                    outcome,
                })
            }
            SessionCommand::ChangePin {
                current,
                new_pin,
                confirmation,
            } => {
                let service = self.service;
                let account = self.active_mut(&user).map_err(rejected)?;
                let result = service.change_pin(account, &current, &new_pin, &confirmation);
                if account.is_locked() {
                    warn!("{} locked during PIN change, ending session", user);
                    self.active = None;
                }
                result.map_err(rejected)?;
                Ok(Event::PinChanged { user })
            }
            SessionCommand::Unlock { user } => {
                let account = self.directory.require_mut(&user).map_err(rejected)?;
                account.unlock();
                let user = account.username().to_string();
                info!("Customer support unlocked {}", user);
                Ok(Event::Unlocked { user })
            }
            SessionCommand::NewDay => {
                self.day = self.day.next();
                info!("Started day {}", self.day.0);
                Ok(Event::DayStarted { day: self.day })
            }
        }
    }

    /// Resolves the user and runs one PIN attempt. Any earlier session
    /// ends first.
    fn login(&mut self, username: &str, pin: &str) -> std::result::Result<Event, AtmError> {
        if let Some(previous) = self.active.take() {
            debug!("Ending session of {} for new login", previous);
        }

        let account = self.directory.require_mut(username)?;
        account.authenticate(pin)?;

        let user = account.username().to_string();
        info!("{} logged in", user);
        self.active = Some(user.clone());
        Ok(Event::LoggedIn { user })
    }

    fn active_mut(&mut self, user: &str) -> std::result::Result<&mut User, AtmError> {
        self.directory.require_mut(user)
    }

    /// Writes final user states to CSV.
    ///
    /// Output is sorted by username for deterministic results.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["user", "balance", "transactions", "locked"])?;

        for user in self.directory.users() {
            csv_writer.write_record([
                user.username().to_string(),
                user.balance().to_string(),
                user.ledger().history().len().to_string(),
                user.is_locked().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

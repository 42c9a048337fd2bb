//! Username to user lookup.

use crate::config::Limits;
use crate::error::AtmError;
use crate::ledger::Taka;
use crate::security::Pin;
use crate::user::User;
use std::collections::HashMap;

/// Users provisioned by default: `(username, pin, opening balance)`.
pub const DEFAULT_ROSTER: [(&str, &str, Taka); 3] = [
    ("shehab", "1722", 50_000),
    ("ritu", "1740", 60_000),
    ("saba", "1631", 65_000),
];

/// Owns every user and resolves names case-insensitively.
///
/// Users live in a vector so two distinct users can be borrowed mutably
/// at once for a transfer.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<User>,
    index: HashMap<String, usize>,
}

impl Directory {
    pub fn new() -> Self {
        Directory {
            users: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Directory holding [`DEFAULT_ROSTER`].
    pub fn with_default_roster(limits: &Limits) -> Result<Self, AtmError> {
        let mut directory = Directory::new();
        for (username, pin, balance) in DEFAULT_ROSTER {
            let pin = Pin::parse(pin, limits.pin_length)?;
            directory.insert(User::new(username, pin, balance, limits));
        }
        Ok(directory)
    }

    /// Adds a user, replacing any existing user with the same name.
    pub fn insert(&mut self, user: User) {
        match self.index.get(user.username()) {
            Some(&idx) => self.users[idx] = user,
            None => {
                self.index.insert(user.username().to_string(), self.users.len());
                self.users.push(user);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.position(username).is_some()
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.position(username).map(|idx| &self.users[idx])
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut User> {
        self.position(username).map(move |idx| &mut self.users[idx])
    }

    /// Like [`Directory::get_mut`] but reports the missing name.
    pub fn require_mut(&mut self, username: &str) -> Result<&mut User, AtmError> {
        self.get_mut(username)
            .ok_or_else(|| AtmError::UnknownUser(username.to_string()))
    }

    /// Borrows two different users mutably.
    pub fn pair_mut(
        &mut self,
        source: &str,
        destination: &str,
    ) -> Result<(&mut User, &mut User), AtmError> {
        let src = self
            .position(source)
            .ok_or_else(|| AtmError::UnknownUser(source.to_string()))?;
        let dst = self
            .position(destination)
            .ok_or_else(|| AtmError::UnknownUser(destination.to_string()))?;

        if src == dst {
            return Err(AtmError::SelfTransfer);
        }

        if src < dst {
            let (head, tail) = self.users.split_at_mut(dst);
            Ok((&mut head[src], &mut tail[0]))
        } else {
            let (head, tail) = self.users.split_at_mut(src);
            Ok((&mut tail[0], &mut head[dst]))
        }
    }

    /// Users sorted by name.
    pub fn users(&self) -> Vec<&User> {
        let mut users: Vec<_> = self.users.iter().collect();
        users.sort_by(|a, b| a.username().cmp(b.username()));
        users
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.index.get(&username.trim().to_lowercase()).copied()
    }
}

//! Amount rule check applied before any balance mutation.

use crate::config::Limits;
use crate::error::AmountError;
use crate::ledger::Taka;

/// Stateless check that an amount is at least the minimum and a whole
/// multiple of the note size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountValidator {
    minimum: Taka,
    step: Taka,
}

impl AmountValidator {
    pub fn new(minimum: Taka, step: Taka) -> Self {
        AmountValidator { minimum, step }
    }

    pub fn from_limits(limits: &Limits) -> Self {
        Self::new(limits.min_amount, limits.amount_step)
    }

    /// Checks the minimum first, then the multiple rule.
    ///
    /// A zero step disables the multiple rule.
    pub fn validate(&self, amount: Taka) -> Result<(), AmountError> {
        if amount < self.minimum {
            return Err(AmountError::BelowMinimum {
                minimum: self.minimum,
            });
        }
        if self.step != 0 && amount % self.step != 0 {
            return Err(AmountError::NotAMultiple { step: self.step });
        }
        Ok(())
    }
}

impl Default for AmountValidator {
    fn default() -> Self {
        Self::from_limits(&Limits::default())
    }
}

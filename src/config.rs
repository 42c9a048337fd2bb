//! Configurable limits shared by every component.

use crate::ledger::Taka;
use serde::Deserialize;

/// Monetary and security limits.
///
/// Components copy what they need at construction, so one `Limits`
/// value configures a whole engine. Missing fields fall back to the
/// defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Smallest accepted amount.
    pub min_amount: Taka,

    /// Amounts must be whole multiples of this note size.
    pub amount_step: Taka,

    /// Charged for a printed withdrawal receipt.
    pub receipt_fee: Taka,

    /// Largest single withdrawal.
    pub max_per_transaction: Taka,

    /// Largest total withdrawn within one day window.
    pub max_per_day: Taka,

    /// Consecutive wrong PINs before lockout.
    pub max_pin_attempts: u32,

    /// Number of digits in a PIN.
    pub pin_length: usize,
}

impl Limits {
    pub const MIN_AMOUNT: Taka = 500;
    pub const AMOUNT_STEP: Taka = 500;
    pub const RECEIPT_FEE: Taka = 3;
    pub const MAX_WITHDRAWAL_PER_TRANSACTION: Taka = 20_000;
    pub const MAX_WITHDRAWAL_PER_DAY: Taka = 80_000;
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const PIN_LENGTH: usize = 4;
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            min_amount: Self::MIN_AMOUNT,
            amount_step: Self::AMOUNT_STEP,
            receipt_fee: Self::RECEIPT_FEE,
            max_per_transaction: Self::MAX_WITHDRAWAL_PER_TRANSACTION,
            max_per_day: Self::MAX_WITHDRAWAL_PER_DAY,
            max_pin_attempts: Self::MAX_ATTEMPTS,
            pin_length: Self::PIN_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_atm_constants() {
        let limits = Limits::default();
        assert_eq!(limits.min_amount, 500);
        assert_eq!(limits.amount_step, 500);
        assert_eq!(limits.receipt_fee, 3);
        assert_eq!(limits.max_per_transaction, 20_000);
        assert_eq!(limits.max_per_day, 80_000);
        assert_eq!(limits.max_pin_attempts, 3);
        assert_eq!(limits.pin_length, 4);
    }

    #[test]
    fn test_partial_csv_row_keeps_defaults() {
        let data = "receipt_fee,max_per_day\n5,40000\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let limits: Limits = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(limits.receipt_fee, 5);
        assert_eq!(limits.max_per_day, 40_000);
        assert_eq!(limits.min_amount, 500);
        assert_eq!(limits.max_pin_attempts, 3);
    }
}

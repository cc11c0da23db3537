//! Sign convention for presenting balances.
//!
//! Stored balances are on the account's normal side. Reports show
//! credit-normal accounts as positive magnitudes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::AccountType;

/// A balance ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBalance {
    /// Amount to show.
    pub amount: Decimal,
    /// Whether the amount reads as a normal (non-contra) balance.
    pub is_positive: bool,
}

impl DisplayBalance {
    /// Display form of a stored balance.
    #[must_use]
    pub fn for_account(account_type: AccountType, stored: Decimal) -> Self {
        let stored = normalize_zero(stored);
        match account_type {
            AccountType::Revenue | AccountType::Liability | AccountType::Equity => Self {
                amount: stored.abs(),
                is_positive: true,
            },
            AccountType::Asset | AccountType::Expense => Self {
                amount: stored,
                is_positive: stored >= Decimal::ZERO,
            },
        }
    }
}

/// Turns `-0` into `0`.
#[must_use]
pub fn normalize_zero(amount: Decimal) -> Decimal {
    if amount.is_zero() { Decimal::ZERO } else { amount }
}

//! Imbalance tolerance for generated journals.
//!
//! Sales journals are assembled from rounded document totals, so they can be
//! off by a few rupiah. Small differences are absorbed into the first debit
//! line; large ones are rejected.

use rust_decimal::Decimal;
use saldo_shared::{LedgerSettings, PostingSettings};
use serde::{Deserialize, Serialize};

use super::draft::JournalDraft;
use super::error::LedgerError;

/// How a draft was brought into balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    /// Already balanced.
    Balanced,
    /// Rounding difference absorbed into the first debit line.
    Rounded {
        /// Amount added to the first debit line (may be negative).
        adjustment: Decimal,
    },
    /// Larger difference absorbed into the first debit line.
    Adjusted {
        /// Amount added to the first debit line (may be negative).
        adjustment: Decimal,
    },
    /// Small difference left in place.
    Accepted {
        /// Debit minus credit.
        residual: Decimal,
    },
}

impl Settlement {
    /// Whether the first debit line was changed.
    #[must_use]
    pub const fn is_adjusted(&self) -> bool {
        matches!(self, Self::Rounded { .. } | Self::Adjusted { .. })
    }
}

/// Tolerance rules for one kind of journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePolicy {
    /// Difference treated as rounding.
    pub rounding_limit: Decimal,
    /// Largest difference that may be adjusted.
    pub adjust_limit: Decimal,
    /// Leave rounding differences unadjusted.
    pub accept_residual: bool,
}

impl BalancePolicy {
    /// No tolerance at all.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            rounding_limit: Decimal::ZERO,
            adjust_limit: Decimal::ZERO,
            accept_residual: false,
        }
    }

    /// Tolerant policy from configuration.
    #[must_use]
    pub fn tolerant(posting: &PostingSettings, ledger: &LedgerSettings) -> Self {
        Self {
            rounding_limit: posting.balance_tolerance,
            adjust_limit: posting.adjust_tolerance.max(posting.balance_tolerance),
            accept_residual: !ledger.require_balanced_entry,
        }
    }

    /// Largest residual a posted journal may carry under this policy.
    #[must_use]
    pub fn residual_limit(&self) -> Decimal {
        if self.accept_residual {
            self.rounding_limit
        } else {
            Decimal::ZERO
        }
    }

    /// Brings `draft` into balance or explains why it cannot be.
    pub fn settle(&self, draft: &mut JournalDraft) -> Result<Settlement, LedgerError> {
        let totals = draft.totals();
        let difference = totals.difference();

        if difference.is_zero() {
            return Ok(Settlement::Balanced);
        }

        let magnitude = difference.abs();
        if magnitude > self.adjust_limit {
            if self.adjust_limit.is_zero() {
                return Err(LedgerError::Unbalanced {
                    debit: totals.total_debit,
                    credit: totals.total_credit,
                });
            }
            return Err(LedgerError::ImbalanceTooLarge {
                difference,
                limit: self.adjust_limit,
            });
        }

        if magnitude <= self.rounding_limit && self.accept_residual {
            return Ok(Settlement::Accepted {
                residual: difference,
            });
        }

        let unbalanced = LedgerError::Unbalanced {
            debit: totals.total_debit,
            credit: totals.total_credit,
        };
        let index = draft.first_debit().ok_or_else(|| unbalanced.clone())?;
        let adjusted = draft.lines[index].debit - difference;
        if adjusted <= Decimal::ZERO {
            return Err(unbalanced);
        }
        draft.lines[index].debit = adjusted;

        let adjustment = -difference;
        if magnitude <= self.rounding_limit {
            Ok(Settlement::Rounded { adjustment })
        } else {
            Ok(Settlement::Adjusted { adjustment })
        }
    }
}

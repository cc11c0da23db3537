//! Reconciliation result types.

use std::fmt;

use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, JournalId};
use serde::{Deserialize, Serialize};

use crate::ledger::JournalSource;

/// How far off a balance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Up to 1.
    Low,
    /// Up to 1,000.
    Medium,
    /// Up to 1,000,000.
    High,
    /// Anything larger, and every double posting.
    Critical,
}

impl Severity {
    /// Severity of an absolute difference.
    #[must_use]
    pub fn for_difference(difference: Decimal) -> Self {
        let abs = difference.abs();
        if abs <= Decimal::ONE {
            Self::Low
        } else if abs <= Decimal::ONE_THOUSAND {
            Self::Medium
        } else if abs <= Decimal::from(1_000_000) {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached balance that disagrees with the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDiscrepancy {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Whether the derived figure is a roll-up of children.
    pub is_header: bool,
    /// Balance stored on the account.
    pub cached: Decimal,
    /// Balance derived from posted lines.
    pub derived: Decimal,
    /// Cached minus derived.
    pub difference: Decimal,
    /// Severity of the difference.
    pub severity: Severity,
}

/// Posted journal whose totals differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbalancedJournal {
    /// Journal ID.
    pub journal_id: JournalId,
    /// Entry number.
    pub entry_number: String,
    /// Sum of debit lines.
    pub total_debit: Decimal,
    /// Sum of credit lines.
    pub total_credit: Decimal,
    /// Debit minus credit.
    pub difference: Decimal,
}

/// Account whose cached balance is exactly twice the derived one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoublePosting {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Balance stored on the account.
    pub cached: Decimal,
    /// Balance derived from posted lines.
    pub derived: Decimal,
    /// Always critical.
    pub severity: Severity,
}

/// Result of an integrity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Accounts compared.
    pub accounts_checked: usize,
    /// Journals checked for balance.
    pub journals_checked: usize,
    /// Cached versus derived mismatches.
    pub discrepancies: Vec<BalanceDiscrepancy>,
    /// Posted journals with unequal totals.
    pub unbalanced_journals: Vec<UnbalancedJournal>,
    /// Suspected double postings.
    pub double_postings: Vec<DoublePosting>,
}

impl IntegrityReport {
    /// Whether no check failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.discrepancies.is_empty()
            && self.unbalanced_journals.is_empty()
            && self.double_postings.is_empty()
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed_checks(&self) -> usize {
        self.discrepancies.len() + self.unbalanced_journals.len() + self.double_postings.len()
    }

    /// Highest severity found, if any check failed.
    #[must_use]
    pub fn worst_severity(&self) -> Option<Severity> {
        let unbalanced = (!self.unbalanced_journals.is_empty()).then_some(Severity::Critical);
        self.discrepancies
            .iter()
            .map(|d| d.severity)
            .chain(self.double_postings.iter().map(|d| d.severity))
            .chain(unbalanced)
            .max()
    }

    /// Percentage of checks that passed, rounded to 2 dp.
    ///
    /// 100 when nothing was checked.
    #[must_use]
    pub fn health_score(&self) -> Decimal {
        let total = self.accounts_checked + self.journals_checked;
        if total == 0 {
            return Decimal::ONE_HUNDRED;
        }
        let passed = total.saturating_sub(self.failed_checks());
        (Decimal::from(passed) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
    }
}

/// Adjustment that sets a cached balance to the derived value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCorrection {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Current cached balance.
    pub from: Decimal,
    /// Corrected balance.
    pub to: Decimal,
}

/// Net balance of one account in both ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDifference {
    /// Account code.
    pub account_code: String,
    /// Debit minus credit in the legacy ledger.
    pub legacy: Decimal,
    /// Debit minus credit in the unified ledger.
    pub unified: Decimal,
    /// Legacy minus unified.
    pub difference: Decimal,
    /// Severity of the difference.
    pub severity: Severity,
}

/// Legacy versus unified ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerComparison {
    /// Accounts present in both ledgers whose nets differ.
    pub differences: Vec<LedgerDifference>,
    /// Accounts posted only in the unified ledger.
    pub missing_in_legacy: Vec<String>,
    /// Accounts posted only in the legacy ledger.
    pub missing_in_unified: Vec<String>,
    /// Sources with a journal only in the legacy ledger.
    pub journals_only_in_legacy: Vec<JournalSource>,
    /// Sources with a journal only in the unified ledger.
    pub journals_only_in_unified: Vec<JournalSource>,
}

impl LedgerComparison {
    /// Whether both ledgers agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.differences.is_empty()
            && self.missing_in_legacy.is_empty()
            && self.missing_in_unified.is_empty()
            && self.journals_only_in_legacy.is_empty()
            && self.journals_only_in_unified.is_empty()
    }
}

//! Balance integrity and ledger reconciliation.
//!
//! Cached account balances are checked against balances derived from posted
//! lines, and the legacy ledger against the unified one.

pub mod compare;
pub mod integrity;
pub mod types;

#[cfg(test)]
mod integrity_props;

pub use compare::compare_ledgers;
pub use integrity::{
    find_double_postings, find_unbalanced_journals, plan_corrections, verify_cached_balances,
};
pub use types::{
    BalanceCorrection, BalanceDiscrepancy, DoublePosting, IntegrityReport, LedgerComparison,
    LedgerDifference, Severity, UnbalancedJournal,
};

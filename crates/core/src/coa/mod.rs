//! Chart of accounts.
//!
//! - Account types and their normal balance side
//! - Hierarchy validation and header roll-up
//! - Posting eligibility and fallback resolution
//! - Display sign convention

pub mod chart;
pub mod display;
pub mod error;
pub mod types;

pub use chart::ChartOfAccounts;
pub use display::{DisplayBalance, normalize_zero};
pub use error::ChartError;
pub use types::{Account, AccountType};

use crate::ledger::LedgerError;

impl ChartOfAccounts {
    /// Account that can take postings: exists, active, not a header.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, `AccountInactive` or `HeaderAccount`.
    pub fn postable(&self, code: &str) -> Result<&Account, LedgerError> {
        let account = self
            .by_code(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(account.code.clone()));
        }
        if account.is_header {
            return Err(LedgerError::HeaderAccount(account.code.clone()));
        }
        Ok(account)
    }

    /// Postable account for `code`, or for `fallback` when `code` is missing.
    ///
    /// # Errors
    ///
    /// As [`ChartOfAccounts::postable`]; a missing pair reports the primary code.
    pub fn resolve(&self, code: &str, fallback: Option<&str>) -> Result<&Account, LedgerError> {
        match (self.by_code(code), fallback) {
            (None, Some(fallback)) if self.by_code(fallback).is_some() => self.postable(fallback),
            _ => self.postable(code),
        }
    }
}

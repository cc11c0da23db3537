//! Unposted journals built by the posting rules.
//!
//! A draft refers to accounts by code. It becomes a [`JournalEntry`] once the
//! codes are resolved against the chart of accounts.
//!
//! [`JournalEntry`]: super::entry::JournalEntry

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{EntryType, JournalSource, JournalTotals};

/// One line of a draft journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    /// Primary account code.
    pub account_code: String,
    /// Account used when the primary code is not in the chart.
    pub fallback_code: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub memo: String,
}

impl DraftLine {
    /// Debit line.
    #[must_use]
    pub fn debit(code: impl Into<String>, amount: Decimal, memo: impl Into<String>) -> Self {
        Self {
            account_code: code.into(),
            fallback_code: None,
            debit: amount,
            credit: Decimal::ZERO,
            memo: memo.into(),
        }
    }

    /// Credit line.
    #[must_use]
    pub fn credit(code: impl Into<String>, amount: Decimal, memo: impl Into<String>) -> Self {
        Self {
            account_code: code.into(),
            fallback_code: None,
            debit: Decimal::ZERO,
            credit: amount,
            memo: memo.into(),
        }
    }

    /// Sets the fallback account code.
    #[must_use]
    pub fn or_account(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_code = Some(fallback.into());
        self
    }

    /// Side of the line.
    #[must_use]
    pub fn entry_type(&self) -> EntryType {
        if self.debit > Decimal::ZERO {
            EntryType::Debit
        } else {
            EntryType::Credit
        }
    }

    /// Amount on the line's side.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit.max(self.credit)
    }

    /// Same line with debit and credit swapped.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            account_code: self.account_code.clone(),
            fallback_code: self.fallback_code.clone(),
            debit: self.credit,
            credit: self.debit,
            memo: self.memo.clone(),
        }
    }
}

/// A journal that has not been posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    /// Business event.
    pub source: JournalSource,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Lines.
    pub lines: Vec<DraftLine>,
}

impl JournalDraft {
    /// Empty draft.
    #[must_use]
    pub fn new(source: JournalSource, entry_date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            source,
            entry_date,
            description: description.into(),
            lines: Vec::new(),
        }
    }

    /// Appends a line; lines without a positive amount are dropped.
    pub fn push(&mut self, line: DraftLine) -> &mut Self {
        if line.debit > Decimal::ZERO || line.credit > Decimal::ZERO {
            self.lines.push(line);
        }
        self
    }

    /// Debit and credit totals.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        JournalTotals::new(
            self.lines.iter().map(|l| l.debit).sum(),
            self.lines.iter().map(|l| l.credit).sum(),
        )
    }

    /// Index of the first debit line.
    #[must_use]
    pub fn first_debit(&self) -> Option<usize> {
        self.lines.iter().position(|l| l.debit > Decimal::ZERO)
    }
}

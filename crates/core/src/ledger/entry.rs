//! Posted journal entries and their lines.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, JournalId, JournalLineId, UserId};
use serde::{Deserialize, Serialize};

use super::types::{EntryType, JournalSource, JournalStatus, JournalTotals};

/// A single debit or credit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line ID.
    pub id: JournalLineId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Code of the account posted to.
    pub account_code: String,
    /// Debit amount, zero on credit lines.
    pub debit: Decimal,
    /// Credit amount, zero on debit lines.
    pub credit: Decimal,
    /// Line memo.
    pub memo: String,
    /// 1-based position within the journal.
    pub line_number: u32,
}

impl JournalLine {
    /// Side of this line.
    #[must_use]
    pub fn entry_type(&self) -> EntryType {
        if self.debit > Decimal::ZERO {
            EntryType::Debit
        } else {
            EntryType::Credit
        }
    }

    /// Positive amount on whichever side the line is.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit.max(self.credit)
    }
}

/// Immutable journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Journal ID.
    pub id: JournalId,
    /// Sequential entry number, e.g. `JE-2026-000001`.
    pub entry_number: String,
    /// Business event that produced the entry.
    pub source: JournalSource,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Lifecycle status.
    pub status: JournalStatus,
    /// Lines in posting order.
    pub lines: Vec<JournalLine>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Entry this one reverses.
    pub reversal_of: Option<JournalId>,
    /// Entry that reversed this one.
    pub reversed_by: Option<JournalId>,
    /// User who posted the entry.
    pub created_by: UserId,
    /// Posting timestamp.
    pub posted_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Builds a posted entry; totals are computed from the lines.
    #[must_use]
    pub fn posted(
        entry_number: String,
        source: JournalSource,
        entry_date: NaiveDate,
        description: String,
        lines: Vec<JournalLine>,
        created_by: UserId,
    ) -> Self {
        let totals = totals_of(&lines);
        Self {
            id: JournalId::new(),
            entry_number,
            source,
            entry_date,
            description,
            status: JournalStatus::Posted,
            lines,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            reversal_of: None,
            reversed_by: None,
            created_by,
            posted_at: Utc::now(),
        }
    }

    /// Recomputes totals from the lines, ignoring the stored header totals.
    #[must_use]
    pub fn line_totals(&self) -> JournalTotals {
        totals_of(&self.lines)
    }

    /// Whether the lines balance exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.line_totals().is_balanced()
    }

    /// Whether the lines count toward balances.
    #[must_use]
    pub const fn is_effective(&self) -> bool {
        self.status.counts_toward_balance()
    }
}

fn totals_of(lines: &[JournalLine]) -> JournalTotals {
    let debit = lines.iter().map(|l| l.debit).sum();
    let credit = lines.iter().map(|l| l.credit).sum();
    JournalTotals::new(debit, credit)
}

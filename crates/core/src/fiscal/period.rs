//! Closed accounting periods.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use saldo_shared::types::{JournalId, PeriodId, UserId};
use serde::{Deserialize, Serialize};

use super::error::ClosingError;

/// A closed accounting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Revenue closed to retained earnings.
    pub total_revenue: Decimal,
    /// Expense closed to retained earnings.
    pub total_expense: Decimal,
    /// Revenue minus expense.
    pub net_income: Decimal,
    /// Journal that zeroed the temporary accounts.
    pub closing_journal_id: Option<JournalId>,
    /// User who closed the period.
    pub closed_by: UserId,
    /// When the period was closed.
    pub closed_at: DateTime<Utc>,
    /// Locked periods can never be reopened.
    pub is_locked: bool,
}

impl AccountingPeriod {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if `[start, end]` shares at least one day with this period.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }
}

/// Most recent closing and where the next period starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastClosing {
    /// Latest closed period.
    pub period: AccountingPeriod,
    /// Day after the latest period ends.
    pub next_start: NaiveDate,
}

/// Returns true if `date` falls in any closed period.
#[must_use]
pub fn is_date_in_closed_period(date: NaiveDate, periods: &[AccountingPeriod]) -> bool {
    periods.iter().any(|p| p.contains_date(date))
}

/// Latest closed period by end date.
#[must_use]
pub fn last_closing(periods: &[AccountingPeriod]) -> Option<LastClosing> {
    periods.iter().max_by_key(|p| p.end_date).map(|p| LastClosing {
        period: p.clone(),
        next_start: p.end_date + Duration::days(1),
    })
}

/// Checks that `[start, end]` can be closed.
///
/// # Errors
///
/// `InvalidDateRange` when `end < start`; `PeriodOverlap` when the range
/// touches an already closed period.
pub fn validate_new_period(
    start: NaiveDate,
    end: NaiveDate,
    periods: &[AccountingPeriod],
) -> Result<(), ClosingError> {
    if end < start {
        return Err(ClosingError::InvalidDateRange { start, end });
    }
    if let Some(existing) = periods.iter().find(|p| p.overlaps(start, end)) {
        return Err(ClosingError::PeriodOverlap {
            start: existing.start_date,
            end: existing.end_date,
        });
    }
    Ok(())
}

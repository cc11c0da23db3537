//! Reversal service for posted journals.
//!
//! Posted journals are never edited or deleted. Undoing one means posting a
//! second journal with every debit and credit swapped.

use chrono::NaiveDate;
use saldo_shared::types::JournalId;
use serde::{Deserialize, Serialize};

use crate::ledger::{DraftLine, JournalDraft, JournalEntry, JournalSource, JournalStatus, SourceType};
use crate::workflow::error::ReversalError;

/// A validated reversal, ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalPlan {
    /// Journal being reversed.
    pub original_id: JournalId,
    /// Entry number of the journal being reversed.
    pub original_number: String,
    /// Trimmed reason.
    pub reason: String,
    /// Reversing journal.
    pub draft: JournalDraft,
}

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversing journal for `entry`.
    ///
    /// For each original line:
    /// - Debits become credits
    /// - Credits become debits
    /// - Memo is prefixed with "Reversal: "
    ///
    /// # Arguments
    /// * `entry` - The posted journal to reverse
    /// * `reason` - Why it is reversed; at least `min_reason_len` characters once trimmed
    /// * `date` - Accounting date of the reversal
    /// * `min_reason_len` - Minimum reason length
    ///
    /// # Errors
    ///
    /// `NotPosted`, `AlreadyReversed`, `ClosingEntry`, `ReversalEntry`,
    /// `Unbalanced` or `ReasonTooShort`, checked in that order.
    pub fn build(
        entry: &JournalEntry,
        reason: &str,
        date: NaiveDate,
        min_reason_len: usize,
    ) -> Result<ReversalPlan, ReversalError> {
        Self::validate(entry, reason, min_reason_len)?;

        let mut draft = JournalDraft::new(
            JournalSource::document(
                SourceType::Reversal,
                entry.id.into(),
                format!("REV-{}", entry.entry_number),
            ),
            date,
            format!("REVERSAL: {}", entry.description),
        );
        for line in &entry.lines {
            draft.push(DraftLine {
                account_code: line.account_code.clone(),
                fallback_code: None,
                debit: line.credit,
                credit: line.debit,
                memo: format!("Reversal: {}", line.memo),
            });
        }

        Ok(ReversalPlan {
            original_id: entry.id,
            original_number: entry.entry_number.clone(),
            reason: reason.trim().to_string(),
            draft,
        })
    }

    /// Checks that `entry` may be reversed.
    ///
    /// # Errors
    ///
    /// As [`ReversalService::build`].
    pub fn validate(entry: &JournalEntry, reason: &str, min_reason_len: usize) -> Result<(), ReversalError> {
        match entry.status {
            JournalStatus::Posted if entry.reversed_by.is_none() => {}
            JournalStatus::Posted | JournalStatus::Reversed => {
                return Err(ReversalError::AlreadyReversed(entry.entry_number.clone()));
            }
            JournalStatus::Draft => {
                return Err(ReversalError::NotPosted {
                    entry_number: entry.entry_number.clone(),
                    status: entry.status,
                });
            }
        }

        if entry.source.source_type == SourceType::Closing {
            return Err(ReversalError::ClosingEntry(entry.entry_number.clone()));
        }

        // the original stays reversed; the document is reposted instead
        if entry.source.source_type == SourceType::Reversal {
            return Err(ReversalError::ReversalEntry(entry.entry_number.clone()));
        }

        let totals = entry.line_totals();
        if !totals.is_balanced() {
            return Err(ReversalError::Unbalanced {
                entry_number: entry.entry_number.clone(),
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        if reason.trim().chars().count() < min_reason_len {
            return Err(ReversalError::ReasonTooShort { min: min_reason_len });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EntryType, JournalLine};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use saldo_shared::types::{AccountId, JournalLineId, UserId};
    use uuid::Uuid;

    fn line(code: &str, debit: Decimal, credit: Decimal, memo: &str) -> JournalLine {
        JournalLine {
            id: JournalLineId::new(),
            account_id: AccountId::new(),
            account_code: code.into(),
            debit,
            credit,
            memo: memo.into(),
            line_number: 1,
        }
    }

    fn posted(source_type: SourceType) -> JournalEntry {
        JournalEntry::posted(
            "JE-000001".into(),
            JournalSource::document(source_type, Uuid::now_v7(), "SALE-SO-1"),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            "Sales Invoice INV-1".into(),
            vec![
                line("1201", dec!(1110000), Decimal::ZERO, "AR"),
                line("4101", Decimal::ZERO, dec!(1000000), "Revenue"),
                line("2103", Decimal::ZERO, dec!(110000), "PPN"),
            ],
            UserId::new(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_reversal_swaps_lines() {
        let entry = posted(SourceType::Sale);
        let plan = ReversalService::build(&entry, "  Invoice cancelled by customer ", date(), 10).unwrap();

        assert_eq!(plan.draft.lines.len(), 3);
        assert_eq!(plan.draft.lines[0].entry_type(), EntryType::Credit);
        assert_eq!(plan.draft.lines[0].credit, dec!(1110000));
        assert_eq!(plan.draft.lines[1].debit, dec!(1000000));
        assert_eq!(plan.draft.lines[0].memo, "Reversal: AR");
        assert_eq!(plan.draft.description, "REVERSAL: Sales Invoice INV-1");
        assert_eq!(plan.draft.source.source_type, SourceType::Reversal);
        assert_eq!(plan.draft.source.source_id, Some(entry.id.into()));
        assert_eq!(plan.draft.source.reference, "REV-JE-000001");
        assert_eq!(plan.reason, "Invoice cancelled by customer");
        assert!(plan.draft.totals().is_balanced());
    }

    #[test]
    fn test_already_reversed_rejected() {
        let mut entry = posted(SourceType::Sale);
        entry.status = JournalStatus::Reversed;
        entry.reversed_by = Some(JournalId::new());
        assert_eq!(
            ReversalService::build(&entry, "Duplicate invoice", date(), 10).unwrap_err(),
            ReversalError::AlreadyReversed("JE-000001".into())
        );
    }

    #[test]
    fn test_draft_rejected() {
        let mut entry = posted(SourceType::Sale);
        entry.status = JournalStatus::Draft;
        assert_eq!(
            ReversalService::build(&entry, "Duplicate invoice", date(), 10)
                .unwrap_err()
                .error_code(),
            "JOURNAL_NOT_POSTED"
        );
    }

    #[test]
    fn test_closing_entry_rejected() {
        let entry = posted(SourceType::Closing);
        assert_eq!(
            ReversalService::build(&entry, "Reopen the period", date(), 10).unwrap_err(),
            ReversalError::ClosingEntry("JE-000001".into())
        );
    }

    #[test]
    fn test_reversal_entry_rejected() {
        let entry = posted(SourceType::Reversal);
        let err = ReversalService::build(&entry, "Undo the cancellation", date(), 10).unwrap_err();
        assert_eq!(err, ReversalError::ReversalEntry("JE-000001".into()));
        assert_eq!(err.error_code(), "REVERSAL_NOT_REVERSIBLE");
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let mut entry = posted(SourceType::Sale);
        entry.lines.pop();
        assert!(matches!(
            ReversalService::build(&entry, "Duplicate invoice", date(), 10),
            Err(ReversalError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_short_reason_rejected() {
        let entry = posted(SourceType::Sale);
        assert_eq!(
            ReversalService::build(&entry, "  oops     ", date(), 10).unwrap_err(),
            ReversalError::ReasonTooShort { min: 10 }
        );
    }
}

//! Ledger service: turns a draft into postable lines.
//!
//! Pure business logic. Account lookups and closed-period checks are injected
//! as closures so the same rules run against any store.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use saldo_shared::LedgerSettings;
use saldo_shared::types::{AccountId, JournalLineId, round_amount};

use super::draft::{DraftLine, JournalDraft};
use super::entry::JournalLine;
use super::error::LedgerError;
use super::tolerance::{BalancePolicy, Settlement};
use super::types::JournalTotals;
use super::validation::validate_lines;

/// What the ledger needs to know about an account to post to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Account ID.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Inactive accounts reject postings.
    pub is_active: bool,
    /// Header accounts reject postings.
    pub is_header: bool,
}

/// Lines ready to be written, with how they were balanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedJournal {
    /// Resolved lines.
    pub lines: Vec<JournalLine>,
    /// Totals after rounding.
    pub totals: JournalTotals,
    /// Tolerance outcome.
    pub settlement: Settlement,
}

/// Stateless ledger service.
pub struct LedgerService;

impl LedgerService {
    /// Settles, validates and resolves a draft.
    ///
    /// 1. Rejects dates in closed periods and dates too far ahead
    /// 2. Rounds line amounts to the configured decimal places
    /// 3. Applies the balance policy
    /// 4. Validates the lines
    /// 5. Resolves account codes, using each line's fallback when needed
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` when any step fails.
    pub fn prepare<L, C>(
        draft: &JournalDraft,
        policy: &BalancePolicy,
        settings: &LedgerSettings,
        today: NaiveDate,
        account_lookup: L,
        is_closed: C,
    ) -> Result<PreparedJournal, LedgerError>
    where
        L: Fn(&str) -> Option<AccountInfo>,
        C: Fn(NaiveDate) -> bool,
    {
        Self::check_entry_date(draft.entry_date, today, settings, is_closed)?;

        let mut draft = draft.clone();
        for line in &mut draft.lines {
            line.debit = round_amount(line.debit, settings.decimal_places);
            line.credit = round_amount(line.credit, settings.decimal_places);
        }

        let settlement = policy.settle(&mut draft)?;
        let totals = validate_lines(&draft.lines, settings.decimal_places, policy.residual_limit())?;

        let lines = draft
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let account = Self::resolve_account(line, &account_lookup)?;
                Ok(JournalLine {
                    id: JournalLineId::new(),
                    account_id: account.id,
                    account_code: account.code,
                    debit: line.debit,
                    credit: line.credit,
                    memo: line.memo.clone(),
                    line_number: u32::try_from(i + 1).unwrap_or(u32::MAX),
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(PreparedJournal {
            lines,
            totals,
            settlement,
        })
    }

    /// Rejects entry dates in closed periods or beyond the future-date window.
    ///
    /// # Errors
    ///
    /// `PeriodClosed` or `FutureDate`.
    pub fn check_entry_date<C>(
        date: NaiveDate,
        today: NaiveDate,
        settings: &LedgerSettings,
        is_closed: C,
    ) -> Result<(), LedgerError>
    where
        C: Fn(NaiveDate) -> bool,
    {
        if is_closed(date) {
            return Err(LedgerError::PeriodClosed(date));
        }

        if !settings.allow_future_dates {
            let limit = today + Duration::days(i64::from(settings.max_future_days));
            if date > limit {
                return Err(LedgerError::FutureDate {
                    date,
                    max_days: settings.max_future_days,
                });
            }
        }

        Ok(())
    }

    /// Resolves the account for one line.
    ///
    /// The fallback is consulted only when the primary code does not exist; an
    /// existing but inactive primary account is an error.
    fn resolve_account<L>(line: &DraftLine, lookup: &L) -> Result<AccountInfo, LedgerError>
    where
        L: Fn(&str) -> Option<AccountInfo>,
    {
        let account = match (lookup(&line.account_code), &line.fallback_code) {
            (Some(account), _) => account,
            (None, Some(fallback)) => {
                lookup(fallback).ok_or_else(|| LedgerError::AccountNotFound(line.account_code.clone()))?
            }
            (None, None) => return Err(LedgerError::AccountNotFound(line.account_code.clone())),
        };

        if !account.is_active {
            return Err(LedgerError::AccountInactive(account.code));
        }
        if account.is_header {
            return Err(LedgerError::HeaderAccount(account.code));
        }
        Ok(account)
    }

    /// Sum of a set of amounts rounded to `dp`.
    #[must_use]
    pub fn rounded_sum(amounts: impl IntoIterator<Item = Decimal>, dp: u32) -> Decimal {
        round_amount(amounts.into_iter().sum(), dp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{JournalSource, SourceType};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn chart() -> HashMap<String, AccountInfo> {
        [("1101", true, false), ("1100", true, true), ("1201", true, false), ("4101", true, false), ("4199", false, false)]
            .into_iter()
            .map(|(code, active, header)| {
                (
                    code.to_string(),
                    AccountInfo {
                        id: AccountId::new(),
                        code: code.to_string(),
                        is_active: active,
                        is_header: header,
                    },
                )
            })
            .collect()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn draft(lines: Vec<DraftLine>) -> JournalDraft {
        let mut d = JournalDraft::new(JournalSource::standalone(SourceType::Manual, "M-1"), date(10), "test");
        for line in lines {
            d.push(line);
        }
        d
    }

    fn prepare(d: &JournalDraft, policy: &BalancePolicy) -> Result<PreparedJournal, LedgerError> {
        let accounts = chart();
        LedgerService::prepare(
            d,
            policy,
            &LedgerSettings::default(),
            date(10),
            |code| accounts.get(code).cloned(),
            |_| false,
        )
    }

    #[test]
    fn test_prepare_resolves_lines() {
        let d = draft(vec![
            DraftLine::debit("1201", dec!(1000), "AR"),
            DraftLine::credit("4101", dec!(1000), "Sales"),
        ]);
        let prepared = prepare(&d, &BalancePolicy::exact()).unwrap();

        assert_eq!(prepared.lines.len(), 2);
        assert_eq!(prepared.lines[0].line_number, 1);
        assert_eq!(prepared.lines[1].account_code, "4101");
        assert_eq!(prepared.settlement, Settlement::Balanced);
        assert!(prepared.totals.is_balanced());
    }

    #[test]
    fn test_prepare_uses_fallback_for_missing_account() {
        let d = draft(vec![
            DraftLine::debit("1201", dec!(25000), "AR"),
            DraftLine::credit("4102", dec!(25000), "Shipping").or_account("4101"),
        ]);
        let prepared = prepare(&d, &BalancePolicy::exact()).unwrap();
        assert_eq!(prepared.lines[1].account_code, "4101");
    }

    #[test]
    fn test_prepare_rejects_missing_account_without_fallback() {
        let d = draft(vec![
            DraftLine::debit("9999", dec!(1), ""),
            DraftLine::credit("4101", dec!(1), ""),
        ]);
        assert_eq!(
            prepare(&d, &BalancePolicy::exact()).unwrap_err(),
            LedgerError::AccountNotFound("9999".into())
        );
    }

    #[test]
    fn test_prepare_rejects_header_and_inactive_accounts() {
        let header = draft(vec![
            DraftLine::debit("1100", dec!(1), ""),
            DraftLine::credit("4101", dec!(1), ""),
        ]);
        assert_eq!(
            prepare(&header, &BalancePolicy::exact()).unwrap_err(),
            LedgerError::HeaderAccount("1100".into())
        );

        let inactive = draft(vec![
            DraftLine::debit("1101", dec!(1), ""),
            DraftLine::credit("4199", dec!(1), "").or_account("4101"),
        ]);
        assert_eq!(
            prepare(&inactive, &BalancePolicy::exact()).unwrap_err(),
            LedgerError::AccountInactive("4199".into())
        );
    }

    #[test]
    fn test_prepare_rounds_before_validation() {
        let d = draft(vec![
            DraftLine::debit("1201", dec!(1110.004), ""),
            DraftLine::credit("4101", dec!(1110), ""),
        ]);
        let prepared = prepare(&d, &BalancePolicy::exact()).unwrap();
        assert_eq!(prepared.lines[0].debit, dec!(1110.00));
    }

    #[test]
    fn test_check_entry_date() {
        let settings = LedgerSettings::default();
        assert!(LedgerService::check_entry_date(date(17), date(10), &settings, |_| false).is_ok());
        assert_eq!(
            LedgerService::check_entry_date(date(18), date(10), &settings, |_| false),
            Err(LedgerError::FutureDate {
                date: date(18),
                max_days: 7
            })
        );
        assert_eq!(
            LedgerService::check_entry_date(date(1), date(10), &settings, |d| d < date(5)),
            Err(LedgerError::PeriodClosed(date(1)))
        );

        let lenient = LedgerSettings {
            allow_future_dates: true,
            ..LedgerSettings::default()
        };
        assert!(LedgerService::check_entry_date(date(31), date(10), &lenient, |_| false).is_ok());
    }

    #[test]
    fn test_rounded_sum() {
        assert_eq!(
            LedgerService::rounded_sum([dec!(0.105), dec!(0.1)], 2),
            dec!(0.20)
        );
    }
}

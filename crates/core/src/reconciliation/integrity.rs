//! Cached balance verification and journal checks.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{
    BalanceCorrection, BalanceDiscrepancy, DoublePosting, IntegrityReport, Severity,
    UnbalancedJournal,
};
use crate::coa::ChartOfAccounts;
use crate::ledger::{AccountBalance, JournalEntry};

fn derived_totals(
    chart: &ChartOfAccounts,
    derived: &BTreeMap<String, AccountBalance>,
) -> BTreeMap<String, Decimal> {
    let leaves = derived
        .iter()
        .map(|(code, b)| (code.clone(), b.balance))
        .collect();
    chart.roll_up(&leaves)
}

/// Compares every account's cached balance with the ledger.
///
/// Header accounts are compared against the roll-up of their children.
#[must_use]
pub fn verify_cached_balances(
    chart: &ChartOfAccounts,
    derived: &BTreeMap<String, AccountBalance>,
    tolerance: Decimal,
) -> IntegrityReport {
    let totals = derived_totals(chart, derived);

    let discrepancies = chart
        .accounts()
        .iter()
        .filter_map(|account| {
            let derived = totals.get(&account.code).copied().unwrap_or_default();
            let difference = account.balance - derived;
            (difference.abs() > tolerance).then(|| BalanceDiscrepancy {
                account_id: account.id,
                account_code: account.code.clone(),
                account_name: account.name.clone(),
                is_header: account.is_header,
                cached: account.balance,
                derived,
                difference,
                severity: Severity::for_difference(difference),
            })
        })
        .collect();

    IntegrityReport {
        accounts_checked: chart.accounts().len(),
        discrepancies,
        ..IntegrityReport::default()
    }
}

/// Posted journals whose debit and credit lines differ by more than `tolerance`.
#[must_use]
pub fn find_unbalanced_journals(journals: &[JournalEntry], tolerance: Decimal) -> Vec<UnbalancedJournal> {
    journals
        .iter()
        .filter(|j| j.is_effective())
        .filter_map(|journal| {
            let totals = journal.line_totals();
            (!totals.is_balanced_within(tolerance)).then(|| UnbalancedJournal {
                journal_id: journal.id,
                entry_number: journal.entry_number.clone(),
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
                difference: totals.difference(),
            })
        })
        .collect()
}

/// Leaf accounts whose cached balance is exactly twice the derived one.
#[must_use]
pub fn find_double_postings(
    chart: &ChartOfAccounts,
    derived: &BTreeMap<String, AccountBalance>,
) -> Vec<DoublePosting> {
    chart
        .accounts()
        .iter()
        .filter(|a| !a.is_header)
        .filter_map(|account| {
            let derived = derived.get(&account.code)?.balance;
            (!derived.is_zero() && account.balance == derived * Decimal::TWO).then(|| DoublePosting {
                account_id: account.id,
                account_code: account.code.clone(),
                cached: account.balance,
                derived,
                severity: Severity::Critical,
            })
        })
        .collect()
}

/// One correction per leaf mismatch, setting the cached balance to the derived one.
///
/// Header accounts are left out; their cached totals follow from the leaves.
#[must_use]
pub fn plan_corrections(report: &IntegrityReport) -> Vec<BalanceCorrection> {
    report
        .discrepancies
        .iter()
        .filter(|d| !d.is_header)
        .map(|d| BalanceCorrection {
            account_id: d.account_id,
            account_code: d.account_code.clone(),
            from: d.cached,
            to: d.derived,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::{Account, AccountType};
    use crate::ledger::{JournalLine, JournalSource, NormalBalance, SourceType, derive_balances};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use saldo_shared::types::{AccountId, JournalLineId, UserId};

    fn line(code: &str, debit: Decimal, credit: Decimal, n: u32) -> JournalLine {
        JournalLine {
            id: JournalLineId::new(),
            account_id: AccountId::new(),
            account_code: code.to_string(),
            debit,
            credit,
            memo: String::new(),
            line_number: n,
        }
    }

    fn journal(lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry::posted(
            "JE-2026-000001".into(),
            JournalSource::standalone(SourceType::Manual, "MANUAL-1"),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            "test".into(),
            lines,
            UserId::new(),
        )
    }

    fn chart(kas: Decimal, bank: Decimal, header: Decimal, modal: Decimal) -> ChartOfAccounts {
        ChartOfAccounts::new(vec![
            Account::new("1100", "Kas & Bank", AccountType::Asset).header().with_balance(header),
            Account::new("1101", "Kas", AccountType::Asset).under("1100").with_balance(kas),
            Account::new("1102", "Bank", AccountType::Asset).under("1100").with_balance(bank),
            Account::new("3101", "Modal", AccountType::Equity).with_balance(modal),
        ])
        .unwrap()
    }

    fn ledger() -> Vec<JournalEntry> {
        vec![journal(vec![
            line("1101", dec!(300000), Decimal::ZERO, 1),
            line("1102", dec!(200000), Decimal::ZERO, 2),
            line("3101", Decimal::ZERO, dec!(500000), 3),
        ])]
    }

    #[test]
    fn test_consistent_cache_passes() {
        let chart = chart(dec!(300000), dec!(200000), dec!(500000), dec!(500000));
        let derived = derive_balances(&ledger(), |c| chart.normal_of(c), |_| true);

        let report = verify_cached_balances(&chart, &derived, dec!(0.01));
        assert!(report.is_valid());
        assert_eq!(report.accounts_checked, 4);
    }

    #[test]
    fn test_header_compared_against_roll_up() {
        // Leaves agree, the header's cache is stale
        let chart = chart(dec!(300000), dec!(200000), dec!(300000), dec!(500000));
        let derived = derive_balances(&ledger(), |c| chart.normal_of(c), |_| true);

        let report = verify_cached_balances(&chart, &derived, dec!(0.01));
        assert_eq!(report.discrepancies.len(), 1);
        let header = &report.discrepancies[0];
        assert_eq!(header.account_code, "1100");
        assert!(header.is_header);
        assert_eq!(header.derived, dec!(500000));
        assert_eq!(header.difference, dec!(-200000));
        assert_eq!(header.severity, Severity::High);
        assert!(plan_corrections(&report).is_empty());
    }

    #[test]
    fn test_within_tolerance_ignored() {
        let chart = chart(dec!(300000.01), dec!(200000), dec!(500000.01), dec!(500000));
        let derived = derive_balances(&ledger(), |c| chart.normal_of(c), |_| true);

        assert!(verify_cached_balances(&chart, &derived, dec!(0.01)).is_valid());
    }

    #[test]
    fn test_double_posting_detected_and_corrected() {
        let chart = chart(dec!(600000), dec!(200000), dec!(800000), dec!(500000));
        let derived = derive_balances(&ledger(), |c| chart.normal_of(c), |_| true);

        let doubles = find_double_postings(&chart, &derived);
        assert_eq!(doubles.len(), 1);
        assert_eq!(doubles[0].account_code, "1101");
        assert_eq!(doubles[0].severity, Severity::Critical);

        let report = verify_cached_balances(&chart, &derived, dec!(0.01));
        let corrections = plan_corrections(&report);
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].account_code, "1101");
        assert_eq!(corrections[0].from, dec!(600000));
        assert_eq!(corrections[0].to, dec!(300000));
    }

    #[test]
    fn test_zero_derived_is_not_double_posting() {
        let chart = chart(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        let mut derived = BTreeMap::new();
        derived.insert(
            "1101".to_string(),
            AccountBalance::new(AccountId::new(), "1101", NormalBalance::Debit),
        );
        assert!(find_double_postings(&chart, &derived).is_empty());
    }

    #[test]
    fn test_unbalanced_journal_found() {
        let balanced = ledger().remove(0);
        let unbalanced = journal(vec![
            line("1101", dec!(1000), Decimal::ZERO, 1),
            line("3101", Decimal::ZERO, dec!(900), 2),
        ]);

        let found = find_unbalanced_journals(&[balanced, unbalanced.clone()], dec!(0.01));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].journal_id, unbalanced.id);
        assert_eq!(found[0].difference, dec!(100));
    }
}

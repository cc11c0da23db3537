//! Property-based tests for integrity checks.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, JournalLineId, UserId};

use super::compare::compare_ledgers;
use super::integrity::{find_unbalanced_journals, plan_corrections, verify_cached_balances};
use crate::coa::{Account, AccountType, ChartOfAccounts};
use crate::ledger::{JournalEntry, JournalLine, JournalSource, SourceType, derive_balances};

const CODES: [&str; 5] = ["1101", "1201", "2101", "4101", "5101"];

fn accounts() -> Vec<Account> {
    vec![
        Account::new("1100", "Aset Lancar", AccountType::Asset).header(),
        Account::new("1101", "Kas", AccountType::Asset).under("1100"),
        Account::new("1201", "Piutang", AccountType::Asset).under("1100"),
        Account::new("2101", "Utang Usaha", AccountType::Liability),
        Account::new("4101", "Penjualan", AccountType::Revenue),
        Account::new("5101", "HPP", AccountType::Expense),
    ]
}

fn journals(shapes: &[(usize, usize, i64)]) -> Vec<JournalEntry> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, &(dr, cr, cents))| {
            let amount = Decimal::new(cents, 2);
            let line = |code: &str, debit, credit, n| JournalLine {
                id: JournalLineId::new(),
                account_id: AccountId::new(),
                account_code: code.to_string(),
                debit,
                credit,
                memo: String::new(),
                line_number: n,
            };
            JournalEntry::posted(
                format!("JE-2026-{:06}", i + 1),
                JournalSource::standalone(SourceType::Manual, format!("MANUAL-{i}")),
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                "prop".into(),
                vec![
                    line(CODES[dr], amount, Decimal::ZERO, 1),
                    line(CODES[cr], Decimal::ZERO, amount, 2),
                ],
                UserId::new(),
            )
        })
        .collect()
}

fn shapes() -> impl Strategy<Value = Vec<(usize, usize, i64)>> {
    prop::collection::vec((0..CODES.len(), 0..CODES.len(), 1i64..1_000_000_000i64), 1..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Applying the planned corrections and re-rolling headers leaves no
    /// discrepancy behind.
    #[test]
    fn prop_corrections_restore_integrity(
        shapes in shapes(),
        noise in prop::collection::vec(-1_000_000i64..1_000_000i64, 6),
    ) {
        let chart = ChartOfAccounts::new(
            accounts()
                .into_iter()
                .zip(&noise)
                .map(|(a, n)| a.with_balance(Decimal::new(*n, 2)))
                .collect(),
        )
        .unwrap();
        let ledger = journals(&shapes);
        let derived = derive_balances(&ledger, |c| chart.normal_of(c), |_| true);

        let report = verify_cached_balances(&chart, &derived, Decimal::ZERO);
        let corrections = plan_corrections(&report);

        let mut fixed: Vec<Account> = chart.accounts().to_vec();
        for account in &mut fixed {
            if let Some(c) = corrections.iter().find(|c| c.account_code == account.code) {
                account.balance = c.to;
            }
        }
        let leaf_sum: Decimal = fixed
            .iter()
            .filter(|a| a.parent_code.as_deref() == Some("1100"))
            .map(|a| a.balance)
            .sum();
        for account in &mut fixed {
            if account.is_header {
                account.balance = leaf_sum;
            }
        }
        let fixed = ChartOfAccounts::new(fixed).unwrap();

        prop_assert!(verify_cached_balances(&fixed, &derived, Decimal::ZERO).is_valid());
    }

    /// A ledger always agrees with itself, and balanced journals are never flagged.
    #[test]
    fn prop_ledger_agrees_with_itself(shapes in shapes()) {
        let ledger = journals(&shapes);
        prop_assert!(compare_ledgers(&ledger, &ledger, Decimal::new(1, 2)).is_consistent());
        prop_assert!(find_unbalanced_journals(&ledger, Decimal::ZERO).is_empty());
    }
}

//! Account balance derivation.
//!
//! Balances are always derived from posted journal lines. The cached balance
//! column on accounts is a materialization of the same numbers and can be
//! rebuilt from here at any time.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, JournalId};
use serde::{Deserialize, Serialize};

use super::entry::{JournalEntry, JournalLine};

/// Side on which an account's balance grows. The mapping from account type
/// lives in `AccountType::normal_balance`.
///
/// - Asset/Expense: balance += debit - credit
/// - Liability/Equity/Revenue: balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Asset and expense accounts.
    Debit,
    /// Liability, equity and revenue accounts.
    Credit,
}

impl NormalBalance {
    /// Balance change produced by a debit/credit pair.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Aggregated balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Normal side used for `balance`.
    pub normal: NormalBalance,
    /// Total debits.
    pub debit_total: Decimal,
    /// Total credits.
    pub credit_total: Decimal,
    /// Balance on the normal side.
    pub balance: Decimal,
    /// Number of lines aggregated.
    pub line_count: u64,
}

impl AccountBalance {
    /// Empty balance.
    #[must_use]
    pub fn new(account_id: AccountId, account_code: impl Into<String>, normal: NormalBalance) -> Self {
        Self {
            account_id,
            account_code: account_code.into(),
            normal,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
            line_count: 0,
        }
    }

    /// Adds one line.
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
        self.balance = self.normal.balance_change(self.debit_total, self.credit_total);
        self.line_count += 1;
    }

    /// Debit minus credit regardless of normal side.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit_total - self.credit_total
    }
}

/// Running balance after one line of an account's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position in the account's history, starting at 1.
    pub account_version: i64,
    /// Balance before the line.
    pub previous_balance: Decimal,
    /// Balance after the line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// First line on an account.
    #[must_use]
    pub fn first_entry(balance_change: Decimal) -> Self {
        Self {
            account_version: 1,
            previous_balance: Decimal::ZERO,
            current_balance: balance_change,
        }
    }

    /// Line following `previous`.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            account_version: previous.account_version + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}

/// One row of an account statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Journal the line belongs to.
    pub journal_id: JournalId,
    /// Entry number.
    pub entry_number: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Line memo.
    pub memo: String,
    /// Debit.
    pub debit: Decimal,
    /// Credit.
    pub credit: Decimal,
    /// Running balance after the line.
    pub running: RunningBalance,
}

/// Aggregates posted lines per account code.
///
/// `normal_of` supplies the normal side for an account code; `include`
/// filters journals (date range, source type).
pub fn derive_balances<N, F>(
    journals: &[JournalEntry],
    normal_of: N,
    include: F,
) -> BTreeMap<String, AccountBalance>
where
    N: Fn(&str) -> NormalBalance,
    F: Fn(&JournalEntry) -> bool,
{
    let mut balances: BTreeMap<String, AccountBalance> = BTreeMap::new();

    for journal in journals.iter().filter(|j| j.is_effective() && include(j)) {
        for line in &journal.lines {
            balances
                .entry(line.account_code.clone())
                .or_insert_with(|| {
                    AccountBalance::new(line.account_id, &line.account_code, normal_of(&line.account_code))
                })
                .apply(line.debit, line.credit);
        }
    }

    balances
}

/// Normal-side balance changes produced by a set of lines, per account code.
///
/// Used to keep the cached balance column in step with each posting.
pub fn compute_deltas<N>(lines: &[JournalLine], normal_of: N) -> BTreeMap<String, Decimal>
where
    N: Fn(&str) -> NormalBalance,
{
    let mut deltas: BTreeMap<String, Decimal> = BTreeMap::new();
    for line in lines {
        *deltas.entry(line.account_code.clone()).or_default() +=
            normal_of(&line.account_code).balance_change(line.debit, line.credit);
    }
    deltas
}

/// Chronological statement of one account with running balances.
pub fn account_statement(
    journals: &[JournalEntry],
    account_code: &str,
    normal: NormalBalance,
) -> Vec<StatementLine> {
    let mut effective: Vec<&JournalEntry> = journals.iter().filter(|j| j.is_effective()).collect();
    effective.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.posted_at.cmp(&b.posted_at))
    });

    let mut statement = Vec::new();
    let mut previous: Option<RunningBalance> = None;

    for journal in effective {
        for line in journal.lines.iter().filter(|l| l.account_code == account_code) {
            let change = normal.balance_change(line.debit, line.credit);
            let running = match &previous {
                Some(prev) => RunningBalance::next_entry(prev, change),
                None => RunningBalance::first_entry(change),
            };
            previous = Some(running);
            statement.push(StatementLine {
                journal_id: journal.id,
                entry_number: journal.entry_number.clone(),
                entry_date: journal.entry_date,
                memo: line.memo.clone(),
                debit: line.debit,
                credit: line.credit,
                running,
            });
        }
    }

    statement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{JournalSource, JournalStatus, SourceType};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use saldo_shared::types::{JournalLineId, UserId};

    fn normal_of(code: &str) -> NormalBalance {
        match code.chars().next() {
            Some('2' | '3' | '4') => NormalBalance::Credit,
            _ => NormalBalance::Debit,
        }
    }

    fn line(code: &str, debit: Decimal, credit: Decimal) -> JournalLine {
        JournalLine {
            id: JournalLineId::new(),
            account_id: AccountId::new(),
            account_code: code.into(),
            debit,
            credit,
            memo: String::new(),
            line_number: 1,
        }
    }

    fn journal(day: u32, lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry::posted(
            format!("JE-{day}"),
            JournalSource::standalone(SourceType::Manual, format!("M-{day}")),
            NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            "test".into(),
            lines,
            UserId::new(),
        )
    }

    #[test]
    fn test_balance_change_by_side() {
        assert_eq!(NormalBalance::Debit.balance_change(dec!(100), dec!(30)), dec!(70));
        assert_eq!(NormalBalance::Credit.balance_change(dec!(100), dec!(30)), dec!(-70));
    }

    #[test]
    fn test_derive_balances_counts_posted_and_reversed_only() {
        let posted = journal(
            1,
            vec![line("1201", dec!(1110), Decimal::ZERO), line("4101", Decimal::ZERO, dec!(1110))],
        );
        let mut reversed = journal(
            2,
            vec![line("1201", dec!(500), Decimal::ZERO), line("4101", Decimal::ZERO, dec!(500))],
        );
        reversed.status = JournalStatus::Reversed;
        let mut draft = journal(
            3,
            vec![line("1201", dec!(999), Decimal::ZERO), line("4101", Decimal::ZERO, dec!(999))],
        );
        draft.status = JournalStatus::Draft;

        let balances = derive_balances(&[posted, reversed, draft], normal_of, |_| true);

        assert_eq!(balances["1201"].balance, dec!(1610));
        assert_eq!(balances["4101"].balance, dec!(1610));
        assert_eq!(balances["4101"].net_debit(), dec!(-1610));
        assert_eq!(balances["1201"].line_count, 2);
    }

    #[test]
    fn test_derive_balances_respects_filter() {
        let jan1 = journal(1, vec![line("1101", dec!(10), Decimal::ZERO), line("3101", Decimal::ZERO, dec!(10))]);
        let jan5 = journal(5, vec![line("1101", dec!(7), Decimal::ZERO), line("3101", Decimal::ZERO, dec!(7))]);
        let cutoff = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();

        let balances = derive_balances(&[jan1, jan5], normal_of, |j| j.entry_date <= cutoff);
        assert_eq!(balances["1101"].balance, dec!(10));
    }

    #[test]
    fn test_compute_deltas_merges_lines_per_account() {
        let lines = vec![
            line("1201", dec!(1000), Decimal::ZERO),
            line("1201", Decimal::ZERO, dec!(200)),
            line("4101", Decimal::ZERO, dec!(800)),
        ];
        let deltas = compute_deltas(&lines, normal_of);
        assert_eq!(deltas["1201"], dec!(800));
        assert_eq!(deltas["4101"], dec!(800));
    }

    #[test]
    fn test_account_statement_running_balance() {
        let later = journal(9, vec![line("1101", Decimal::ZERO, dec!(40)), line("5101", dec!(40), Decimal::ZERO)]);
        let earlier = journal(2, vec![line("1101", dec!(100), Decimal::ZERO), line("3101", Decimal::ZERO, dec!(100))]);

        let statement = account_statement(&[later, earlier], "1101", NormalBalance::Debit);

        assert_eq!(statement.len(), 2);
        assert_eq!(statement[0].running.current_balance, dec!(100));
        assert_eq!(statement[1].running.previous_balance, dec!(100));
        assert_eq!(statement[1].running.current_balance, dec!(60));
        assert_eq!(statement[1].running.account_version, 2);
    }

    /// Balance changes, positive or negative.
    fn balance_change_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn balance_changes_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec(balance_change_strategy(), 1..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Previous balance of entry N is the current balance of entry N-1.
        #[test]
        fn prop_previous_equals_prior_current(
            change1 in balance_change_strategy(),
            change2 in balance_change_strategy(),
        ) {
            let rb1 = RunningBalance::first_entry(change1);
            let rb2 = RunningBalance::next_entry(&rb1, change2);
            prop_assert_eq!(rb2.previous_balance, rb1.current_balance);
            prop_assert_eq!(rb2.current_balance, rb2.previous_balance + change2);
        }

        /// The last running balance equals the sum of all changes and the
        /// version equals the number of entries.
        #[test]
        fn prop_chain_sums_changes(changes in balance_changes_strategy(20)) {
            let mut current = RunningBalance::first_entry(changes[0]);
            for change in changes.iter().skip(1) {
                current = RunningBalance::next_entry(&current, *change);
            }
            let expected: Decimal = changes.iter().copied().sum();
            prop_assert_eq!(current.current_balance, expected);
            prop_assert_eq!(current.account_version as usize, changes.len());
        }

        /// Debit-normal and credit-normal changes are mirror images.
        #[test]
        fn prop_normal_sides_are_opposite(
            debit in 0i64..1_000_000i64,
            credit in 0i64..1_000_000i64,
        ) {
            let debit = Decimal::new(debit, 2);
            let credit = Decimal::new(credit, 2);
            prop_assert_eq!(
                NormalBalance::Debit.balance_change(debit, credit),
                -NormalBalance::Credit.balance_change(debit, credit)
            );
        }

        /// For a balanced journal the debit-normal deltas minus the
        /// credit-normal deltas sum to zero.
        #[test]
        fn prop_balanced_journal_deltas_cancel(amount in 1i64..10_000_000i64) {
            let amount = Decimal::new(amount, 2);
            let lines = vec![
                line("1101", amount, Decimal::ZERO),
                line("4101", Decimal::ZERO, amount),
            ];
            let deltas = compute_deltas(&lines, normal_of);
            let debit_side: Decimal = deltas.iter().filter(|(c, _)| normal_of(c) == NormalBalance::Debit).map(|(_, d)| *d).sum();
            let credit_side: Decimal = deltas.iter().filter(|(c, _)| normal_of(c) == NormalBalance::Credit).map(|(_, d)| *d).sum();
            prop_assert_eq!(debit_side, credit_side);
        }
    }
}

//! Property-based tests for ReversalService.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, JournalLineId, UserId};

use crate::ledger::{JournalEntry, JournalLine, JournalSource, SourceType};
use crate::workflow::reversal::ReversalService;

/// Strategy for generating random positive Decimal amounts.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
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

/// Balanced journal: several debits against one credit.
fn arb_entry() -> impl Strategy<Value = JournalEntry> {
    prop::collection::vec((prop::sample::select(vec!["1101", "1201", "5101", "6101"]), arb_amount()), 1..5)
        .prop_map(|debits| {
            let total: Decimal = debits.iter().map(|(_, a)| *a).sum();
            let mut lines: Vec<JournalLine> =
                debits.iter().map(|(code, amount)| line(code, *amount, Decimal::ZERO)).collect();
            lines.push(line("4101", Decimal::ZERO, total));
            JournalEntry::posted(
                "JE-P".into(),
                JournalSource::standalone(SourceType::Manual, "P"),
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                "prop".into(),
                lines,
                UserId::new(),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Original plus reversal nets every account to zero.
    #[test]
    fn prop_reversal_nets_to_zero(entry in arb_entry()) {
        let plan = ReversalService::build(
            &entry,
            "Entered against the wrong customer",
            entry.entry_date,
            10,
        ).unwrap();

        prop_assert!(plan.draft.totals().is_balanced());
        prop_assert_eq!(plan.draft.lines.len(), entry.lines.len());

        let mut net: BTreeMap<String, Decimal> = BTreeMap::new();
        for l in &entry.lines {
            *net.entry(l.account_code.clone()).or_default() += l.debit - l.credit;
        }
        for l in &plan.draft.lines {
            *net.entry(l.account_code.clone()).or_default() += l.debit - l.credit;
        }
        prop_assert!(net.values().all(Decimal::is_zero));
    }
}

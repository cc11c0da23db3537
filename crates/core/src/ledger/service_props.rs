//! Property-based tests for draft preparation and tolerance settlement.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use saldo_shared::types::AccountId;
use saldo_shared::{LedgerSettings, PostingSettings};

use super::draft::{DraftLine, JournalDraft};
use super::error::LedgerError;
use super::service::{AccountInfo, LedgerService};
use super::tolerance::{BalancePolicy, Settlement};
use super::types::{JournalSource, SourceType};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Differences from -600 to 600 rupiah.
fn difference() -> impl Strategy<Value = Decimal> {
    (-600i64..=600i64).prop_map(Decimal::from)
}

fn lookup(code: &str) -> Option<AccountInfo> {
    Some(AccountInfo {
        id: AccountId::new(),
        code: code.to_string(),
        is_active: true,
        is_header: false,
    })
}

fn make_draft(debit: Decimal, credit: Decimal) -> JournalDraft {
    let mut draft = JournalDraft::new(
        JournalSource::standalone(SourceType::Sale, "SALE-P"),
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        "prop",
    );
    draft
        .push(DraftLine::debit("1201", debit, ""))
        .push(DraftLine::credit("4101", credit, ""));
    draft
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// With balanced entries required, every successfully prepared journal
    /// balances exactly.
    #[test]
    fn prop_prepared_journals_balance(
        amount in positive_amount(),
        diff in difference(),
    ) {
        prop_assume!(amount + diff > Decimal::ZERO);
        let draft = make_draft(amount + diff, amount);
        let policy = BalancePolicy::tolerant(&PostingSettings::default(), &LedgerSettings::default());
        let today = draft.entry_date;

        match LedgerService::prepare(&draft, &policy, &LedgerSettings::default(), today, lookup, |_| false) {
            Ok(prepared) => {
                prop_assert!(prepared.totals.is_balanced());
                prop_assert!(diff.abs() <= Decimal::new(500, 0));
                if diff.is_zero() {
                    prop_assert_eq!(prepared.settlement, Settlement::Balanced);
                } else {
                    prop_assert!(prepared.settlement.is_adjusted());
                }
            }
            Err(err) => {
                let too_large = matches!(err, LedgerError::ImbalanceTooLarge { .. });
                prop_assert!(too_large);
                prop_assert!(diff.abs() > Decimal::new(500, 0));
            }
        }
    }

    /// The exact policy accepts only exactly balanced drafts.
    #[test]
    fn prop_exact_policy(amount in positive_amount(), diff in difference()) {
        prop_assume!(amount + diff > Decimal::ZERO);
        let draft = make_draft(amount + diff, amount);
        let today = draft.entry_date;
        let result = LedgerService::prepare(
            &draft,
            &BalancePolicy::exact(),
            &LedgerSettings::default(),
            today,
            lookup,
            |_| false,
        );
        prop_assert_eq!(result.is_ok(), diff.is_zero());
    }
}

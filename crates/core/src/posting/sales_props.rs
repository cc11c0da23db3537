//! Property-based tests for the sales journal.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use saldo_shared::AppConfig;
use saldo_shared::types::SaleId;

use super::PostingContext;
use super::sales::{SaleDocument, SaleItem, SalesJournalBuilder};
use super::status::SaleStatus;

fn amount(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..max).prop_map(|cents| Decimal::new(cents, 2))
}

#[allow(clippy::too_many_arguments)]
fn sale(
    subtotal: Decimal,
    ppn: Decimal,
    shipping: Decimal,
    additions: Decimal,
    pph21: Decimal,
    pph23: Decimal,
    deductions: Decimal,
    cost: Decimal,
) -> SaleDocument {
    SaleDocument {
        id: SaleId::new(),
        code: "SO-P".into(),
        invoice_number: None,
        customer: String::new(),
        date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        status: SaleStatus::Invoiced,
        payment_method: "CREDIT".into(),
        cash_bank_account_code: None,
        subtotal,
        discount: Decimal::ZERO,
        discount_in_subtotal: true,
        ppn,
        other_tax_additions: additions,
        shipping,
        pph: Decimal::ZERO,
        pph21,
        pph23,
        other_tax_deductions: deductions,
        outstanding: None,
        items: vec![SaleItem {
            product: "P".into(),
            quantity: Decimal::ONE,
            unit_price: subtotal,
            cost_price: cost,
        }],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The draft is off by exactly the ancillary amounts left out for being
    /// below the minimum line amount.
    #[test]
    fn prop_imbalance_is_dropped_ancillaries(
        subtotal in (10_000i64..100_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        ppn in amount(1_000_000),
        shipping in amount(500),
        additions in amount(500),
        pph21 in amount(500),
        pph23 in amount(500),
        deductions in amount(500),
        cost in amount(10_000_000),
    ) {
        let doc = sale(subtotal, ppn, shipping, additions, pph21, pph23, deductions, cost);
        prop_assume!(doc.net_receivable() > Decimal::ZERO);

        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let draft = SalesJournalBuilder::build(&doc, &ctx).unwrap();

        let min = config.posting.min_line_amount;
        let dropped = |v: Decimal| if v < min { v } else { Decimal::ZERO };
        let expected = dropped(shipping) + dropped(additions) - dropped(deductions);

        prop_assert_eq!(draft.totals().difference(), expected);
        prop_assert!(draft.lines.iter().all(|l| l.amount() > Decimal::ZERO));
    }
}

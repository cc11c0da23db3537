//! Property-based tests for journal line validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::draft::DraftLine;
use super::error::LedgerError;
use super::validation::validate_lines;

/// Positive amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Splits `total` into `parts` positive lines (last part takes the remainder).
fn split(total: Decimal, parts: usize) -> Vec<Decimal> {
    let cents = (total * Decimal::ONE_HUNDRED).trunc();
    let count = Decimal::from(parts as u64);
    let share = (cents / count).trunc();
    let mut amounts: Vec<Decimal> = (1..parts).map(|_| share / Decimal::ONE_HUNDRED).collect();
    amounts.push((cents - share * (count - Decimal::ONE)) / Decimal::ONE_HUNDRED);
    amounts.retain(|a| *a > Decimal::ZERO);
    amounts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any split of the same total into debits and credits validates.
    #[test]
    fn prop_balanced_split_is_valid(
        total in positive_amount(),
        debit_parts in 1usize..5,
        credit_parts in 1usize..5,
    ) {
        let mut lines: Vec<DraftLine> = split(total, debit_parts)
            .into_iter()
            .map(|a| DraftLine::debit("1101", a, ""))
            .collect();
        lines.extend(split(total, credit_parts).into_iter().map(|a| DraftLine::credit("4101", a, "")));

        let totals = validate_lines(&lines, 2, Decimal::ZERO).unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
    }

    /// Any non-zero difference is rejected when no residual is allowed.
    #[test]
    fn prop_unbalanced_is_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let lines = vec![
            DraftLine::debit("1101", debit, ""),
            DraftLine::credit("4101", credit, ""),
        ];
        let is_unbalanced = matches!(
            validate_lines(&lines, 2, Decimal::ZERO),
            Err(LedgerError::Unbalanced { .. })
        );
        prop_assert!(is_unbalanced);
    }

    /// Lines on one side only are rejected regardless of amounts.
    #[test]
    fn prop_single_sided_is_rejected(
        amounts in prop::collection::vec(positive_amount(), 1..6),
        credit_side in any::<bool>(),
    ) {
        let lines: Vec<DraftLine> = amounts
            .into_iter()
            .map(|a| if credit_side { DraftLine::credit("4101", a, "") } else { DraftLine::debit("1101", a, "") })
            .collect();
        prop_assert_eq!(validate_lines(&lines, 2, Decimal::ZERO), Err(LedgerError::SingleSided));
    }
}

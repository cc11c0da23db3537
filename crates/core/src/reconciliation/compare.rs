//! Legacy versus unified ledger comparison.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;

use super::types::{LedgerComparison, LedgerDifference, Severity};
use crate::ledger::{JournalEntry, JournalSource};

/// Debit minus credit per account over effective journals.
fn net_by_account(journals: &[JournalEntry]) -> BTreeMap<&str, Decimal> {
    let mut nets = BTreeMap::new();
    for line in journals.iter().filter(|j| j.is_effective()).flat_map(|j| &j.lines) {
        *nets.entry(line.account_code.as_str()).or_default() += line.debit - line.credit;
    }
    nets
}

fn sources(journals: &[JournalEntry]) -> HashSet<&JournalSource> {
    journals.iter().map(|j| &j.source).collect()
}

fn only_in(ours: &[JournalEntry], theirs: &HashSet<&JournalSource>) -> Vec<JournalSource> {
    let mut missing: Vec<JournalSource> = ours
        .iter()
        .map(|j| &j.source)
        .filter(|s| !theirs.contains(s))
        .cloned()
        .collect();
    missing.sort_by(|a, b| a.reference.cmp(&b.reference));
    missing.dedup();
    missing
}

/// Compares the two ledgers account by account and journal by journal.
///
/// Journals are matched by source, so a mirrored entry matches its original
/// regardless of entry number.
#[must_use]
pub fn compare_ledgers(
    legacy: &[JournalEntry],
    unified: &[JournalEntry],
    tolerance: Decimal,
) -> LedgerComparison {
    let legacy_nets = net_by_account(legacy);
    let unified_nets = net_by_account(unified);

    let codes: BTreeSet<&str> = legacy_nets.keys().chain(unified_nets.keys()).copied().collect();

    let mut comparison = LedgerComparison::default();
    for code in codes {
        match (legacy_nets.get(code), unified_nets.get(code)) {
            (Some(&legacy), Some(&unified)) => {
                let difference = legacy - unified;
                if difference.abs() > tolerance {
                    comparison.differences.push(LedgerDifference {
                        account_code: code.to_string(),
                        legacy,
                        unified,
                        difference,
                        severity: Severity::for_difference(difference),
                    });
                }
            }
            (None, Some(_)) => comparison.missing_in_legacy.push(code.to_string()),
            (Some(_), None) => comparison.missing_in_unified.push(code.to_string()),
            (None, None) => {}
        }
    }

    comparison.journals_only_in_legacy = only_in(legacy, &sources(unified));
    comparison.journals_only_in_unified = only_in(unified, &sources(legacy));
    comparison
}

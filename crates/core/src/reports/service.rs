//! Report generation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::types::Currency;

use super::types::{ReportAccount, TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals};
use crate::coa::ChartOfAccounts;
use crate::ledger::{AccountBalance, NormalBalance};

/// Largest debit/credit gap still reported as balanced.
pub(crate) const REPORT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// One report row per chart account, with headers rolled up.
    ///
    /// Accounts without postings appear with zero totals.
    #[must_use]
    pub fn accounts_from(
        chart: &ChartOfAccounts,
        derived: &BTreeMap<String, AccountBalance>,
    ) -> Vec<ReportAccount> {
        let leaf = |f: fn(&AccountBalance) -> Decimal| -> BTreeMap<String, Decimal> {
            derived.iter().map(|(code, b)| (code.clone(), f(b))).collect()
        };
        let debit = chart.roll_up(&leaf(|b| b.debit_total));
        let credit = chart.roll_up(&leaf(|b| b.credit_total));
        let balance = chart.roll_up(&leaf(|b| b.balance));

        chart
            .accounts()
            .iter()
            .map(|a| ReportAccount {
                account_id: a.id,
                code: a.code.clone(),
                name: a.name.clone(),
                account_type: a.account_type,
                is_header: a.is_header,
                total_debit: debit.get(&a.code).copied().unwrap_or_default(),
                total_credit: credit.get(&a.code).copied().unwrap_or_default(),
                balance: balance.get(&a.code).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Generates a trial balance from leaf accounts.
    ///
    /// A positive balance goes to the column of the account's normal side; a
    /// negative one flips to the other column.
    #[must_use]
    pub fn generate_trial_balance(
        accounts: &[ReportAccount],
        as_of: NaiveDate,
        currency: Currency,
    ) -> TrialBalanceReport {
        let rows: Vec<TrialBalanceRow> = accounts
            .iter()
            .filter(|a| !a.is_header && !a.balance.is_zero())
            .map(|a| {
                let (debit, credit) = match (a.account_type.normal_balance(), a.balance >= Decimal::ZERO) {
                    (NormalBalance::Debit, true) => (a.balance, Decimal::ZERO),
                    (NormalBalance::Debit, false) => (Decimal::ZERO, -a.balance),
                    (NormalBalance::Credit, true) => (Decimal::ZERO, a.balance),
                    (NormalBalance::Credit, false) => (-a.balance, Decimal::ZERO),
                };
                TrialBalanceRow {
                    code: a.code.clone(),
                    name: a.name.clone(),
                    account_type: a.account_type,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();
        let difference = total_debit - total_credit;

        TrialBalanceReport {
            as_of,
            currency,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                difference,
                is_balanced: difference.abs() <= REPORT_TOLERANCE,
            },
        }
    }
}

//! Profit and loss statement.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::types::{Currency, round_amount};

use super::error::ReportError;
use super::service::ReportService;
use super::types::{ProfitLossReport, ReportAccount, ReportItem, ReportSection};
use crate::coa::{AccountType, normalize_zero};
use crate::ledger::NormalBalance;

/// Where an income statement account lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlBucket {
    /// Operating revenue, with its category.
    Revenue(&'static str),
    /// Cost of goods sold, with its category.
    CostOfGoodsSold(&'static str),
    /// Operating expense, with its category.
    OperatingExpense(&'static str),
    /// Non-operating income.
    OtherIncome,
    /// Non-operating expense.
    OtherExpense,
}

impl PnlBucket {
    /// Side on which amounts in this bucket count as positive.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Revenue(_) | Self::OtherIncome => NormalBalance::Credit,
            Self::CostOfGoodsSold(_) | Self::OperatingExpense(_) | Self::OtherExpense => NormalBalance::Debit,
        }
    }
}

/// Classifies an income statement account by code prefix.
///
/// The account type only decides whether the account belongs on the
/// statement at all, and places codes that match no known prefix.
#[must_use]
pub fn classify(account_type: AccountType, code: &str) -> Option<PnlBucket> {
    if !account_type.is_temporary() {
        return None;
    }

    let p1 = code.get(..1).unwrap_or(code);
    let p2 = code.get(..2).unwrap_or(code);
    let p3 = code.get(..3).unwrap_or(code);

    let by_prefix = match (p1, p2, p3) {
        ("7", _, _) => Some(PnlBucket::OtherIncome),
        (_, "40" | "41", _) => Some(PnlBucket::Revenue("Sales Revenue")),
        (_, "42", _) => Some(PnlBucket::Revenue("Service Revenue")),
        (_, "49", _) => Some(PnlBucket::Revenue("Other Operating Revenue")),
        (_, _, "510") => Some(PnlBucket::CostOfGoodsSold("Direct Materials")),
        (_, _, "511") => Some(PnlBucket::CostOfGoodsSold("Direct Labor")),
        (_, _, "512") => Some(PnlBucket::CostOfGoodsSold("Manufacturing Overhead")),
        (_, _, "513" | "514" | "519") => Some(PnlBucket::CostOfGoodsSold("Other COGS")),
        (_, "52", _) => Some(PnlBucket::OperatingExpense("Administrative Expenses")),
        (_, "53", _) => Some(PnlBucket::OperatingExpense("Selling & Marketing Expenses")),
        (_, "54" | "55" | "56" | "57" | "58" | "59" | "60" | "61", _) => {
            Some(PnlBucket::OperatingExpense("General Expenses"))
        }
        (_, "62" | "63" | "64" | "65" | "66" | "67" | "68" | "69", _) => Some(PnlBucket::OtherExpense),
        _ => None,
    };

    Some(by_prefix.unwrap_or(match (account_type, p1) {
        (AccountType::Revenue, _) => PnlBucket::Revenue("Other Revenue"),
        (_, "8" | "9") => PnlBucket::OtherExpense,
        _ => PnlBucket::OperatingExpense("General Expenses"),
    }))
}

/// `part / whole * 100`, rounded to 2 dp, when `whole > 0`.
fn margin(part: Decimal, whole: Decimal) -> Option<Decimal> {
    (whole > Decimal::ZERO).then(|| round_amount(part / whole * Decimal::ONE_HUNDRED, 2))
}

impl ReportService {
    /// Generates a profit and loss statement for one period.
    ///
    /// `accounts` are period balances; closing journals must already be left
    /// out. Rows for the same code are merged first.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `period_end < period_start`.
    pub fn generate_profit_loss(
        accounts: &[ReportAccount],
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: Currency,
    ) -> Result<ProfitLossReport, ReportError> {
        if period_end < period_start {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let mut merged: BTreeMap<&str, (&ReportAccount, Decimal)> = BTreeMap::new();
        for account in accounts.iter().filter(|a| !a.is_header) {
            merged
                .entry(account.code.as_str())
                .and_modify(|(_, total)| *total += account.balance)
                .or_insert((account, account.balance));
        }

        let mut revenue = ReportSection::default();
        let mut cogs = ReportSection::default();
        let mut opex = ReportSection::default();
        let mut other_income = ReportSection::default();
        let mut other_expenses = ReportSection::default();

        for (code, (account, balance)) in merged {
            let Some(bucket) = classify(account.account_type, code) else {
                continue;
            };
            if balance.is_zero() {
                continue;
            }
            // an account filed against its own side counts negatively
            let amount = if bucket.normal_balance() == account.account_type.normal_balance() {
                balance
            } else {
                -balance
            };
            let item = ReportItem {
                code: code.to_string(),
                name: account.name.clone(),
                amount: normalize_zero(amount),
            };
            match bucket {
                PnlBucket::Revenue(category) => revenue.add(category, item),
                PnlBucket::CostOfGoodsSold(category) => cogs.add(category, item),
                PnlBucket::OperatingExpense(category) => opex.add(category, item),
                PnlBucket::OtherIncome => other_income.add("Other Income", item),
                PnlBucket::OtherExpense => other_expenses.add("Other Expenses", item),
            }
        }

        let gross_profit = revenue.total - cogs.total;
        let operating_income = gross_profit - opex.total;
        let net_income = operating_income + other_income.total - other_expenses.total;

        Ok(ProfitLossReport {
            period_start,
            period_end,
            currency,
            gross_margin: margin(gross_profit, revenue.total),
            operating_margin: margin(operating_income, revenue.total),
            net_margin: margin(net_income, revenue.total),
            revenue,
            cost_of_goods_sold: cogs,
            gross_profit,
            operating_expenses: opex,
            operating_income,
            ebitda: operating_income,
            other_income,
            other_expenses,
            net_income,
        })
    }
}

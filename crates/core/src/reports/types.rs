//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::types::{AccountId, Currency};
use serde::{Deserialize, Serialize};

use crate::coa::AccountType;

/// Account balance for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAccount {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Header accounts carry rolled-up totals.
    pub is_header: bool,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

/// One account in the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Debit minus credit.
    pub difference: Decimal,
    /// Whether debits equal credits within 0.01.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency.
    pub currency: Currency,
    /// Leaf accounts with a balance.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// One line of a balance sheet or P&L category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    /// Account code, or a synthetic code such as `PPN_NET`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Amount on the section's normal side.
    pub amount: Decimal,
}

/// Group of items within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCategory {
    /// Category name.
    pub name: String,
    /// Category total.
    pub total: Decimal,
    /// Items in this category.
    pub items: Vec<ReportItem>,
}

/// Section of a report (assets, revenue, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section total.
    pub total: Decimal,
    /// Categories in first-seen order.
    pub categories: Vec<ReportCategory>,
}

impl ReportSection {
    /// Adds an item to `category`, creating it on first use.
    pub fn add(&mut self, category: &str, item: ReportItem) {
        self.total += item.amount;
        match self.categories.iter_mut().find(|c| c.name == category) {
            Some(existing) => {
                existing.total += item.amount;
                existing.items.push(item);
            }
            None => self.categories.push(ReportCategory {
                name: category.to_string(),
                total: item.amount,
                items: vec![item],
            }),
        }
    }

    /// Item by code, across categories.
    #[must_use]
    pub fn item(&self, code: &str) -> Option<&ReportItem> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|i| i.code == code)
    }

    /// Category by name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&ReportCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency.
    pub currency: Currency,
    /// Assets section.
    pub assets: ReportSection,
    /// Liabilities section.
    pub liabilities: ReportSection,
    /// Equity section, including unclosed net income.
    pub equity: ReportSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Revenue minus expense not yet closed.
    pub net_income: Decimal,
    /// Assets minus liabilities and equity.
    pub difference: Decimal,
    /// Whether assets equal liabilities plus equity within 0.01.
    pub is_balanced: bool,
}

/// Profit and loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossReport {
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Currency.
    pub currency: Currency,
    /// Operating revenue.
    pub revenue: ReportSection,
    /// Cost of goods sold.
    pub cost_of_goods_sold: ReportSection,
    /// Revenue minus COGS.
    pub gross_profit: Decimal,
    /// Operating expenses.
    pub operating_expenses: ReportSection,
    /// Gross profit minus operating expenses.
    pub operating_income: Decimal,
    /// Operating income before depreciation and amortisation.
    pub ebitda: Decimal,
    /// Non-operating income.
    pub other_income: ReportSection,
    /// Non-operating expenses.
    pub other_expenses: ReportSection,
    /// Operating income plus other income minus other expenses.
    pub net_income: Decimal,
    /// Gross profit as a percentage of revenue.
    pub gross_margin: Option<Decimal>,
    /// Operating income as a percentage of revenue.
    pub operating_margin: Option<Decimal>,
    /// Net income as a percentage of revenue.
    pub net_margin: Option<Decimal>,
}

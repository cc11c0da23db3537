//! Balance sheet with prefix categories and PPN netting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::AccountMapping;
use saldo_shared::types::Currency;

use super::service::{REPORT_TOLERANCE, ReportService};
use super::types::{BalanceSheetReport, ReportAccount, ReportItem, ReportSection};
use crate::coa::{AccountType, normalize_zero};

/// Code of the synthetic net PPN line.
pub const PPN_NET_CODE: &str = "PPN_NET";
/// Code of the synthetic current-year earnings line.
pub const NET_INCOME_CODE: &str = "NET_INCOME";

/// Asset category from the account code.
#[must_use]
pub fn asset_category(code: &str) -> &'static str {
    let p3 = code.get(..3).unwrap_or(code);
    let p2 = code.get(..2).unwrap_or(code);
    match (p2, p3) {
        (_, "110") => "Cash & Bank",
        (_, "112" | "120") => "Receivables",
        (_, "113" | "130") => "Inventory",
        (_, "114" | "115") => "Prepaid",
        (_, "124") => "Tax Assets",
        ("11" | "13", _) => "Other Current Assets",
        ("12" | "16" | "17", _) => "Fixed Assets",
        ("14", _) => "Intangible Assets",
        ("15", _) => "Investments",
        _ => "Other Assets",
    }
}

fn mentions_tax(name: &str, words: &[&str]) -> bool {
    let name = name.to_lowercase();
    words.iter().any(|w| name.contains(w))
}

/// Liability category from the account code and name.
#[must_use]
pub fn liability_category(code: &str, name: &str) -> &'static str {
    let p3 = code.get(..3).unwrap_or(code);
    let p2 = code.get(..2).unwrap_or(code);
    match (p2, p3) {
        (_, "210") => "Accounts Payable",
        (_, "211") => "Short-term Debt",
        (_, "212" | "213") => {
            if mentions_tax(name, &["tax", "pajak", "ppn", "pph"]) {
                "Tax Payable"
            } else {
                "Accrued Liabilities"
            }
        }
        ("21", _) => "Other Current Liabilities",
        ("22", _) => "Long-term Liabilities",
        ("23", _) => {
            if mentions_tax(name, &["tax", "pajak"]) {
                "Deferred Tax"
            } else {
                "Other Liabilities"
            }
        }
        _ => "Other Liabilities",
    }
}

/// Equity category from the account code.
#[must_use]
pub fn equity_category(code: &str) -> &'static str {
    match code.get(..2).unwrap_or(code) {
        "31" => "Share Capital",
        "32" => "Retained Earnings",
        _ => "Other Equity",
    }
}

impl ReportService {
    /// Generates a balance sheet from leaf balances.
    ///
    /// - PPN Keluaran and PPN Masukan are netted into one `PPN_NET` line
    /// - Unclosed revenue and expense appear as a `NET_INCOME` equity line
    /// - Header and zero-balance accounts are skipped
    #[must_use]
    pub fn generate_balance_sheet(
        accounts: &[ReportAccount],
        as_of: NaiveDate,
        currency: Currency,
        mapping: &AccountMapping,
    ) -> BalanceSheetReport {
        let mut assets = ReportSection::default();
        let mut liabilities = ReportSection::default();
        let mut equity = ReportSection::default();

        let mut ppn_output = Decimal::ZERO;
        let mut ppn_input = Decimal::ZERO;
        let mut revenue = Decimal::ZERO;
        let mut expense = Decimal::ZERO;

        for account in accounts.iter().filter(|a| !a.is_header) {
            if account.code == mapping.ppn_output {
                ppn_output += account.balance;
                continue;
            }
            if account.code == mapping.ppn_input {
                ppn_input += account.balance;
                continue;
            }
            match account.account_type {
                AccountType::Revenue => revenue += account.balance,
                AccountType::Expense => expense += account.balance,
                _ if account.balance.is_zero() => {}
                AccountType::Asset => assets.add(asset_category(&account.code), item(account)),
                AccountType::Liability => liabilities.add(
                    liability_category(&account.code, &account.name),
                    item(account),
                ),
                AccountType::Equity => equity.add(equity_category(&account.code), item(account)),
            }
        }

        let ppn_net = ppn_output - ppn_input;
        if ppn_net > Decimal::ZERO {
            liabilities.add(
                "Tax Payable",
                ReportItem {
                    code: PPN_NET_CODE.to_string(),
                    name: "Utang PPN (Net)".to_string(),
                    amount: ppn_net,
                },
            );
        } else if ppn_net < Decimal::ZERO {
            assets.add(
                "Tax Assets",
                ReportItem {
                    code: PPN_NET_CODE.to_string(),
                    name: "Lebih Bayar PPN (Net)".to_string(),
                    amount: -ppn_net,
                },
            );
        }

        let net_income = revenue - expense;
        if !revenue.is_zero() || !expense.is_zero() {
            equity.add(
                "Current Year Earnings",
                ReportItem {
                    code: NET_INCOME_CODE.to_string(),
                    name: "Laba Tahun Berjalan".to_string(),
                    amount: net_income,
                },
            );
        }

        let total_assets = normalize_zero(assets.total);
        let total_liabilities = normalize_zero(liabilities.total);
        let total_equity = normalize_zero(equity.total);
        let liabilities_and_equity = total_liabilities + total_equity;
        let difference = total_assets - liabilities_and_equity;

        BalanceSheetReport {
            as_of,
            currency,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            net_income: normalize_zero(net_income),
            difference,
            is_balanced: difference.abs() <= REPORT_TOLERANCE,
        }
    }
}

fn item(account: &ReportAccount) -> ReportItem {
    ReportItem {
        code: account.code.clone(),
        name: account.name.clone(),
        amount: normalize_zero(account.balance),
    }
}

//! Period closing: move revenue and expense balances to retained earnings.
//!
//! ```text
//! Dr  each revenue account        balance
//!     Cr  Retained earnings       total revenue
//! Dr  Retained earnings           total expense
//!     Cr  each expense account    balance
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ClosingError;
use crate::coa::{AccountType, ChartOfAccounts};
use crate::ledger::{AccountBalance, DraftLine, JournalDraft, JournalSource, SourceType};

/// Balances at or below this are left open.
const MIN_CLOSING_BALANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One temporary account to be zeroed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Normal-side balance being closed.
    pub balance: Decimal,
}

/// What a closing would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingPreview {
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Revenue accounts with a balance.
    pub revenue_accounts: Vec<ClosingLine>,
    /// Expense accounts with a balance.
    pub expense_accounts: Vec<ClosingLine>,
    /// Sum of revenue balances.
    pub total_revenue: Decimal,
    /// Sum of expense balances.
    pub total_expense: Decimal,
    /// Revenue minus expense.
    pub net_income: Decimal,
}

impl ClosingPreview {
    /// Whether there is anything to close.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revenue_accounts.is_empty() && self.expense_accounts.is_empty()
    }
}

/// Stateless service for period closing.
pub struct ClosingService;

impl ClosingService {
    /// Collects the revenue and expense balances to close.
    ///
    /// `balances` are normal-side balances as of `end`. Header accounts and
    /// balances of 0.01 or less are skipped.
    #[must_use]
    pub fn preview(
        chart: &ChartOfAccounts,
        balances: &BTreeMap<String, AccountBalance>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClosingPreview {
        let mut revenue_accounts = Vec::new();
        let mut expense_accounts = Vec::new();

        for (code, balance) in balances {
            let Some(account) = chart.by_code(code) else {
                continue;
            };
            if account.is_header || balance.balance <= MIN_CLOSING_BALANCE {
                continue;
            }
            let line = ClosingLine {
                code: code.clone(),
                name: account.name.clone(),
                balance: balance.balance,
            };
            match account.account_type {
                AccountType::Revenue => revenue_accounts.push(line),
                AccountType::Expense => expense_accounts.push(line),
                AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
            }
        }

        let total_revenue: Decimal = revenue_accounts.iter().map(|l| l.balance).sum();
        let total_expense: Decimal = expense_accounts.iter().map(|l| l.balance).sum();

        ClosingPreview {
            start_date: start,
            end_date: end,
            revenue_accounts,
            expense_accounts,
            total_revenue,
            total_expense,
            net_income: total_revenue - total_expense,
        }
    }

    /// Builds the closing journal, dated on the last day of the period.
    ///
    /// # Errors
    ///
    /// `NothingToClose` when the preview is empty.
    pub fn build(preview: &ClosingPreview, retained_earnings: &str) -> Result<JournalDraft, ClosingError> {
        if preview.is_empty() {
            return Err(ClosingError::NothingToClose {
                start: preview.start_date,
                end: preview.end_date,
            });
        }

        let mut draft = JournalDraft::new(
            JournalSource::standalone(
                SourceType::Closing,
                format!("CLOSING-{}-{}", preview.start_date, preview.end_date),
            ),
            preview.end_date,
            format!(
                "Period closing {} to {}",
                preview.start_date, preview.end_date
            ),
        );

        for line in &preview.revenue_accounts {
            draft.push(DraftLine::debit(&line.code, line.balance, format!("Close {}", line.name)));
        }
        draft
            .push(DraftLine::credit(
                retained_earnings,
                preview.total_revenue,
                "Revenue to retained earnings",
            ))
            .push(DraftLine::debit(
                retained_earnings,
                preview.total_expense,
                "Expense to retained earnings",
            ));
        for line in &preview.expense_accounts {
            draft.push(DraftLine::credit(&line.code, line.balance, format!("Close {}", line.name)));
        }

        Ok(draft)
    }
}

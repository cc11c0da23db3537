//! Payment method and the settlement account it implies.

use saldo_shared::AccountMapping;
use serde::{Deserialize, Serialize};

/// How a document is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Paid in cash on the spot.
    Cash,
    /// Paid by bank transfer on the spot.
    Bank,
    /// Settled later through receivables or payables.
    Credit,
}

impl PaymentMethod {
    /// Parses a method, ignoring case. Empty or unknown input means credit.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "CASH" | "TUNAI" => Self::Cash,
            "TRANSFER" | "BANK" | "BANK_TRANSFER" => Self::Bank,
            _ => Self::Credit,
        }
    }

    /// Whether the document is settled immediately.
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Cash | Self::Bank)
    }

    /// Debit account for a sale: cash, bank, or receivables.
    ///
    /// A linked cash/bank account code on the document overrides the default
    /// bank account. Cash always lands on the cash account.
    #[must_use]
    pub fn sale_account(self, accounts: &AccountMapping, linked: Option<&str>) -> String {
        match self {
            Self::Cash => accounts.cash.clone(),
            Self::Bank => linked.unwrap_or(&accounts.bank).to_string(),
            Self::Credit => accounts.accounts_receivable.clone(),
        }
    }

    /// Credit account for a purchase: cash, bank, or payables.
    #[must_use]
    pub fn purchase_account(self, accounts: &AccountMapping, linked: Option<&str>) -> String {
        match self {
            Self::Cash => accounts.cash.clone(),
            Self::Bank => linked.unwrap_or(&accounts.bank).to_string(),
            Self::Credit => accounts.accounts_payable.clone(),
        }
    }
}

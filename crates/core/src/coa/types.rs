//! Account types and the account record.

use rust_decimal::Decimal;
use saldo_shared::types::AccountId;
use serde::{Deserialize, Serialize};

use super::error::ChartError;
use crate::ledger::balance::NormalBalance;

/// Top-level classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum AccountType {
    /// Aset.
    Asset,
    /// Kewajiban.
    Liability,
    /// Modal.
    Equity,
    /// Pendapatan.
    Revenue,
    /// Beban.
    Expense,
}

impl AccountType {
    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parses English and Indonesian names, singular or plural, any case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASSET" | "ASSETS" | "ASET" | "AKTIVA" => Some(Self::Asset),
            "LIABILITY" | "LIABILITIES" | "KEWAJIBAN" | "HUTANG" | "UTANG" => Some(Self::Liability),
            "EQUITY" | "MODAL" | "EKUITAS" => Some(Self::Equity),
            "REVENUE" | "REVENUES" | "INCOME" | "PENDAPATAN" => Some(Self::Revenue),
            "EXPENSE" | "EXPENSES" | "BEBAN" | "BIAYA" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Side on which the balance grows.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Revenue and expense accounts are closed at period end.
    #[must_use]
    pub const fn is_temporary(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ChartError::UnknownAccountType(s.to_string()))
    }
}

impl TryFrom<String> for AccountType {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn default_true() -> bool {
    true
}

/// Chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    #[serde(default)]
    pub id: AccountId,
    /// Unique account code, e.g. `1101`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Free-form category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Code of the parent account.
    #[serde(default)]
    pub parent_code: Option<String>,
    /// Header accounts aggregate children and take no postings.
    #[serde(default)]
    pub is_header: bool,
    /// Inactive accounts take no postings.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Cached balance on the normal side.
    #[serde(default)]
    pub balance: Decimal,
}

impl Account {
    /// Active leaf account with a zero balance.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: AccountId::new(),
            code: code.into(),
            name: name.into(),
            account_type,
            category: None,
            parent_code: None,
            is_header: false,
            is_active: true,
            balance: Decimal::ZERO,
        }
    }

    /// Marks the account as a header.
    #[must_use]
    pub fn header(mut self) -> Self {
        self.is_header = true;
        self
    }

    /// Sets the parent code.
    #[must_use]
    pub fn under(mut self, parent_code: impl Into<String>) -> Self {
        self.parent_code = Some(parent_code.into());
        self
    }

    /// Sets the cached balance.
    #[must_use]
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// Marks the account inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Normal side of the account.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ASSET", AccountType::Asset)]
    #[case("assets", AccountType::Asset)]
    #[case("Aset", AccountType::Asset)]
    #[case("KEWAJIBAN", AccountType::Liability)]
    #[case("liabilities", AccountType::Liability)]
    #[case("MODAL", AccountType::Equity)]
    #[case("pendapatan", AccountType::Revenue)]
    #[case("INCOME", AccountType::Revenue)]
    #[case("Beban", AccountType::Expense)]
    fn test_parse_aliases(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(AccountType::parse(input), Some(expected));
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert_eq!(
            "CONTRA".parse::<AccountType>(),
            Err(ChartError::UnknownAccountType("CONTRA".into()))
        );
    }

    #[test]
    fn test_normal_balance() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Liability.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[rstest]
    #[case("KEWAJIBAN", NormalBalance::Credit)]
    #[case("MODAL", NormalBalance::Credit)]
    #[case("PENDAPATAN", NormalBalance::Credit)]
    #[case("BIAYA", NormalBalance::Debit)]
    #[case("AKTIVA", NormalBalance::Debit)]
    fn test_local_aliases_take_their_type_side(#[case] input: &str, #[case] expected: NormalBalance) {
        assert_eq!(AccountType::parse(input).map(AccountType::normal_balance), Some(expected));
    }

    #[test]
    fn test_deserialize_account_with_defaults() {
        let account: Account = serde_json::from_str(
            r#"{"code": "1101", "name": "Kas", "account_type": "aset", "parent_code": "1100"}"#,
        )
        .unwrap();
        assert_eq!(account.account_type, AccountType::Asset);
        assert!(account.is_active);
        assert!(!account.is_header);
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.parent_code.as_deref(), Some("1100"));
    }

    #[test]
    fn test_serialize_type_upper_case() {
        assert_eq!(serde_json::to_string(&AccountType::Revenue).unwrap(), "\"REVENUE\"");
    }
}

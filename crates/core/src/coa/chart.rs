//! Validated account hierarchy.

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use saldo_shared::types::AccountId;

use super::error::ChartError;
use super::types::Account;
use crate::ledger::balance::NormalBalance;
use crate::ledger::service::AccountInfo;

/// Chart of accounts indexed by code and ID.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<AccountId, usize>,
}

impl ChartOfAccounts {
    /// Builds and validates a chart.
    ///
    /// # Errors
    ///
    /// Duplicate codes, unknown parents, parent cycles, and children whose type
    /// differs from their parent's.
    pub fn new(accounts: Vec<Account>) -> Result<Self, ChartError> {
        let mut by_code = HashMap::with_capacity(accounts.len());
        let mut by_id = HashMap::with_capacity(accounts.len());

        for (i, account) in accounts.iter().enumerate() {
            if by_code.insert(account.code.clone(), i).is_some() {
                return Err(ChartError::DuplicateCode(account.code.clone()));
            }
            by_id.insert(account.id, i);
        }

        let chart = Self {
            accounts,
            by_code,
            by_id,
        };
        chart.validate_hierarchy()?;
        Ok(chart)
    }

    fn validate_hierarchy(&self) -> Result<(), ChartError> {
        for account in &self.accounts {
            let Some(parent_code) = &account.parent_code else {
                continue;
            };
            let parent = self.by_code(parent_code).ok_or_else(|| ChartError::ParentNotFound {
                code: account.code.clone(),
                parent: parent_code.clone(),
            })?;
            if parent.account_type != account.account_type {
                return Err(ChartError::TypeMismatch {
                    code: account.code.clone(),
                    parent: parent.code.clone(),
                });
            }

            let mut seen = HashSet::from([account.code.as_str()]);
            let mut cursor = Some(parent);
            while let Some(current) = cursor {
                if !seen.insert(current.code.as_str()) {
                    return Err(ChartError::CycleDetected(account.code.clone()));
                }
                cursor = current.parent_code.as_deref().and_then(|c| self.by_code(c));
            }
        }
        Ok(())
    }

    /// All accounts in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Account by code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(code).map(|&i| &self.accounts[i])
    }

    /// Account by ID.
    #[must_use]
    pub fn by_id(&self, id: AccountId) -> Option<&Account> {
        self.by_id.get(&id).map(|&i| &self.accounts[i])
    }

    /// Direct children of `code`.
    #[must_use]
    pub fn children(&self, code: &str) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.parent_code.as_deref() == Some(code))
            .collect()
    }

    /// Depth of `code` in the hierarchy; roots are level 1.
    #[must_use]
    pub fn level(&self, code: &str) -> Option<usize> {
        let mut level = 0;
        let mut cursor = self.by_code(code);
        while let Some(account) = cursor {
            level += 1;
            cursor = account.parent_code.as_deref().and_then(|c| self.by_code(c));
        }
        (level > 0).then_some(level)
    }

    /// Normal side for `code`; unknown codes fall back to debit-normal.
    #[must_use]
    pub fn normal_of(&self, code: &str) -> NormalBalance {
        self.by_code(code)
            .map_or(NormalBalance::Debit, Account::normal_balance)
    }

    /// Posting view of an account.
    #[must_use]
    pub fn account_info(&self, code: &str) -> Option<AccountInfo> {
        self.by_code(code).map(|a| AccountInfo {
            id: a.id,
            code: a.code.clone(),
            is_active: a.is_active,
            is_header: a.is_header,
        })
    }

    /// Leaf balances plus every header's recursive sum of its children.
    ///
    /// Amounts posted directly to a header, if any, are kept in its total.
    #[must_use]
    pub fn roll_up(&self, leaf_balances: &BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
        let mut memo: HashMap<&str, Decimal> = HashMap::with_capacity(self.accounts.len());
        for account in &self.accounts {
            self.rolled(&account.code, leaf_balances, &mut memo);
        }
        memo.into_iter().map(|(code, v)| (code.to_string(), v)).collect()
    }

    fn rolled<'a>(
        &'a self,
        code: &'a str,
        leaf_balances: &BTreeMap<String, Decimal>,
        memo: &mut HashMap<&'a str, Decimal>,
    ) -> Decimal {
        if let Some(value) = memo.get(code) {
            return *value;
        }
        let own = leaf_balances.get(code).copied().unwrap_or_default();
        let children: Decimal = self
            .accounts
            .iter()
            .filter(|a| a.parent_code.as_deref() == Some(code))
            .map(|child| self.rolled(&child.code, leaf_balances, memo))
            .sum();
        let total = own + children;
        memo.insert(code, total);
        total
    }

    /// Codes that appear in balances but not in the chart.
    #[must_use]
    pub fn unknown_codes<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        codes
            .into_iter()
            .filter(|c| self.by_code(c).is_none())
            .cloned()
            .collect()
    }
}

//! Chart of accounts errors.

use saldo_shared::AppError;
use thiserror::Error;

/// Errors raised while building or querying the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Two accounts share a code.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent code does not exist.
    #[error("Parent account '{parent}' of '{code}' not found")]
    ParentNotFound {
        /// Child account code.
        code: String,
        /// Missing parent code.
        parent: String,
    },

    /// Parent chain loops back on itself.
    #[error("Account hierarchy cycle detected at '{0}'")]
    CycleDetected(String),

    /// Child type differs from its parent's type.
    #[error("Account '{code}' type differs from parent '{parent}'")]
    TypeMismatch {
        /// Child account code.
        code: String,
        /// Parent account code.
        parent: String,
    },

    /// Account type string not recognised.
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),

    /// Account code not in the chart.
    #[error("Account not found: {0}")]
    AccountNotFound(String),
}

impl ChartError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::ParentNotFound { .. } => "PARENT_NOT_FOUND",
            Self::CycleDetected(_) => "HIERARCHY_CYCLE",
            Self::TypeMismatch { .. } => "ACCOUNT_TYPE_MISMATCH",
            Self::UnknownAccountType(_) => "UNKNOWN_ACCOUNT_TYPE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        }
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::AccountNotFound(_) | ChartError::ParentNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            ChartError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

//! Engine services over a [`LedgerRepository`](crate::LedgerRepository).
//!
//! - `engine` - Engine type, draft preparation and batching
//! - `posting` - Documents and status changes
//! - `reversal` - Reversing entries
//! - `closing` - Period closing
//! - `balances` - Derived balances, cache sync, integrity and reconciliation
//! - `reports` - Trial balance, balance sheet, profit and loss

pub mod balances;
pub mod closing;
pub mod engine;
pub mod posting;
pub mod reports;
pub mod reversal;

#[cfg(test)]
mod fixtures;

pub use closing::ClosingReceipt;
pub use engine::{PostingEngine, PostingReceipt};
pub use posting::{PostOutcome, StatusChangeOutcome};

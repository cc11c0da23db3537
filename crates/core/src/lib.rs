//! Core accounting logic for Saldo.
//!
//! This crate contains pure domain logic with no storage or I/O dependencies.
//! Posting rules, validation, and calculations live here; the store crate
//! persists what these modules produce.
//!
//! # Modules
//!
//! - `coa` - Chart of accounts, hierarchy and sign conventions
//! - `ledger` - Double-entry journals, validation and balance derivation
//! - `posting` - Journal builders for sales, purchases and payments
//! - `workflow` - Journal reversal
//! - `fiscal` - Accounting periods and period closing
//! - `reports` - Trial balance, balance sheet, profit and loss
//! - `reconciliation` - Balance integrity and ledger comparison

pub mod coa;
pub mod fiscal;
pub mod ledger;
pub mod posting;
pub mod reconciliation;
pub mod reports;
pub mod workflow;

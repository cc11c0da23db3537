//! Shared types, errors, and configuration for Saldo.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error type
//! - Engine configuration

pub mod config;
pub mod error;
pub mod types;

pub use config::{AccountMapping, AppConfig, LedgerSettings, PostingSettings, TaxRates};
pub use error::{AppError, AppResult};

//! Financial report generation.
//!
//! Pure functions over derived balances:
//! - Trial Balance
//! - Balance Sheet, with PPN netting
//! - Profit and Loss

pub mod balance_sheet;
pub mod error;
pub mod profit_loss;
pub mod service;
pub mod types;


pub use balance_sheet::{NET_INCOME_CODE, PPN_NET_CODE};
pub use error::ReportError;
pub use profit_loss::{PnlBucket, classify};
pub use service::ReportService;
pub use types::*;

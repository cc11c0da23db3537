//! Accounting periods and period closing.

pub mod closing;
pub mod error;
pub mod period;

pub use closing::{ClosingLine, ClosingPreview, ClosingService};
pub use error::ClosingError;
pub use period::{
    AccountingPeriod, LastClosing, is_date_in_closed_period, last_closing, validate_new_period,
};

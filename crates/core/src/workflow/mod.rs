//! Journal lifecycle after posting.
//!
//! Posted journals are immutable. Corrections are made by posting a reversing
//! journal that swaps every debit and credit.
//!
//! # Modules
//!
//! - `error` - Reversal error types
//! - `reversal` - Reversing entry creation

pub mod error;
pub mod reversal;

#[cfg(test)]
mod reversal_props;

pub use error::ReversalError;
pub use reversal::{ReversalPlan, ReversalService};

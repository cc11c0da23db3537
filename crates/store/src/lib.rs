//! Ledger storage and the posting engine.
//!
//! This crate provides:
//! - The `LedgerRepository` seam and its atomic `PostingBatch`
//! - `MemoryStore`, a lock-guarded store holding both ledgers
//! - `PostingEngine`, which runs the core posting rules against a repository

pub mod error;
pub mod memory;
pub mod repository;
pub mod services;

pub use error::{EngineError, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repository::{EntryNumbers, LedgerRepository, PostingBatch};
pub use services::{
    ClosingReceipt, PostOutcome, PostingEngine, PostingReceipt, StatusChangeOutcome,
};

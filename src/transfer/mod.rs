//! Funds movement between wallet balances
//!
//! A transfer debits the sender by `amount + fee`, credits the receiver by
//! `amount`, and accrues the fee to the treasury wallet, all inside one
//! atomic unit of work. Exactly-once effect per idempotency key is enforced
//! by the store's uniqueness constraint; races on balances are resolved by
//! version-gated conditional updates.

pub mod engine;
pub mod error;
pub mod fee;
pub mod models;
pub mod repository;
pub mod types;

pub use engine::TransferEngine;
pub use error::{ErrorKind, TransferError};
pub use models::{Flow, LedgerEntry, Transfer, TransferId};
pub use repository::{InsertOutcome, TransferRepository};
pub use types::{TransferCommand, TransferReceipt};

//! Wallet Ledger - peer-to-peer transfer core
//!
//! Moves funds between wallet balances with exactly-once effect per
//! client-supplied idempotency key. Correctness under concurrent requests
//! rests on two store-level mechanisms only: version-gated conditional
//! updates on balances and a uniqueness constraint on
//! `(from_wallet, idempotency_key)`. No in-process locks.
//!
//! # Modules
//!
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL connection pool
//! - [`schema`] - ledger relations and startup DDL
//! - [`wallet`] - Wallet and WalletBalance entities
//! - [`transfer`] - fee policy, transfer engine, idempotent insert resolver
//!
//! The HTTP surface, caller authentication, and post-transfer notification
//! delivery are collaborators of this crate, not part of it. The
//! [`transfer::TransferError::http_status`] hint exists so the embedding
//! service can map failures without inspecting variants.

pub mod config;
pub mod db;
pub mod logging;
pub mod schema;
pub mod transfer;
pub mod wallet;

// Convenient re-exports at crate root
pub use config::{AppConfig, LedgerConfig};
pub use db::Database;
pub use transfer::{
    Flow, InsertOutcome, LedgerEntry, Transfer, TransferCommand, TransferEngine, TransferError,
    TransferReceipt,
};
pub use wallet::{Wallet, WalletBalance, WalletId};

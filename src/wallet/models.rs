//! Data models for wallets and their balances

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Wallet identity
pub type WalletId = Uuid;

/// A wallet. Identity plus an owner reference; the balance lives in its own
/// row so it can be mutated through the version-gated path only.
///
/// At most one wallet carries `is_treasury = true` (partial unique index).
/// The treasury wallet accumulates fees and is never a transfer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    pub wallet_id: WalletId,
    pub owner_id: i64,
    pub is_treasury: bool,
    pub created_at: DateTime<Utc>,
}

/// One-to-one balance row for a wallet.
///
/// `version` increments by exactly 1 on every successful mutation; every
/// write is gated on the version observed at snapshot time. Compare-and-swap,
/// not a row lock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalletBalance {
    pub wallet_id: WalletId,
    pub balance: Decimal,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

/// Balance and version as observed at the start of a unit of work.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct BalanceSnapshot {
    pub balance: Decimal,
    pub version: i64,
}

//! Persisted transfer rows and their ledger legs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::wallet::models::WalletId;

/// Transfer identity
pub type TransferId = Uuid;

/// One funds-movement event. Created exactly once per
/// `(from_wallet, idempotency_key)`, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transfer {
    pub transfer_id: TransferId,
    pub from_wallet: WalletId,
    pub to_wallet: WalletId,
    pub amount: Decimal,
    pub fee: Decimal,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

/// Direction of a ledger leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Flow {
    /// Funds arriving at the receiving wallet
    Debit = 1,
    /// Funds leaving the sending wallet (amount plus fee)
    Credit = 2,
    /// Fee accrued to the treasury wallet
    Fee = 3,
}

impl Flow {
    /// Numeric ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Flow::Debit),
            2 => Some(Flow::Credit),
            3 => Some(Flow::Fee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Debit => "debit",
            Flow::Credit => "credit",
            Flow::Fee => "fee",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for Flow {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Flow::from_id(value).ok_or_else(|| format!("Invalid flow id: {}", value))
    }
}

/// Append-only ledger leg of a transfer. Never updated or deleted.
///
/// A transfer produces two or three legs: the sender's credit leg for
/// `amount + fee`, the receiver's debit leg for `amount`, and a fee leg on
/// the treasury wallet when `fee > 0`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerEntry {
    pub entry_id: i64,
    pub wallet_id: WalletId,
    pub transfer_id: TransferId,
    #[sqlx(try_from = "i16")]
    pub flow: Flow,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_ids_round_trip() {
        for flow in [Flow::Debit, Flow::Credit, Flow::Fee] {
            assert_eq!(Flow::from_id(flow.id()), Some(flow));
            assert_eq!(Flow::try_from(flow.id()), Ok(flow));
        }
    }

    #[test]
    fn test_flow_rejects_unknown_id() {
        assert_eq!(Flow::from_id(0), None);
        assert_eq!(Flow::from_id(4), None);
        assert!(Flow::try_from(99).is_err());
    }

    #[test]
    fn test_flow_as_str() {
        assert_eq!(Flow::Debit.as_str(), "debit");
        assert_eq!(Flow::Credit.as_str(), "credit");
        assert_eq!(Flow::Fee.as_str(), "fee");
    }
}

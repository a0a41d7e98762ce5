//! Command and receipt types at the engine boundary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::TransferError;
use super::models::{Transfer, TransferId};
use crate::wallet::models::WalletId;

/// A validated request to move funds.
///
/// Construction rejects malformed commands before any store interaction:
/// identical endpoints, non-positive amounts, more than 2 fraction digits,
/// empty idempotency key. A caller retrying a transfer must reuse the exact
/// same idempotency key.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    from_wallet: WalletId,
    to_wallet: WalletId,
    amount: Decimal,
    idempotency_key: String,
}

impl TransferCommand {
    pub fn new(
        from_wallet: WalletId,
        to_wallet: WalletId,
        amount: Decimal,
        idempotency_key: impl Into<String>,
    ) -> Result<Self, TransferError> {
        if from_wallet == to_wallet {
            return Err(TransferError::SameWallet);
        }
        if amount <= Decimal::ZERO {
            return Err(TransferError::NonPositiveAmount);
        }
        if amount != amount.round_dp(2) {
            return Err(TransferError::ExcessivePrecision);
        }
        let idempotency_key = idempotency_key.into();
        if idempotency_key.trim().is_empty() {
            return Err(TransferError::EmptyIdempotencyKey);
        }
        Ok(Self {
            from_wallet,
            to_wallet,
            amount,
            idempotency_key,
        })
    }

    pub fn from_wallet(&self) -> WalletId {
        self.from_wallet
    }

    pub fn to_wallet(&self) -> WalletId {
        self.to_wallet
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }
}

/// Outcome of a successful transfer, new or replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    pub from_wallet: WalletId,
    pub to_wallet: WalletId,
    pub amount: Decimal,
}

impl From<Transfer> for TransferReceipt {
    fn from(t: Transfer) -> Self {
        Self {
            transfer_id: t.transfer_id,
            from_wallet: t.from_wallet,
            to_wallet: t.to_wallet,
            amount: t.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_valid_command() {
        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec("10.50"), "key-1");
        assert!(cmd.is_ok());
        let cmd = cmd.unwrap();
        assert_eq!(cmd.amount(), dec("10.50"));
        assert_eq!(cmd.idempotency_key(), "key-1");
    }

    #[test]
    fn test_rejects_same_wallet() {
        let wallet = Uuid::new_v4();
        let cmd = TransferCommand::new(wallet, wallet, dec("10.00"), "key-1");
        assert!(matches!(cmd, Err(TransferError::SameWallet)));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec("0.00"), "key-1");
        assert!(matches!(cmd, Err(TransferError::NonPositiveAmount)));

        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec("-5.00"), "key-1");
        assert!(matches!(cmd, Err(TransferError::NonPositiveAmount)));
    }

    #[test]
    fn test_rejects_excessive_precision() {
        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec("10.001"), "key-1");
        assert!(matches!(cmd, Err(TransferError::ExcessivePrecision)));
    }

    #[test]
    fn test_rejects_empty_idempotency_key() {
        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec("10.00"), "");
        assert!(matches!(cmd, Err(TransferError::EmptyIdempotencyKey)));

        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), dec("10.00"), "   ");
        assert!(matches!(cmd, Err(TransferError::EmptyIdempotencyKey)));
    }

    #[test]
    fn test_receipt_serializes_amount_as_string() {
        let receipt = TransferReceipt {
            transfer_id: Uuid::nil(),
            from_wallet: Uuid::nil(),
            to_wallet: Uuid::nil(),
            amount: dec("1001.00"),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        // Decimal serializes as string to preserve precision
        assert_eq!(json["amount"], serde_json::json!("1001.00"));
    }
}

//! Transfer error types
//!
//! Every failure carries a stable machine-readable code; `http_status` is a
//! mapping hint for the embedding HTTP service, which owns the actual
//! translation.

use thiserror::Error;

use crate::wallet::models::WalletId;

/// Failure class, for caller-side policy.
///
/// `Concurrency` failures are safe to retry with the identical command;
/// `BusinessRule` failures are not retry-useful without a changed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Command rejected before any store interaction
    Validation,
    /// Rule violated during the unit of work; zero persisted effect
    BusinessRule,
    /// Store-detected race; unit of work fully rolled back
    Concurrency,
    /// Store or configuration fault
    Internal,
}

/// Transfer failure taxonomy
#[derive(Error, Debug)]
pub enum TransferError {
    // === Validation (pre-store) ===
    #[error("Source and destination wallet cannot be the same")]
    SameWallet,

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Amount precision exceeds 2 fraction digits")]
    ExcessivePrecision,

    #[error("Idempotency key must not be empty")]
    EmptyIdempotencyKey,

    // === Business rules ===
    #[error("Treasury wallet cannot be a transfer endpoint")]
    TreasuryEndpoint,

    #[error("No balance row for wallet {0}")]
    BalanceNotFound(WalletId),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Idempotency key reused with a different payload")]
    IdempotencyConflict,

    // === Concurrency ===
    #[error("Balance modified concurrently; retry with the same command")]
    ConcurrentModification,

    // === System ===
    #[error("No treasury wallet provisioned")]
    TreasuryMissing,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl TransferError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SameWallet => "SAME_WALLET",
            TransferError::NonPositiveAmount => "INVALID_AMOUNT",
            TransferError::ExcessivePrecision => "EXCESSIVE_PRECISION",
            TransferError::EmptyIdempotencyKey => "EMPTY_IDEMPOTENCY_KEY",
            TransferError::TreasuryEndpoint => "TREASURY_ENDPOINT",
            TransferError::BalanceNotFound(_) => "BALANCE_NOT_FOUND",
            TransferError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferError::IdempotencyConflict => "IDEMPOTENCY_CONFLICT",
            TransferError::ConcurrentModification => "CONCURRENT_MODIFICATION",
            TransferError::TreasuryMissing => "TREASURY_MISSING",
            TransferError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Failure class for caller-side retry policy
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::SameWallet
            | TransferError::NonPositiveAmount
            | TransferError::ExcessivePrecision
            | TransferError::EmptyIdempotencyKey => ErrorKind::Validation,
            TransferError::TreasuryEndpoint
            | TransferError::BalanceNotFound(_)
            | TransferError::InsufficientFunds
            | TransferError::IdempotencyConflict => ErrorKind::BusinessRule,
            TransferError::ConcurrentModification => ErrorKind::Concurrency,
            TransferError::TreasuryMissing | TransferError::Database(_) => ErrorKind::Internal,
        }
    }

    /// Safe to re-invoke with the identical command, same idempotency key
    /// included.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransferError::ConcurrentModification)
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::SameWallet
            | TransferError::NonPositiveAmount
            | TransferError::ExcessivePrecision
            | TransferError::EmptyIdempotencyKey => 400,
            TransferError::TreasuryEndpoint => 403,
            TransferError::BalanceNotFound(_) => 404,
            TransferError::InsufficientFunds | TransferError::IdempotencyConflict => 422,
            TransferError::ConcurrentModification => 409,
            TransferError::TreasuryMissing | TransferError::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::SameWallet.code(), "SAME_WALLET");
        assert_eq!(
            TransferError::InsufficientFunds.code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            TransferError::ConcurrentModification.code(),
            "CONCURRENT_MODIFICATION"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::SameWallet.http_status(), 400);
        assert_eq!(TransferError::TreasuryEndpoint.http_status(), 403);
        assert_eq!(TransferError::InsufficientFunds.http_status(), 422);
        assert_eq!(TransferError::ConcurrentModification.http_status(), 409);
        assert_eq!(TransferError::TreasuryMissing.http_status(), 500);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(TransferError::SameWallet.kind(), ErrorKind::Validation);
        assert_eq!(
            TransferError::InsufficientFunds.kind(),
            ErrorKind::BusinessRule
        );
        assert_eq!(
            TransferError::IdempotencyConflict.kind(),
            ErrorKind::BusinessRule
        );
        assert_eq!(
            TransferError::ConcurrentModification.kind(),
            ErrorKind::Concurrency
        );
    }

    #[test]
    fn test_only_concurrent_modification_is_retryable() {
        assert!(TransferError::ConcurrentModification.is_retryable());
        assert!(!TransferError::InsufficientFunds.is_retryable());
        assert!(!TransferError::IdempotencyConflict.is_retryable());
        assert!(!TransferError::SameWallet.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = TransferError::InsufficientFunds;
        assert_eq!(err.to_string(), "Insufficient funds");
    }
}

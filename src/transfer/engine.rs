//! Transfer engine
//!
//! Runs a funds movement as one atomic unit of work: validation, fee
//! derivation, snapshot reads, idempotent Transfer insertion, version-gated
//! balance updates, ledger legs, commit. Any failure drops the transaction,
//! rolling the whole attempt back.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::error::TransferError;
use super::fee;
use super::repository::{InsertOutcome, TransferRepository};
use super::types::{TransferCommand, TransferReceipt};
use crate::db::Database;
use crate::wallet::models::WalletId;
use crate::wallet::repository::WalletRepository;

/// Orchestrates transfers against the ledger store.
///
/// The treasury wallet is resolved once at construction; it is a fee sink
/// only and never a transfer endpoint. Many callers may share one engine and
/// invoke it concurrently - correctness rests on the store's uniqueness
/// constraint and the version-gated writes, not on any in-process lock.
pub struct TransferEngine {
    pool: PgPool,
    treasury: WalletId,
}

impl TransferEngine {
    /// Resolve the treasury wallet by its flag and build the engine.
    ///
    /// Startup precondition: fails with `TreasuryMissing` when no treasury
    /// wallet is provisioned.
    pub async fn new(db: &Database) -> Result<Self, TransferError> {
        let treasury = WalletRepository::treasury_wallet(db.pool())
            .await?
            .ok_or(TransferError::TreasuryMissing)?;

        tracing::info!(treasury = %treasury, "Treasury wallet resolved");
        Ok(Self {
            pool: db.pool().clone(),
            treasury,
        })
    }

    /// Build the engine with a configured treasury wallet id, skipping the
    /// flag lookup.
    pub fn with_treasury(db: &Database, treasury: WalletId) -> Self {
        Self {
            pool: db.pool().clone(),
            treasury,
        }
    }

    pub fn treasury(&self) -> WalletId {
        self.treasury
    }

    /// Execute a transfer command.
    ///
    /// On success returns the receipt of the created Transfer. Replaying a
    /// command whose key was already used with an identical payload returns
    /// the stored Transfer without mutating anything. Every failure leaves
    /// persisted state exactly as it was; `ConcurrentModification` is safe
    /// to retry with the identical command.
    pub async fn execute(&self, cmd: &TransferCommand) -> Result<TransferReceipt, TransferError> {
        if cmd.from_wallet() == self.treasury || cmd.to_wallet() == self.treasury {
            return Err(TransferError::TreasuryEndpoint);
        }

        let fee = fee::fee_for(cmd.amount());
        let credit = fee::credit_amount(cmd.amount(), fee);

        // Dropping `tx` on any early return rolls the whole attempt back,
        // including the Transfer row inserted below.
        let mut tx = self.pool.begin().await?;

        let from = TransferRepository::balance_snapshot(&mut tx, cmd.from_wallet())
            .await?
            .ok_or(TransferError::BalanceNotFound(cmd.from_wallet()))?;
        let to = TransferRepository::balance_snapshot(&mut tx, cmd.to_wallet())
            .await?
            .ok_or(TransferError::BalanceNotFound(cmd.to_wallet()))?;
        let treasury = TransferRepository::balance_snapshot(&mut tx, self.treasury)
            .await?
            .ok_or(TransferError::BalanceNotFound(self.treasury))?;

        if from.balance < credit {
            return Err(TransferError::InsufficientFunds);
        }

        let transfer = match TransferRepository::insert_idempotent(&mut tx, cmd, fee).await? {
            InsertOutcome::Created(t) => t,
            InsertOutcome::AlreadyExists(existing) => {
                // Exact replay: nothing was mutated in this attempt.
                tx.rollback().await?;
                tracing::info!(
                    transfer_id = %existing.transfer_id,
                    idempotency_key = cmd.idempotency_key(),
                    "Idempotent replay, returning stored transfer"
                );
                return Ok(TransferReceipt::from(existing));
            }
            InsertOutcome::Conflict => return Err(TransferError::IdempotencyConflict),
        };

        if !TransferRepository::debit_guarded(&mut tx, cmd.from_wallet(), credit, from.version)
            .await?
        {
            return Err(TransferError::ConcurrentModification);
        }

        if !TransferRepository::credit_guarded(&mut tx, cmd.to_wallet(), cmd.amount(), to.version)
            .await?
        {
            return Err(TransferError::ConcurrentModification);
        }

        if fee > Decimal::ZERO
            && !TransferRepository::credit_guarded(&mut tx, self.treasury, fee, treasury.version)
                .await?
        {
            return Err(TransferError::ConcurrentModification);
        }

        TransferRepository::insert_entries(&mut tx, &transfer, self.treasury).await?;

        tx.commit().await?;

        tracing::info!(
            transfer_id = %transfer.transfer_id,
            from_wallet = %transfer.from_wallet,
            to_wallet = %transfer.to_wallet,
            amount = %transfer.amount,
            fee = %transfer.fee,
            "Transfer committed"
        );
        Ok(TransferReceipt::from(transfer))
    }
}

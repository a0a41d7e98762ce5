//! Row operations for transfers and ledger legs
//!
//! Balance writes use compare-and-swap: `UPDATE ... WHERE version = $n`,
//! checked through `rows_affected`. For a given observed version at most one
//! such update can succeed; losers see zero rows and must abort their unit
//! of work.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::error::TransferError;
use super::models::{Flow, LedgerEntry, Transfer, TransferId};
use super::types::TransferCommand;
use crate::wallet::models::{BalanceSnapshot, WalletId};

/// Outcome of attempting to insert a Transfer under the
/// `(from_wallet, idempotency_key)` uniqueness constraint.
#[derive(Debug)]
pub enum InsertOutcome {
    /// No prior row; this attempt created the Transfer.
    Created(Transfer),
    /// A Transfer with this key and an identical payload already exists.
    AlreadyExists(Transfer),
    /// The key exists with a different payload.
    Conflict,
}

pub struct TransferRepository;

impl TransferRepository {
    /// Snapshot read of a balance row. No lock is taken; the observed
    /// version gates the later conditional write.
    pub async fn balance_snapshot(
        conn: &mut PgConnection,
        wallet_id: WalletId,
    ) -> Result<Option<BalanceSnapshot>, TransferError> {
        let row = sqlx::query_as(
            r#"SELECT balance, version FROM wallet_balances_tb WHERE wallet_id = $1"#,
        )
        .bind(wallet_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    /// Insert the Transfer for this attempt, resolving a uniqueness hit by
    /// re-reading the existing row and comparing payloads field by field.
    ///
    /// The store's constraint is authoritative: when two identical requests
    /// race, exactly one insert wins and the loser resolves to
    /// `AlreadyExists` with the winner's row. Nothing is ever overwritten.
    pub async fn insert_idempotent(
        conn: &mut PgConnection,
        cmd: &TransferCommand,
        fee: Decimal,
    ) -> Result<InsertOutcome, TransferError> {
        let inserted: Option<Transfer> = sqlx::query_as(
            r#"INSERT INTO transfers_tb
                   (transfer_id, from_wallet, to_wallet, amount, fee, idempotency_key)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (from_wallet, idempotency_key) DO NOTHING
               RETURNING transfer_id, from_wallet, to_wallet, amount, fee,
                         idempotency_key, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(cmd.from_wallet())
        .bind(cmd.to_wallet())
        .bind(cmd.amount())
        .bind(fee)
        .bind(cmd.idempotency_key())
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(transfer) = inserted {
            return Ok(InsertOutcome::Created(transfer));
        }

        let existing =
            Self::get_by_idempotency_key(conn, cmd.from_wallet(), cmd.idempotency_key()).await?;

        match existing {
            Some(t)
                if t.to_wallet == cmd.to_wallet() && t.amount == cmd.amount() && t.fee == fee =>
            {
                Ok(InsertOutcome::AlreadyExists(t))
            }
            Some(_) => Ok(InsertOutcome::Conflict),
            // The conflicting writer rolled back between our insert and the
            // re-read; retryable.
            None => Err(TransferError::ConcurrentModification),
        }
    }

    /// Version-gated debit. The funds guard is re-checked in the same
    /// statement so a balance lowered since the snapshot cannot go negative.
    ///
    /// Returns false when zero rows matched.
    pub async fn debit_guarded(
        conn: &mut PgConnection,
        wallet_id: WalletId,
        amount: Decimal,
        expected_version: i64,
    ) -> Result<bool, TransferError> {
        let result = sqlx::query(
            r#"UPDATE wallet_balances_tb
               SET balance = balance - $1, version = version + 1, updated_at = NOW()
               WHERE wallet_id = $2 AND version = $3 AND balance >= $1"#,
        )
        .bind(amount)
        .bind(wallet_id)
        .bind(expected_version)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Version-gated credit. Returns false when zero rows matched.
    pub async fn credit_guarded(
        conn: &mut PgConnection,
        wallet_id: WalletId,
        amount: Decimal,
        expected_version: i64,
    ) -> Result<bool, TransferError> {
        let result = sqlx::query(
            r#"UPDATE wallet_balances_tb
               SET balance = balance + $1, version = version + 1, updated_at = NOW()
               WHERE wallet_id = $2 AND version = $3"#,
        )
        .bind(amount)
        .bind(wallet_id)
        .bind(expected_version)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Append the ledger legs for a transfer: sender's credit leg for
    /// `amount + fee`, receiver's debit leg for `amount`, fee leg on the
    /// treasury when `fee > 0`.
    pub async fn insert_entries(
        conn: &mut PgConnection,
        transfer: &Transfer,
        treasury: WalletId,
    ) -> Result<(), TransferError> {
        Self::insert_entry(
            conn,
            transfer.from_wallet,
            transfer.transfer_id,
            Flow::Credit,
            transfer.amount + transfer.fee,
        )
        .await?;

        Self::insert_entry(
            conn,
            transfer.to_wallet,
            transfer.transfer_id,
            Flow::Debit,
            transfer.amount,
        )
        .await?;

        if transfer.fee > Decimal::ZERO {
            Self::insert_entry(conn, treasury, transfer.transfer_id, Flow::Fee, transfer.fee)
                .await?;
        }

        Ok(())
    }

    async fn insert_entry(
        conn: &mut PgConnection,
        wallet_id: WalletId,
        transfer_id: TransferId,
        flow: Flow,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        sqlx::query(
            r#"INSERT INTO ledger_entries_tb (wallet_id, transfer_id, flow, amount)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(wallet_id)
        .bind(transfer_id)
        .bind(flow.id())
        .bind(amount)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Get a transfer by id
    pub async fn get(
        pool: &PgPool,
        transfer_id: TransferId,
    ) -> Result<Option<Transfer>, TransferError> {
        let row = sqlx::query_as(
            r#"SELECT transfer_id, from_wallet, to_wallet, amount, fee,
                      idempotency_key, created_at
               FROM transfers_tb WHERE transfer_id = $1"#,
        )
        .bind(transfer_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Get a transfer by its sender-scoped idempotency key
    pub async fn get_by_idempotency_key(
        conn: &mut PgConnection,
        from_wallet: WalletId,
        idempotency_key: &str,
    ) -> Result<Option<Transfer>, TransferError> {
        let row = sqlx::query_as(
            r#"SELECT transfer_id, from_wallet, to_wallet, amount, fee,
                      idempotency_key, created_at
               FROM transfers_tb
               WHERE from_wallet = $1 AND idempotency_key = $2"#,
        )
        .bind(from_wallet)
        .bind(idempotency_key)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    /// Ledger legs of a transfer, in insertion order
    pub async fn entries_for(
        pool: &PgPool,
        transfer_id: TransferId,
    ) -> Result<Vec<LedgerEntry>, TransferError> {
        let rows = sqlx::query_as(
            r#"SELECT entry_id, wallet_id, transfer_id, flow, amount, created_at
               FROM ledger_entries_tb
               WHERE transfer_id = $1
               ORDER BY entry_id"#,
        )
        .bind(transfer_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

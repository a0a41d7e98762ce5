//! Ledger relations and startup DDL
//!
//! The store enforces the invariants the engine relies on:
//! - at most one treasury wallet (partial unique index)
//! - one Transfer per `(from_wallet, idempotency_key)`
//! - non-negative balances, positive transfer amounts (CHECK)
//! - protect-on-delete: a wallet referenced by a balance, transfer, or
//!   ledger entry cannot be removed (ON DELETE RESTRICT)

use anyhow::Result;
use sqlx::PgPool;

const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets_tb (
    wallet_id   UUID PRIMARY KEY,
    owner_id    BIGINT NOT NULL,
    is_treasury BOOLEAN NOT NULL DEFAULT FALSE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TREASURY_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS uq_wallets_treasury
    ON wallets_tb (is_treasury) WHERE is_treasury
"#;

const CREATE_WALLET_BALANCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallet_balances_tb (
    wallet_id  UUID PRIMARY KEY REFERENCES wallets_tb (wallet_id) ON DELETE RESTRICT,
    balance    NUMERIC(12, 2) NOT NULL DEFAULT 0.00 CHECK (balance >= 0),
    version    BIGINT NOT NULL DEFAULT 0 CHECK (version >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TRANSFERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transfers_tb (
    transfer_id     UUID PRIMARY KEY,
    from_wallet     UUID NOT NULL REFERENCES wallets_tb (wallet_id) ON DELETE RESTRICT,
    to_wallet       UUID NOT NULL REFERENCES wallets_tb (wallet_id) ON DELETE RESTRICT,
    amount          NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    fee             NUMERIC(12, 2) NOT NULL CHECK (fee >= 0),
    idempotency_key VARCHAR(255) NOT NULL CHECK (idempotency_key <> ''),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_transfers_sender_key UNIQUE (from_wallet, idempotency_key),
    CONSTRAINT ck_transfers_distinct_wallets CHECK (from_wallet <> to_wallet)
)
"#;

const CREATE_LEDGER_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries_tb (
    entry_id    BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    wallet_id   UUID NOT NULL REFERENCES wallets_tb (wallet_id) ON DELETE RESTRICT,
    transfer_id UUID NOT NULL REFERENCES transfers_tb (transfer_id) ON DELETE RESTRICT,
    flow        SMALLINT NOT NULL CHECK (flow IN (1, 2, 3)),
    amount      NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_ENTRIES_TRANSFER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS ix_ledger_entries_transfer
    ON ledger_entries_tb (transfer_id)
"#;

/// Initialize the ledger schema. Safe to call repeatedly.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing ledger schema...");

    let statements = [
        ("wallets table", CREATE_WALLETS_TABLE),
        ("treasury index", CREATE_TREASURY_INDEX),
        ("wallet_balances table", CREATE_WALLET_BALANCES_TABLE),
        ("transfers table", CREATE_TRANSFERS_TABLE),
        ("ledger_entries table", CREATE_LEDGER_ENTRIES_TABLE),
        ("ledger_entries index", CREATE_LEDGER_ENTRIES_TRANSFER_INDEX),
    ];

    for (name, ddl) in statements {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", name, e))?;
    }

    tracing::info!("Ledger schema initialized successfully");
    Ok(())
}

//! API key usage ledger - authorization with concurrency-safe counting.
//!
//! This service handles:
//! - API key lookup
//! - Row-locked usage increments
//! - Storage failure classification
//!
//! # Atomicity Guarantees
//!
//! The read-increment-write cycle runs inside one PostgreSQL transaction
//! holding a `FOR UPDATE` lock on the matching row only. Concurrent requests
//! for the same key are serialized; different keys never wait on each other.
//! N concurrent authorizations of one key raise its count by exactly N.

use async_trait::async_trait;
use chrono::Utc;

use crate::{db::DbPool, models::api_key_usage::ApiKeyUsage};

/// Result of an authorization attempt.
///
/// Storage failures are folded into `Unavailable`; callers never see the
/// underlying error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// Key exists; carries the row after its usage was recorded
    Authorized(ApiKeyUsage),
    /// No row matches the key; nothing was written
    Unauthorized,
    /// Storage failed; the transaction was rolled back
    Unavailable,
}

/// Authorizes API keys and records their usage.
///
/// Implementations never retry; a failure is reported once as `Unavailable`.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    async fn authorize(&self, api_key: &str) -> AuthorizationOutcome;
}

/// PostgreSQL-backed ledger over the `api_key_usages` table.
#[derive(Debug, Clone)]
pub struct PgUsageLedger {
    pool: DbPool,
}

impl PgUsageLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Lock, increment and commit.
    ///
    /// # Process
    ///
    /// 1. Start database transaction
    /// 2. Lock the row matching `api_key`
    /// 3. Bump `usage_count`, stamp `last_request_at`
    /// 4. Commit
    ///
    /// Returns `Ok(None)` if the key is unknown. Any early return drops the
    /// transaction, which rolls it back and releases the connection.
    async fn record_usage(&self, api_key: &str) -> Result<Option<ApiKeyUsage>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE blocks other authorizations of this key until commit
        let Some(usage) = sqlx::query_as::<_, ApiKeyUsage>(
            "SELECT id, company_name, api_key, usage_count, last_request_at
             FROM api_key_usages
             WHERE api_key = $1
             FOR UPDATE",
        )
        .bind(api_key)
        .fetch_optional(&mut *tx)
        .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, ApiKeyUsage>(
            r#"
            UPDATE api_key_usages
            SET usage_count = usage_count + 1,
                last_request_at = $2
            WHERE id = $1
            RETURNING id, company_name, api_key, usage_count, last_request_at
            "#,
        )
        .bind(usage.id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }
}

#[async_trait]
impl UsageLedger for PgUsageLedger {
    async fn authorize(&self, api_key: &str) -> AuthorizationOutcome {
        match self.record_usage(api_key).await {
            Ok(Some(usage)) => {
                tracing::info!(
                    company = %usage.company_name,
                    usage_count = usage.usage_count,
                    "API key used"
                );
                AuthorizationOutcome::Authorized(usage)
            }
            Ok(None) => {
                tracing::warn!("No API key usage record matches the presented key");
                AuthorizationOutcome::Unauthorized
            }
            Err(err) if is_transient(&err) => {
                tracing::error!(error = %err, "Usage ledger storage unavailable");
                AuthorizationOutcome::Unavailable
            }
            Err(err) => {
                tracing::error!(error = %err, unexpected = true, "Usage ledger failed unexpectedly");
                AuthorizationOutcome::Unavailable
            }
        }
    }
}

/// Whether `err` comes from connectivity rather than from the query itself.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

//! API key usage ledger model.
//!
//! Each registered client has one row. Rows are seeded out of band and only
//! ever mutated by the usage ledger.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents an API key usage record from the database.
///
/// # Database Table
///
/// Maps to the `api_key_usages` table with columns:
/// - `id`: Unique identifier (UUID, generated by the database)
/// - `company_name`: Client this key was issued to
/// - `api_key`: The key itself, unique
/// - `usage_count`: Number of authorized requests
/// - `last_request_at`: Time of the most recent authorized request
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct ApiKeyUsage {
    pub id: Uuid,

    /// Human-readable name of the client using this key
    pub company_name: String,

    /// Never serialized back to clients
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Never decreases
    pub usage_count: i64,

    /// `None` until the key is first used
    pub last_request_at: Option<DateTime<Utc>>,
}

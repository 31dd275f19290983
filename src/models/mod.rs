//! Data models.
//!
//! Database entities, the parsed national ID, and the wire envelope.

/// API key usage ledger row
pub mod api_key_usage;
/// Response envelope and request body
pub mod envelope;
/// Parsed national ID
pub mod national_id;

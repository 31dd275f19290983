//! National ID Service
//!
//! A REST API that validates Egyptian National ID numbers for registered
//! clients. Every authorized request is counted in a per-key usage ledger.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries, row-level locking)
//! - **Authentication**: `X-API-Key` header checked against the usage ledger
//! - **Rate Limiting**: governor, keyed by client IP
//! - **Format**: JSON `{data, message, code}` envelopes

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

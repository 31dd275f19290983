//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (headers, JSON body)
//! 2. Delegates to a service
//! 3. Returns an HTTP response (JSON envelope, status code)

/// Service monitoring
pub mod health;
/// National ID validation
pub mod national_id;

//! HTTP middleware components.
//!
//! Middleware run before route handlers and may short-circuit a request.

/// Per-client request quotas
pub mod rate_limit;

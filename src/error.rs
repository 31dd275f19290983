//! Error types and HTTP error response handling.
//!
//! This module defines all request-level errors and how they are converted
//! into HTTP responses carrying the standard response envelope.
//!
//! A fake national ID is not an error: it is a normal 200 response with
//! `is_valid = false`, see [`crate::services::gateway`].

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::envelope::{Envelope, ResponseCode};

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and envelope code.
/// None of them carries storage details; those are logged where they occur.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// API key is missing or not registered.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Unauthorized Access. Thanks for using TRU National ID Service")]
    Unauthorized,

    /// Storage could not be reached or failed mid-request.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Service temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    /// Client exceeded its request quota.
    ///
    /// Returns HTTP 429 Too Many Requests.
    #[error("Too many requests. Please wait and try again.")]
    TooManyRequests,

    /// Request body could not be parsed into a national ID.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Validation failed: {0}")]
    Parsing(String),

    /// Anything that should not have happened.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Something went wrong! Thanks for using TRU National ID Service")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Parsing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ResponseCode {
        match self {
            AppError::Unauthorized => ResponseCode::Unauthorized,
            AppError::ServiceUnavailable => ResponseCode::ServiceUnavailable,
            AppError::TooManyRequests => ResponseCode::TooManyRequest,
            AppError::Parsing(_) => ResponseCode::ParsingError,
            AppError::Internal => ResponseCode::SomethingWentWrong,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "data": null,
///   "message": "Human-readable error message",
///   "code": "UNAUTHORIZED"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Unauthorized` → 401 Unauthorized
/// - `TooManyRequests` → 429 Too Many Requests
/// - `Parsing` → 422 Unprocessable Entity
/// - `ServiceUnavailable` → 503 Service Unavailable
/// - `Internal` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(Envelope::<()>::failure(self.to_string(), self.code()));
        (self.status(), body).into_response()
    }
}

/// Response for a request whose handler panicked.
///
/// Installed through `CatchPanicLayer`; the panic payload is logged and never
/// returned to the client.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "Unhandled panic while serving request");

    AppError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_codes() {
        let cases = [
            (AppError::Unauthorized, 401, ResponseCode::Unauthorized),
            (AppError::ServiceUnavailable, 503, ResponseCode::ServiceUnavailable),
            (AppError::TooManyRequests, 429, ResponseCode::TooManyRequest),
            (AppError::Parsing("bad".into()), 422, ResponseCode::ParsingError),
            (AppError::Internal, 500, ResponseCode::SomethingWentWrong),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status().as_u16(), status);
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn panic_is_rendered_as_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

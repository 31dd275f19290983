//! National ID validation endpoint.
//!
//! - POST /validate-id - Authorize the caller and validate one national ID

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};

use crate::{
    error::AppError,
    models::{
        envelope::{Envelope, ValidateIdRequest},
        national_id::NationalIdRecord,
    },
    state::AppState,
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Validate an Egyptian national ID.
///
/// # Headers
///
/// ```text
/// X-API-Key: <key>
/// ```
///
/// # Request Body
///
/// ```json
/// { "national_id": 29905228800910 }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "data": {
///     "national_id": "29905228800910",
///     "is_valid": true,
///     "invalid_reasons": [],
///     "fake_id_reason": "",
///     "year_of_birth": 1999,
///     "month_of_birth": 5,
///     "month_of_birth_name": "May",
///     "day_of_birth": 22,
///     "governorate_id": 88,
///     "governorate_name": "Outside the republic",
///     "gender": "Male",
///     ...
///   },
///   "message": "Valid ID. Thanks for using TRU National ID Service",
///   "code": "VALID_ID"
/// }
/// ```
///
/// A fake ID also returns 200, with `"code": "INVALID_ID"`.
///
/// # Errors
///
/// - 422 `PARSING_ERROR`: body is not `{ "national_id": <14-digit integer> }`
/// - 401 `UNAUTHORIZED`: missing or unknown API key
/// - 503 `SERVICE_UNAVAILABLE`: usage ledger unreachable
pub async fn validate_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ValidateIdRequest>, JsonRejection>,
) -> Result<Json<Envelope<NationalIdRecord>>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        AppError::Parsing(rejection.body_text())
    })?;
    let national_id = request.national_id()?;

    let api_key = headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok());

    let envelope = state.gateway.handle(api_key, &national_id).await?;

    Ok(Json(envelope))
}

//! Response envelope and request body for the validation endpoint.
//!
//! Every response, success or failure, has the same shape:
//!
//! ```json
//! {
//!   "data": { ... } | null,
//!   "message": "Human-readable message",
//!   "code": "VALID_ID"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name used in client-facing messages.
pub const SERVICE_NAME: &str = "TRU National ID Service";

/// Smallest and largest accepted 14-digit national ID.
pub const MIN_NATIONAL_ID: u64 = 10_000_000_000_000;
pub const MAX_NATIONAL_ID: u64 = 99_999_999_999_999;

/// Machine-readable outcome code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    ValidId,
    InvalidId,
    Unauthorized,
    TooManyRequest,
    ParsingError,
    ServiceUnavailable,
    SomethingWentWrong,
}

/// Uniform `{data, message, code}` response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: String,
    pub code: ResponseCode,
}

impl<T> Envelope<T> {
    pub fn success(data: T, message: impl Into<String>, code: ResponseCode) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            code,
        }
    }

    pub fn failure(message: impl Into<String>, code: ResponseCode) -> Self {
        Self {
            data: None,
            message: message.into(),
            code,
        }
    }
}

/// Request body for `POST /validate-id`.
///
/// # JSON Example
///
/// ```json
/// { "national_id": 29905228800910 }
/// ```
///
/// A numeric string (`"29905228800910"`) is accepted as well.
#[derive(Debug, Deserialize)]
pub struct ValidateIdRequest {
    pub national_id: NationalIdInput,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NationalIdInput {
    Number(u64),
    Text(String),
}

impl ValidateIdRequest {
    /// The national ID as a 14-digit decimal string.
    ///
    /// # Errors
    ///
    /// - `Parsing`: not an integer, or outside the 14-digit range
    pub fn national_id(&self) -> Result<String, AppError> {
        let value = match &self.national_id {
            NationalIdInput::Number(n) => *n,
            NationalIdInput::Text(s) => s.trim().parse::<u64>().map_err(|_| {
                AppError::Parsing(format!("national_id must be an integer, got {s:?}"))
            })?,
        };

        if !(MIN_NATIONAL_ID..=MAX_NATIONAL_ID).contains(&value) {
            return Err(AppError::Parsing(format!(
                "national_id must be between {MIN_NATIONAL_ID} and {MAX_NATIONAL_ID}, got {value}"
            )));
        }

        Ok(value.to_string())
    }
}

//! Request gateway - authorizes the caller, then validates the ID.
//!
//! # Flow
//!
//! 1. Reject a missing API key without touching the ledger
//! 2. Record usage through the [`UsageLedger`]
//! 3. Validate the national ID
//! 4. Wrap the record in a `VALID_ID` or `INVALID_ID` envelope
//!
//! A fake ID is a successful response: both envelopes are sent with HTTP 200.

use std::sync::Arc;

use crate::{
    error::AppError,
    models::{
        envelope::{Envelope, ResponseCode, SERVICE_NAME},
        national_id::NationalIdRecord,
    },
    services::{
        id_validator,
        usage_ledger::{AuthorizationOutcome, UsageLedger},
    },
};

#[derive(Clone)]
pub struct RequestGateway {
    ledger: Arc<dyn UsageLedger>,
}

impl RequestGateway {
    pub fn new(ledger: Arc<dyn UsageLedger>) -> Self {
        Self { ledger }
    }

    /// Authorize `api_key` and validate `national_id`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`: key missing, empty, or unknown (the ID is not parsed)
    /// - `ServiceUnavailable`: the ledger could not reach storage
    pub async fn handle(
        &self,
        api_key: Option<&str>,
        national_id: &str,
    ) -> Result<Envelope<NationalIdRecord>, AppError> {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let usage = match self.ledger.authorize(api_key).await {
            AuthorizationOutcome::Authorized(usage) => usage,
            AuthorizationOutcome::Unauthorized => return Err(AppError::Unauthorized),
            AuthorizationOutcome::Unavailable => return Err(AppError::ServiceUnavailable),
        };

        let record = id_validator::validate(national_id);
        tracing::info!(
            company = %usage.company_name,
            valid = record.is_valid,
            reasons = %record.fake_id_reason,
            "National ID validation completed"
        );

        Ok(envelope_for(record))
    }
}

fn envelope_for(record: NationalIdRecord) -> Envelope<NationalIdRecord> {
    if record.is_valid {
        Envelope::success(
            record,
            format!("Valid ID. Thanks for using {SERVICE_NAME}"),
            ResponseCode::ValidId,
        )
    } else {
        Envelope::success(
            record,
            format!("Fake ID. Thanks for using {SERVICE_NAME}"),
            ResponseCode::InvalidId,
        )
    }
}

//! In-process usage ledger for tests and local runs without PostgreSQL.
//!
//! Each key lives in its own map entry; `DashMap` locks the entry's shard for
//! the increment, so the same-key serialization of the database ledger holds.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    models::api_key_usage::ApiKeyUsage,
    services::usage_ledger::{AuthorizationOutcome, UsageLedger},
};

#[derive(Debug, Default)]
pub struct MemoryUsageLedger {
    rows: DashMap<String, ApiKeyUsage>,
    unavailable: AtomicBool,
}

impl MemoryUsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `api_key` with a zero count. Existing keys are left untouched.
    pub fn seed(&self, company_name: &str, api_key: &str) {
        self.rows
            .entry(api_key.to_owned())
            .or_insert_with(|| ApiKeyUsage {
                id: Uuid::new_v4(),
                company_name: company_name.to_owned(),
                api_key: api_key.to_owned(),
                usage_count: 0,
                last_request_at: None,
            });
    }

    /// Simulate a storage outage: every authorization returns `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn usage(&self, api_key: &str) -> Option<ApiKeyUsage> {
        self.rows.get(api_key).map(|row| row.value().clone())
    }
}

#[async_trait]
impl UsageLedger for MemoryUsageLedger {
    async fn authorize(&self, api_key: &str) -> AuthorizationOutcome {
        if self.unavailable.load(Ordering::SeqCst) {
            tracing::error!("Usage ledger storage unavailable");
            return AuthorizationOutcome::Unavailable;
        }

        match self.rows.get_mut(api_key) {
            Some(mut row) => {
                row.usage_count += 1;
                row.last_request_at = Some(Utc::now());
                tracing::info!(
                    company = %row.company_name,
                    usage_count = row.usage_count,
                    "API key used"
                );
                AuthorizationOutcome::Authorized(row.value().clone())
            }
            None => {
                tracing::warn!("No API key usage record matches the presented key");
                AuthorizationOutcome::Unauthorized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const API_KEY: &str = "test";

    fn seeded() -> Arc<MemoryUsageLedger> {
        let ledger = Arc::new(MemoryUsageLedger::new());
        ledger.seed("Test Company", API_KEY);
        ledger
    }

    #[tokio::test]
    async fn known_key_is_authorized_and_counted() {
        let ledger = seeded();

        let outcome = ledger.authorize(API_KEY).await;

        let usage = match outcome {
            AuthorizationOutcome::Authorized(usage) => usage,
            other => panic!("expected authorization, got {other:?}"),
        };
        assert_eq!(usage.company_name, "Test Company");
        assert_eq!(usage.usage_count, 1);
        assert!(usage.last_request_at.is_some());
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_without_writes() {
        let ledger = seeded();

        let (a, b) = tokio::join!(ledger.authorize("gg"), ledger.authorize("gg"));

        assert_eq!(a, AuthorizationOutcome::Unauthorized);
        assert_eq!(b, AuthorizationOutcome::Unauthorized);
        assert!(ledger.usage("gg").is_none());
        assert_eq!(ledger.usage(API_KEY).unwrap().usage_count, 0);
    }

    #[tokio::test]
    async fn concurrent_authorizations_are_all_counted() {
        let ledger = seeded();
        let n = 64;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.authorize(API_KEY).await })
            })
            .collect();
        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                AuthorizationOutcome::Authorized(_)
            ));
        }

        assert_eq!(ledger.usage(API_KEY).unwrap().usage_count, n);
    }

    #[tokio::test]
    async fn outage_returns_unavailable_and_writes_nothing() {
        let ledger = seeded();
        ledger.set_unavailable(true);

        assert_eq!(ledger.authorize(API_KEY).await, AuthorizationOutcome::Unavailable);

        let usage = ledger.usage(API_KEY).unwrap();
        assert_eq!(usage.usage_count, 0);
        assert_eq!(usage.last_request_at, None);
    }

    #[test]
    fn seeding_twice_keeps_the_first_row() {
        let ledger = seeded();
        ledger.seed("Other Company", API_KEY);

        assert_eq!(ledger.usage(API_KEY).unwrap().company_name, "Test Company");
    }
}

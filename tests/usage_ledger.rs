//! Usage ledger against a live PostgreSQL.
//!
//! Run with `DATABASE_URL` pointing at a server where the user may create
//! databases, then `cargo test -- --ignored`. Each test gets a fresh
//! database with migrations applied.

use std::sync::Arc;

use national_id_service::services::usage_ledger::{
    AuthorizationOutcome, PgUsageLedger, UsageLedger,
};
use sqlx::PgPool;

const API_KEY: &str = "test";

async fn seed(pool: &PgPool) {
    sqlx::query("INSERT INTO api_key_usages (company_name, api_key) VALUES ($1, $2)")
        .bind("Test Company")
        .bind(API_KEY)
        .execute(pool)
        .await
        .unwrap();
}

async fn usage_count(pool: &PgPool, api_key: &str) -> Option<i64> {
    sqlx::query_scalar("SELECT usage_count FROM api_key_usages WHERE api_key = $1")
        .bind(api_key)
        .fetch_optional(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn known_key_is_counted_and_stamped(pool: PgPool) {
    seed(&pool).await;
    let ledger = PgUsageLedger::new(pool.clone());

    let outcome = ledger.authorize(API_KEY).await;

    let usage = match outcome {
        AuthorizationOutcome::Authorized(usage) => usage,
        other => panic!("expected authorization, got {other:?}"),
    };
    assert_eq!(usage.company_name, "Test Company");
    assert_eq!(usage.usage_count, 1);
    assert!(usage.last_request_at.is_some());
    assert_eq!(usage_count(&pool, API_KEY).await, Some(1));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn unknown_key_touches_nothing(pool: PgPool) {
    seed(&pool).await;
    let ledger = PgUsageLedger::new(pool.clone());

    let (a, b) = tokio::join!(ledger.authorize("gg"), ledger.authorize("gg"));

    assert_eq!(a, AuthorizationOutcome::Unauthorized);
    assert_eq!(b, AuthorizationOutcome::Unauthorized);
    assert_eq!(usage_count(&pool, API_KEY).await, Some(0));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn concurrent_authorizations_lose_no_updates(pool: PgPool) {
    seed(&pool).await;
    let ledger = Arc::new(PgUsageLedger::new(pool.clone()));
    let n: i64 = 25;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.authorize(API_KEY).await })
        })
        .collect();

    let mut latest = None;
    for handle in handles {
        let AuthorizationOutcome::Authorized(usage) = handle.await.unwrap() else {
            panic!("every authorization should succeed");
        };
        latest = latest.max(usage.last_request_at);
    }

    assert_eq!(usage_count(&pool, API_KEY).await, Some(n));
    let stored: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_request_at FROM api_key_usages WHERE api_key = $1")
            .bind(API_KEY)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, latest);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn missing_table_is_unavailable_and_rolled_back(pool: PgPool) {
    seed(&pool).await;
    sqlx::query("ALTER TABLE api_key_usages RENAME TO api_key_usages_backup")
        .execute(&pool)
        .await
        .unwrap();
    let ledger = PgUsageLedger::new(pool.clone());

    assert_eq!(ledger.authorize(API_KEY).await, AuthorizationOutcome::Unavailable);

    sqlx::query("ALTER TABLE api_key_usages_backup RENAME TO api_key_usages")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(usage_count(&pool, API_KEY).await, Some(0));
}

//! Database connection pool and migration management.
//!
//! [`Database`] owns the PostgreSQL pool for the lifetime of the process:
//! it is built from an explicit [`DatabaseConfig`], checked at startup, and
//! closed on shutdown.

use std::time::Duration;

use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Connection settings for the storage manager.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// How long a request waits for a pooled connection before failing
    pub acquire_timeout: Duration,
}

/// Storage manager owning the connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Build the pool without connecting.
    ///
    /// Connections are opened on first use, so a database that is down at
    /// startup does not prevent the server from starting.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed.
    pub fn initialize(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)?;
        tracing::info!(max_connections = config.max_connections, "Database pool initialized");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn validate_connection(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        tracing::info!("Database connection validated");
        Ok(())
    }

    /// Run database migrations from the `migrations/` directory.
    ///
    /// Migrations are tracked in the `_sqlx_migrations` table, so each runs only once.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Register an API key with a zero usage count.
    ///
    /// Does nothing if the key already exists. Returns whether a row was inserted.
    pub async fn seed_api_key(&self, company_name: &str, api_key: &str) -> Result<bool, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO api_key_usages (company_name, api_key, usage_count, last_request_at)
            VALUES ($1, $2, 0, NULL)
            ON CONFLICT (api_key) DO NOTHING
            "#,
        )
        .bind(company_name)
        .bind(api_key)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    /// Close every connection. Pending acquisitions fail with `PoolClosed`.
    pub async fn dispose(&self) {
        self.pool.close().await;
        tracing::info!("Database pool disposed");
    }
}

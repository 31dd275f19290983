//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

use crate::db::DatabaseConfig;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `TEST_DATABASE_URL` (optional): database used by integration tests
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `DATABASE_ACQUIRE_TIMEOUT_SECS` (optional): defaults to 5
/// - `RATE_LIMIT_PER_SECOND` (optional): per-client quota, defaults to 5
/// - `RATE_LIMIT_PER_MINUTE` (optional): per-client quota, defaults to 100
/// - `SEED_API_KEY`, `SEED_COMPANY_NAME` (optional): key registered at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default)]
    pub test_database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub database_acquire_timeout_secs: u64,

    #[serde(default = "default_rate_limit_per_second")]
    pub rate_limit_per_second: u32,

    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    #[serde(default)]
    pub seed_api_key: Option<String>,

    #[serde(default)]
    pub seed_company_name: Option<String>,
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_rate_limit_per_second() -> u32 {
    5
}

fn default_rate_limit_per_minute() -> u32 {
    100
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// With `TEST_MODE=true` the optional dotenv file is `test.env`,
    /// otherwise `.env`. Variables already set in the environment win.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        let env_file = if std::env::var("TEST_MODE").as_deref() == Ok("true") {
            "test.env"
        } else {
            ".env"
        };
        dotenvy::from_filename(env_file).ok();

        envy::from_env::<Config>()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            acquire_timeout: Duration::from_secs(self.database_acquire_timeout_secs),
        }
    }

    /// The key to seed at startup, if both its parts are configured.
    pub fn seed(&self) -> Option<(&str, &str)> {
        self.seed_company_name
            .as_deref()
            .zip(self.seed_api_key.as_deref())
    }
}

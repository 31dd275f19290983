//! National ID Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Initialize the database pool and check connectivity
//! 3. Run database migrations and seed the configured API key
//! 4. Build HTTP router with routes and middleware
//! 5. Serve until Ctrl-C / SIGTERM, then dispose of the pool

use std::{net::SocketAddr, sync::Arc, time::Duration};

use national_id_service::{
    config::Config, db::Database, middleware::rate_limit::RateLimits, routes,
    services::usage_ledger::PgUsageLedger, state::AppState,
};
use tracing_subscriber::EnvFilter;

/// How often idle rate limiter entries are pruned.
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let database = Database::initialize(&config.database_config())?;

    // A database that is down at startup is not fatal: requests get 503 until it recovers
    match database.validate_connection().await {
        Ok(()) => {
            database.run_migrations().await?;
            tracing::info!("Database migrations complete");

            if let Some((company_name, api_key)) = config.seed() {
                if database.seed_api_key(company_name, api_key).await? {
                    tracing::info!(company = company_name, "Seeded API key");
                }
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to the database during startup");
        }
    }

    let ledger = Arc::new(PgUsageLedger::new(database.pool().clone()));
    let rate_limits = RateLimits::new(config.rate_limit_per_second, config.rate_limit_per_minute);
    let state = AppState::new(database.clone(), ledger, rate_limits);

    let limits = Arc::clone(&state.rate_limits);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limits.retain_recent();
        }
    });

    let app = routes::app_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Client addresses are needed to key the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    database.dispose().await;

    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

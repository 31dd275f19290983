use std::sync::Arc;

use crate::{
    db::Database, middleware::rate_limit::RateLimits, services::gateway::RequestGateway,
    services::usage_ledger::UsageLedger,
};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub gateway: RequestGateway,
    pub database: Database,
    pub rate_limits: Arc<RateLimits>,
}

impl AppState {
    pub fn new(database: Database, ledger: Arc<dyn UsageLedger>, rate_limits: RateLimits) -> Self {
        Self {
            gateway: RequestGateway::new(ledger),
            database,
            rate_limits: Arc::new(rate_limits),
        }
    }
}

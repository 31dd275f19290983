use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{error, handlers, middleware::rate_limit, state::AppState};

/// Build the HTTP router.
///
/// `/validate-id` sits behind the rate limiter; `/health` does not.
/// Panics in any handler become a 500 `SOMETHING_WENT_WRONG` envelope.
pub fn app_router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/validate-id", post(handlers::national_id::validate_id))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(limited)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::handle_panic)),
        )
        .with_state(state)
}

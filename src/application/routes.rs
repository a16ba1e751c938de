use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::application::handlers::{analytics_handler, health_check, trade_handler};
use crate::application::state::AppState;
use crate::auth::{require_auth, ApiKeys};
use crate::rate_limit::{create_rate_limiter, rate_limit_middleware};

/// Build the HTTP router.
///
/// Everything except `/health` sits behind API-key auth and the global
/// rate limiter.
pub fn create_router(state: AppState) -> Router {
    let api_keys = ApiKeys::new(state.config.api_keys.clone());
    let limiter = create_rate_limiter(state.config.rate_limit_per_minute);
    let max_body_bytes = state.config.max_body_bytes;

    let protected = Router::new()
        .route(
            "/analytics/recalculate",
            post(analytics_handler::recalculate_analytics),
        )
        .route(
            "/analytics/:user_id",
            get(analytics_handler::get_user_analytics),
        )
        .route("/leaderboard", get(analytics_handler::get_leaderboard))
        .route("/trades", post(trade_handler::create_trade))
        .route("/trades/:user_id", get(trade_handler::list_trades))
        .route(
            "/trades/:user_id/:trade_id",
            delete(trade_handler::delete_trade),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod handlers;
pub mod types;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::shared::AppState;

/// Operator-facing status endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/rounds", get(handlers::list_rounds))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

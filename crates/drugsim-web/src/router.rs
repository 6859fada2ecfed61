//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    api::{api_session, api_create, api_proceed, api_test},
    system::health,
    wizard::{wizard_page, create_submit, proceed_submit, test_submit},
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",        get(wizard_page))
        .route("/create",  post(create_submit))
        .route("/proceed", post(proceed_submit))
        .route("/test",    post(test_submit))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/session", get(api_session))
        .route("/api/drug",    post(api_create))
        .route("/api/proceed", post(api_proceed))
        .route("/api/test",    post(api_test))

        .route("/health", get(health))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

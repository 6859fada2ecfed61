//! Liveness and configuration summary.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "variant": state.config.simulation.variant,
        "sessions": state.sessions.len().await,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

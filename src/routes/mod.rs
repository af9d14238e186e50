//! Page and health route handlers

pub mod catalog;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check with cache statistics
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "booking_api": state.api.base_url(),
        "cache": state.cache.stats(),
    }))
}

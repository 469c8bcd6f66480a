use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    info!("GET /health - Health check");
    Json(json!({
        "status": "OK",
        "store": state.store_kind,
        "advice_enabled": state.advice.is_enabled(),
    }))
}

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{FinancialAdvice, LatestAdvice};
use crate::services::earnings_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(request_advice))
        .route("/latest", get(latest_advice))
}

/// POST /api/advice
/// Advice for the stored planner. AI failures are reported inside the
/// advice body, not as an HTTP error. The model call keeps running if the
/// client disconnects; poll `/latest` for its result.
pub async fn request_advice(
    State(state): State<AppState>,
) -> Result<Json<FinancialAdvice>, AppError> {
    info!("POST /api/advice");
    let settings = state.planner.load().await?;
    let summary = earnings_service::summarize_settings(&settings, state.today());
    let advice = state.advice.request_advice(settings, summary).await;
    Ok(Json(advice))
}

/// GET /api/advice/latest
pub async fn latest_advice(State(state): State<AppState>) -> Json<LatestAdvice> {
    info!("GET /api/advice/latest");
    Json(state.advice.latest().await)
}

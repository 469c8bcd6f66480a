use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{EarningsRequest, EarningsSummary};
use crate::services::{currency_service, earnings_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
}

/// POST /api/earnings/calculate
/// Stateless variant of the planner summary
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<EarningsRequest>,
) -> Result<Json<EarningsSummary>, AppError> {
    info!("POST /api/earnings/calculate - {} bills", request.bills.len());
    if let Some(code) = &request.currency {
        if !currency_service::is_supported(code) {
            return Err(AppError::Validation(format!("Unsupported currency: {}", code)));
        }
    }
    Ok(Json(earnings_service::summarize_request(&request, state.today())))
}

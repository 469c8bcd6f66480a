use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{PricingRequest, PricingResult};
use crate::services::{currency_service, pricing_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/defaults", get(defaults))
}

/// POST /api/pricing/calculate
pub async fn calculate(
    Json(request): Json<PricingRequest>,
) -> Result<Json<PricingResult>, AppError> {
    info!(
        "POST /api/pricing/calculate - {} x {}",
        request.total_items, request.product_name
    );
    if let Some(code) = &request.currency {
        if !currency_service::is_supported(code) {
            return Err(AppError::Validation(format!("Unsupported currency: {}", code)));
        }
    }
    Ok(Json(pricing_service::price(&request)))
}

/// GET /api/pricing/defaults
pub async fn defaults() -> Json<PricingRequest> {
    info!("GET /api/pricing/defaults");
    Json(PricingRequest::default())
}

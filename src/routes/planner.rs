use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Bill, CreateBill, EarningsSummary, PlannerSettings, UpdateBill, UpdateGoals};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_planner).put(replace_planner))
        .route("/reset", post(reset_planner))
        .route("/bills", post(add_bill))
        .route("/bills/:id", patch(update_bill).delete(remove_bill))
        .route("/goals", put(update_goals))
        .route("/summary", get(get_summary))
}

/// GET /api/planner
/// Stored planner, with defaults for anything never saved
pub async fn get_planner(
    State(state): State<AppState>,
) -> Result<Json<PlannerSettings>, AppError> {
    info!("GET /api/planner");
    let settings = state.planner.load().await.map_err(|e| {
        error!("Failed to load planner: {}", e);
        e
    })?;
    Ok(Json(settings))
}

/// PUT /api/planner
pub async fn replace_planner(
    State(state): State<AppState>,
    Json(data): Json<PlannerSettings>,
) -> Result<Json<PlannerSettings>, AppError> {
    info!("PUT /api/planner - {} bills", data.bills.len());
    let settings = state.planner.replace(data, state.today()).await?;
    Ok(Json(settings))
}

/// POST /api/planner/reset
pub async fn reset_planner(
    State(state): State<AppState>,
) -> Result<Json<PlannerSettings>, AppError> {
    info!("POST /api/planner/reset");
    let settings = state.planner.reset().await?;
    Ok(Json(settings))
}

/// POST /api/planner/bills
/// An empty body adds a blank bill; any other body must be a JSON bill
pub async fn add_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    info!("POST /api/planner/bills");
    let data = parse_new_bill(&headers, &body)?;
    let bill = state.planner.add_bill(data).await.map_err(|e| {
        error!("Failed to add bill: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(bill)))
}

/// PATCH /api/planner/bills/:id
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateBill>,
) -> Result<Json<Bill>, AppError> {
    info!("PATCH /api/planner/bills/{}", id);
    let bill = state.planner.update_bill(id, update).await?;
    Ok(Json(bill))
}

/// DELETE /api/planner/bills/:id
pub async fn remove_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/planner/bills/{}", id);
    state.planner.remove_bill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/planner/goals
pub async fn update_goals(
    State(state): State<AppState>,
    Json(update): Json<UpdateGoals>,
) -> Result<Json<PlannerSettings>, AppError> {
    info!("PUT /api/planner/goals");
    if update.is_empty() {
        return Err(AppError::Validation("No goal fields provided".to_string()));
    }
    let settings = state.planner.update_goals(update, state.today()).await?;
    Ok(Json(settings))
}

/// GET /api/planner/summary
/// Daily earnings needed this month for the stored planner
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<EarningsSummary>, AppError> {
    info!("GET /api/planner/summary");
    let summary = state.planner.summary(state.today()).await?;
    Ok(Json(summary))
}

fn parse_new_bill(headers: &HeaderMap, body: &[u8]) -> Result<CreateBill, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateBill::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(AppError::Validation("Expected an application/json body".to_string()));
    }

    serde_json::from_slice(body).map_err(|e| {
        error!("Rejected bill payload: {}", e);
        AppError::Validation(format!("Invalid bill payload: {}", e))
    })
}

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::Statement;
use crate::services::{earnings_service, statement_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_statement))
        .route("/text", get(get_statement_text))
        .route("/pdf", get(get_statement_pdf))
}

async fn current_statement(state: &AppState) -> Result<Statement, AppError> {
    let today = state.today();
    let settings = state.planner.load().await?;
    let summary = earnings_service::summarize_settings(&settings, today);
    Ok(statement_service::build_statement(&settings, &summary, today))
}

/// GET /api/statement
pub async fn get_statement(
    State(state): State<AppState>,
) -> Result<Json<Statement>, AppError> {
    info!("GET /api/statement");
    Ok(Json(current_statement(&state).await?))
}

/// GET /api/statement/text
/// Printable plain-text version
pub async fn get_statement_text(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("GET /api/statement/text");
    let statement = current_statement(&state).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        statement_service::render_text(&statement),
    ))
}

/// GET /api/statement/pdf
pub async fn get_statement_pdf(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("GET /api/statement/pdf");
    let statement = current_statement(&state).await?;
    let bytes = statement_service::render_pdf(&statement).map_err(|e| {
        error!("Failed to render statement PDF: {}", e);
        e
    })?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        statement_service::pdf_filename(statement.generated_on)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

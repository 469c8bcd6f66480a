use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::models::{Currency, CurrencyPreview};
use crate::services::currency_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_currencies))
        .route("/:code", get(get_currency))
}

/// GET /api/currencies
pub async fn list_currencies() -> Json<&'static [Currency]> {
    info!("GET /api/currencies");
    Json(currency_service::CURRENCIES)
}

/// GET /api/currencies/:code
/// Unknown codes are not an error; they report the fallback symbol.
pub async fn get_currency(Path(code): Path<String>) -> Json<CurrencyPreview> {
    info!("GET /api/currencies/{}", code);
    Json(currency_service::preview(&code))
}

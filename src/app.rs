use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{advice, currencies, earnings, health, planner, pricing, statement};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/currencies", currencies::router())
        .nest("/api/planner", planner::router())
        .nest("/api/earnings", earnings::router())
        .nest("/api/pricing", pricing::router())
        .nest("/api/advice", advice::router())
        .nest("/api/statement", statement::router())
        .layer(cors)
        .with_state(state)
}

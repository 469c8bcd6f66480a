use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};

use daily_earnings::app;
use daily_earnings::config::AppConfig;
use daily_earnings::logging::{self, LoggingConfig};
use daily_earnings::services::llm_service::{LlmConfig, LlmService};
use daily_earnings::state::AppState;
use daily_earnings::store::{MemorySettingsStore, PgSettingsStore, SettingsStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env()).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let config = AppConfig::from_env()?;

    let (store, store_kind): (Arc<dyn SettingsStore>, &'static str) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("🗄️  Planner settings stored in PostgreSQL");
            (Arc::new(PgSettingsStore::new(pool)), "postgres")
        }
        None => {
            warn!("DATABASE_URL not set; planner settings are kept in memory only");
            (Arc::new(MemorySettingsStore::new()), "memory")
        }
    };

    let llm = Arc::new(LlmService::new(LlmConfig::from_env()));
    let state = AppState::new(store, store_kind, llm);
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("🚀 Daily earnings backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

use api_rest::{AppState, ServerConfig};
use his_core::{CoreConfig, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the health information system
///
/// Resolves configuration, opens the database (creating it if needed), applies migrations and
/// serves the REST API.
///
/// # Environment Variables
/// - `DATABASE_URL`: SQLite database URL (default: "sqlite://health_info.db")
/// - `HIS_DB_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `HIS_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `HIS_CORS_ORIGINS`: Comma-separated origins allowed on `/api` (default: "http://localhost:3000")
///
/// # Errors
/// Returns an error if configuration is invalid, the database cannot be opened or migrated, or
/// the server fails to bind or run.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("his=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let core_cfg = CoreConfig::from_env()?;
    let server_cfg = ServerConfig::from_env()?;

    tracing::info!("++ Opening database {}", core_cfg.database_url());
    let store = Store::connect(&core_cfg).await?;
    store.migrate().await?;

    api_rest::serve(AppState::new(store), &server_cfg).await
}

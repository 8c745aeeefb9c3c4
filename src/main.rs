use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use vantage::api::{self, AppState, Pages};
use vantage::config::Config;
use vantage::storage::{SqliteStorage, Storage};
use vantage::tracking::GeoResolver;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Using SQLite storage: {}", config.database.url);
    let storage: Arc<dyn Storage> = Arc::new(
        SqliteStorage::new(&config.database.url, config.database.max_connections).await?,
    );
    storage.init().await?;
    info!("Database initialized successfully");

    // Geolocation resolver; without a token it serves the fallback location
    if config.geo.token.is_none() {
        info!("IPINFO_TOKEN not set - geolocation will use the fallback location");
    }
    let geo = Arc::new(GeoResolver::new(config.geo.clone()));

    // Page templates are loaded once; missing files abort startup
    let pages = Pages::load(&config.frontend.templates_dir)?;

    let state = Arc::new(AppState {
        storage,
        geo,
        pages,
    });
    let router = api::create_router(state, &config.frontend.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

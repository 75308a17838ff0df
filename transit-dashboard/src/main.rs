use std::error::Error;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use transit_dashboard::cache::{CacheConfig, CachedProvider};
use transit_dashboard::config::{DashboardConfig, ServerConfig};
use transit_dashboard::dashboard::Dashboard;
use transit_dashboard::persist::{FileStore, KeyValueStore, Lists, MemoryStore};
use transit_dashboard::provider::{MockProvider, TransitProvider};
use transit_dashboard::vvo::VvoClient;
use transit_dashboard::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn KeyValueStore> = match &config.store_path {
        Some(path) => {
            info!(path = %path.display(), "storing lists on disk");
            Arc::new(FileStore::new(path))
        }
        None => {
            info!("storing lists in memory");
            Arc::new(MemoryStore::new())
        }
    };
    let dashboard_config = DashboardConfig::default();
    let lists = Lists::new(store, dashboard_config.lists.clone());

    if config.mock {
        info!("serving demo data");
        let provider = MockProvider::demo(Utc::now());
        serve(&config, Dashboard::new(Arc::new(provider), lists, dashboard_config)).await
    } else {
        info!(base_url = %config.vvo.base_url, "using VVO API");
        let client = VvoClient::new(config.vvo.clone())?;
        let provider = CachedProvider::new(client, &CacheConfig::default());
        serve(&config, Dashboard::new(Arc::new(provider), lists, dashboard_config)).await
    }
}

async fn serve<P: TransitProvider + 'static>(
    config: &ServerConfig,
    dashboard: Dashboard<P>,
) -> Result<(), Box<dyn Error>> {
    let app = create_router(AppState::new(dashboard));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "transit dashboard listening");
    axum::serve(listener, app).await?;
    Ok(())
}

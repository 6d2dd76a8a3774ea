//! Shopkeep HTTP Server Binary
//!
//! Builds the store and data service, sets up the router and serves requests.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store (default)
//! cargo run --bin shopkeep-server
//!
//! # MongoDB
//! DB_HOST=localhost DB_DATABASE=shopkeep \
//!   cargo run --bin shopkeep-server --features mongo-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SHOPKEEP_CONFIG`: Path to a `repository.toml`; when unset the store is
//!   configured from `REPOSITORY_TYPE` and the `DB_*` variables
//! - `RUST_LOG`: Log filter (default: info)
//!
//! Variables may also come from a `.env` file in the working directory.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopkeep::db::{DataService, DocumentStore, RepositoryConfig, RepositoryFactory, ServiceConfig};
use shopkeep::http::{create_router, AppState};

async fn build_store() -> anyhow::Result<(Arc<dyn DocumentStore>, ServiceConfig)> {
    match env::var("SHOPKEEP_CONFIG") {
        Ok(path) => {
            info!("Loading repository configuration from {}", path);
            let config = RepositoryConfig::from_file(&path)?;
            let store = RepositoryFactory::from_repository_config(&config).await?;
            Ok((store, config.to_service_config()?))
        }
        Err(_) => {
            let store = RepositoryFactory::from_env().await?;
            let service_config = ServiceConfig::from_env()
                .map_err(|e| anyhow::anyhow!(e))
                .context("invalid service configuration")?;
            Ok((store, service_config))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Shopkeep HTTP Server");

    let (store, service_config) = build_store().await?;
    let service = DataService::new(store, service_config);
    service.log_configuration();

    let health = service.health().await;
    if health.ok {
        info!("Store is reachable");
    } else {
        tracing::warn!(
            "Store is not reachable yet: {}",
            health.detail.unwrap_or_default()
        );
    }

    let app = create_router(AppState::new(service));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod dashboard;
mod db;
mod equipment;
mod errors;
mod models;
mod routes;
mod snapshot;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::equipment::Catalog;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgGuildStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting guild dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Catalog is read once and shared read-only
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => {
            let catalog = Catalog::builtin();
            info!("Using built-in catalog ({} entries)", catalog.len());
            catalog
        }
    };

    if catalog.is_empty() {
        warn!("Catalog has no entries; every equipment slot will render blank");
    }

    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    let state = AppState {
        store: Arc::new(PgGuildStore::new(db)),
        catalog: Arc::new(catalog),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

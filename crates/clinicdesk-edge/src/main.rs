//! ClinicDesk Edge - caching and preloading in front of the dashboard API
//!
//! Serves dashboard data through bounded in-memory caches, warms likely
//! next routes while the service is idle, and picks media variants for the
//! caller's network conditions.

mod error;
mod server;
mod state;
mod types;
mod upstream;

use crate::error::Result;
use crate::server::start_server;
use crate::state::build_state;
use crate::types::EdgeConfig;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("clinicdesk_edge=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting ClinicDesk Edge...");

    let config = EdgeConfig::from_env();
    info!("Port: {}", config.port);
    info!("Upstream: {}", config.upstream_url);
    info!(
        "Data cache: {} entries, {}s TTL, {}",
        config.data_cache.max_size,
        config.data_cache.ttl.as_secs(),
        config.data_cache.strategy
    );
    info!(
        "Clinical cache: {} entries, {}s TTL, {}",
        config.clinical_cache.max_size,
        config.clinical_cache.ttl.as_secs(),
        config.clinical_cache.strategy
    );
    info!("Preload routes: {:?}", config.preload_routes);

    let state = build_state(&config)?;

    // Background drain of the preload queue
    let _worker = state.preloader.clone().spawn_worker();

    start_server(state, config.port).await?;

    Ok(())
}

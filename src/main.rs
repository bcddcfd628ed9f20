// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::pipeline::DashboardPipeline;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::snapshot_store::DashboardStore;
use crate::infrastructure::upstream_client::HttpTelemetrySource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let clock = config.label_clock()?;
    let addr = config.listen_addr()?;

    // Create upstream client (infrastructure layer)
    let upstream = Arc::new(HttpTelemetrySource::new(&config.upstream)?);

    // Create pipeline and sink (application layer)
    let pipeline = DashboardPipeline::new(upstream.clone(), config.gauge.max_watts, clock);
    let store = Arc::new(DashboardStore::new());

    if config.auth.shared_secret.is_none() {
        tracing::warn!("No shared secret configured, API routes are open and the snapshot route is disabled");
    }

    // Create application state
    let state = Arc::new(AppState {
        pipeline,
        store,
        upstream,
        shared_secret: config.auth.shared_secret.clone(),
    });

    // Build router (presentation layer)
    let mut router = build_router(state);

    if let Some(dir) = &config.server.static_dir {
        tracing::info!("Serving static assets from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router.layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(
        "Starting solar-dashboard on {}, upstream {}",
        addr,
        config.upstream.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

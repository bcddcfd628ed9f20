// Application state for HTTP handlers
use crate::application::pipeline::DashboardPipeline;
use crate::infrastructure::snapshot_store::DashboardStore;
use crate::infrastructure::upstream_client::HttpTelemetrySource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: DashboardPipeline,
    pub store: Arc<DashboardStore>,
    pub upstream: Arc<HttpTelemetrySource>,
    pub shared_secret: Option<String>,
}

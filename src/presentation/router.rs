// Route table for the dashboard API
use crate::presentation::app_state::AppState;
use crate::presentation::auth::require_shared_secret;
use crate::presentation::handlers::{
    dashboard_snapshot, health_check, proxy_upstream, refresh_dashboard, stream_dashboard,
};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;

/// `/healthz` plus the gated `/api` routes.
///
/// The stored snapshot is shared by every caller, so its route only exists
/// when a shared secret guards the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut api = Router::new()
        .route("/dashboard", get(refresh_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/upstream/:resource", get(proxy_upstream));

    if state.shared_secret.is_some() {
        api = api.route("/dashboard/snapshot", get(dashboard_snapshot));
    }

    let api = api.route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_shared_secret,
    ));

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api)
        .with_state(state)
}

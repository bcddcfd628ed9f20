// HTTP request handlers
use crate::application::telemetry_source::Credential;
use crate::domain::dashboard::CycleError;
use crate::domain::telemetry::Resource;
use crate::infrastructure::channel_sink::ChannelSink;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::json_mapper::{error_body_to_json, snapshot_to_json};
use crate::infrastructure::snapshot_store::DashboardStore;
use crate::presentation::app_state::AppState;
use axum::{
    Extension, Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Response, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Run one refresh cycle for this caller and return what it rendered.
/// A rejected credential gets the error alone, never panels from another cycle.
pub async fn refresh_dashboard(
    headers: HeaderMap,
    credential: Option<Extension<Credential>>,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let credential = credential.map(|Extension(c)| c);
    let rendered = DashboardStore::new();
    let report = state.pipeline.refresh(credential.as_ref(), &rendered).await;

    if let Some(error @ CycleError::Authentication) = &report.error {
        return (StatusCode::UNAUTHORIZED, Json(error_body_to_json(error))).into_response();
    }

    let snapshot = rendered.snapshot();
    state.store.publish(snapshot.clone());

    match json_response(&snapshot_to_json(snapshot), accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Last published snapshot, without contacting upstream. Only routed when a
/// shared secret guards the API.
pub async fn dashboard_snapshot(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = snapshot_to_json(state.store.snapshot());
    match json_response(&snapshot, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Stream each panel update as soon as its upstream fetch resolves
pub async fn stream_dashboard(
    credential: Option<Extension<Credential>>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let credential = credential.map(|Extension(c)| c);
    let (tx, rx) = mpsc::unbounded_channel();
    let pipeline = state.pipeline.clone();

    tokio::spawn(async move {
        let sink = ChannelSink::new(tx);
        pipeline.refresh(credential.as_ref(), &sink).await;
    });

    stream_from_receiver(rx)
}

/// Pass an upstream resource through unchanged
pub async fn proxy_upstream(
    Path(resource): Path<String>,
    credential: Option<Extension<Credential>>,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let Some(resource) = Resource::from_name(&resource) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown resource {}", resource) })),
        )
            .into_response();
    };

    let credential = credential.map(|Extension(c)| c);
    match state.upstream.forward(resource, credential.as_ref()).await {
        Ok(forwarded) => {
            let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = forwarded
                .content_type
                .unwrap_or_else(|| "application/json".to_string());
            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(forwarded.body))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(e) => {
            tracing::error!("Error proxying {}: {}", resource, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "failed to fetch data" })),
            )
                .into_response()
        }
    }
}

// Shared-secret gate for the API routes
use crate::application::telemetry_source::Credential;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

/// Reject requests without the configured secret and stash the caller's
/// `Authorization` header as the credential forwarded upstream.
pub async fn require_shared_secret(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if let Some(secret) = &state.shared_secret {
        if !bearer_matches(authorization.as_deref(), secret) {
            tracing::warn!("Rejected {} without a valid access key", request.uri().path());
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response();
        }
    }

    if let Some(value) = authorization {
        request.extensions_mut().insert(Credential::new(value));
    }

    next.run(request).await
}

/// `Bearer <secret>`, scheme case-insensitive.
pub fn bearer_matches(authorization: Option<&str>, secret: &str) -> bool {
    let Some((scheme, token)) = authorization.and_then(|v| v.trim().split_once(' ')) else {
        return false;
    };
    scheme.eq_ignore_ascii_case("bearer") && constant_time_eq(token.trim().as_bytes(), secret.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

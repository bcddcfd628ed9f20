// HTTP response utilities for JSON+Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Response, StatusCode, header},
};
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Whether the client advertised Brotli support.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|entry| coding_accepted(entry, "br")))
        .unwrap_or(false)
}

/// `coding[;q=weight]` names `coding` with a non-zero weight.
fn coding_accepted(entry: &str, coding: &str) -> bool {
    let mut params = entry.split(';').map(str::trim);
    let Some(name) = params.next() else {
        return false;
    };
    if !name.eq_ignore_ascii_case(coding) {
        return false;
    }

    !params.any(|param| {
        param
            .split_once('=')
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
            .and_then(|(_, weight)| weight.trim().parse::<f32>().ok())
            .is_some_and(|weight| weight <= 0.0)
    })
}

/// Serialize to JSON and optionally compress with Brotli
pub async fn json_response<T: Serialize>(
    data: &T,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let json_bytes = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (body_bytes, content_encoding) = if compress {
        let cursor = std::io::Cursor::new(json_bytes);
        let mut encoder = BrotliEncoder::new(cursor);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        (compressed, Some("br"))
    } else {
        (json_bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));

    if let Some(encoding) = content_encoding {
        response_builder = response_builder
            .header(header::CONTENT_ENCODING, encoding)
            .header(header::VARY, "accept-encoding");
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

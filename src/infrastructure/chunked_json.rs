// Chunked NDJSON streaming utilities
use crate::domain::dashboard::SinkEvent;
use crate::infrastructure::json_mapper::event_to_json;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::sync::mpsc;

/// Create a chunked response with one JSON document per line
pub fn chunked_json_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = SinkEvent> + Send + 'static,
{
    let byte_stream = stream.map(serialize_line);
    let body = Body::from_stream(byte_stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single event to a newline-terminated chunk
fn serialize_line(event: SinkEvent) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(&event_to_json(event))?;

    let mut chunk = BytesMut::with_capacity(json.len() + 1);
    chunk.put_slice(&json);
    chunk.put_u8(b'\n');

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver. The response ends
/// once every sender is dropped.
pub fn stream_from_receiver(mut rx: mpsc::UnboundedReceiver<SinkEvent>) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    match chunked_json_stream(stream) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

// Infrastructure layer - External dependencies and adapters
pub mod channel_sink;
pub mod chunked_json;
pub mod config;
pub mod http_response;
pub mod json_mapper;
pub mod snapshot_store;
pub mod upstream_client;

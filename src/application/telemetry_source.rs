// Telemetry source trait for upstream data access
use crate::domain::telemetry::Resource;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Authorization header value forwarded from the caller to the upstream API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(header_value: impl Into<String>) -> Self {
        Self(header_value.into())
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Failure fetching a single upstream resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream rejected the credential")]
    Unauthorized,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream reported an unsuccessful response")]
    Rejected,

    #[error("invalid response body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch one resource and return the `data` member of its envelope.
    async fn fetch(
        &self,
        resource: Resource,
        credential: Option<&Credential>,
    ) -> Result<Value, FetchError>;
}

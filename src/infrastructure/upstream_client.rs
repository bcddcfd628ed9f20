// Upstream telemetry API client
use crate::application::telemetry_source::{Credential, FetchError, TelemetrySource};
use crate::domain::telemetry::Resource;
use crate::infrastructure::config::UpstreamSettings;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpTelemetrySource {
    base_url: String,
    current_path: String,
    today_path: String,
    yearly_path: String,
    client: Client,
}

/// `{ success, data }` wrapper returned by every upstream resource.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Value,
}

fn default_success() -> bool {
    true
}

/// Raw upstream response passed through by the proxy endpoints.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HttpTelemetrySource {
    pub fn new(settings: &UpstreamSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            current_path: settings.current_path.clone(),
            today_path: settings.today_path.clone(),
            yearly_path: settings.yearly_path.clone(),
            client,
        })
    }

    fn resource_url(&self, resource: Resource) -> String {
        let path = match resource {
            Resource::Current => &self.current_path,
            Resource::Today => &self.today_path,
            Resource::Yearly => &self.yearly_path,
        };
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        resource: Resource,
        credential: Option<&Credential>,
    ) -> Result<reqwest::Response, FetchError> {
        let url = self.resource_url(resource);
        tracing::debug!("Fetching {} from {}", resource, url);

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(credential) = credential {
            request = request.header(header::AUTHORIZATION, credential.header_value());
        }

        request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }

    /// Forward a request verbatim; only transport failures are errors.
    pub async fn forward(
        &self,
        resource: Resource,
        credential: Option<&Credential>,
    ) -> Result<ForwardedResponse, FetchError> {
        let response = self.send(resource, credential).await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn fetch(
        &self,
        resource: Resource,
        credential: Option<&Credential>,
    ) -> Result<Value, FetchError> {
        let response = self.send(resource, credential).await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!("Upstream {} failed with status {}: {}", resource, status, body);
                return Err(FetchError::Status(status.as_u16()));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let envelope: Envelope =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(FetchError::Rejected);
        }

        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn settings(base_url: String) -> UpstreamSettings {
        UpstreamSettings {
            base_url,
            current_path: "/current".to_string(),
            today_path: "/today".to_string(),
            yearly_path: "/yearly".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_data_and_forwards_credential() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/today")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "data": [{"TimeStamp": 1_700_000_000, "Power": 321.0}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let source = HttpTelemetrySource::new(&settings(server.url())).unwrap();
        let data = source
            .fetch(Resource::Today, Some(&Credential::new("Bearer secret")))
            .await
            .unwrap();

        assert_eq!(data[0]["Power"], json!(321.0));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/current")
            .with_status(401)
            .create_async()
            .await;

        let source = HttpTelemetrySource::new(&settings(server.url())).unwrap();
        let result = source.fetch(Resource::Current, None).await;

        assert!(matches!(result, Err(FetchError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/yearly")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let source = HttpTelemetrySource::new(&settings(server.url())).unwrap();
        let result = source.fetch(Resource::Yearly, None).await;

        assert!(matches!(result, Err(FetchError::Status(503))));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/current")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let source = HttpTelemetrySource::new(&settings(server.url())).unwrap();
        let result = source.fetch(Resource::Current, None).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/current")
            .with_status(200)
            .with_body(json!({"success": false, "data": null}).to_string())
            .create_async()
            .await;

        let source = HttpTelemetrySource::new(&settings(server.url())).unwrap();
        let result = source.fetch(Resource::Current, None).await;

        assert!(matches!(result, Err(FetchError::Rejected)));
    }

    #[tokio::test]
    async fn test_forward_passes_status_and_body_through() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/yearly")
            .match_header("authorization", "Bearer secret")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"bad token"}"#)
            .create_async()
            .await;

        let source = HttpTelemetrySource::new(&settings(format!("{}/", server.url()))).unwrap();
        let forwarded = source
            .forward(Resource::Yearly, Some(&Credential::new("Bearer secret")))
            .await
            .unwrap();

        assert_eq!(forwarded.status, 401);
        assert_eq!(forwarded.content_type.as_deref(), Some("application/json"));
        assert_eq!(&forwarded.body[..], br#"{"error":"bad token"}"#);
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let source = HttpTelemetrySource::new(&settings("http://127.0.0.1:1".to_string())).unwrap();
        let result = source.fetch(Resource::Today, None).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}

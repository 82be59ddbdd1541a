use crate::core::config::{ClientConfig, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use crate::core::types::RequestMethod;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use thiserror::Error;
use tracing::{instrument, trace};

/// A fully routed, signed call ready to go on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body as received, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// HTTP transport used by the gateway client
///
/// The client never talks to reqwest directly; tests and embedders can plug
/// in any implementation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}

/// A transport that can be rebuilt for a new timeout and user agent
pub trait Reconfigure: Sized {
    fn reconfigure(&self, config: &TransportConfig) -> Result<Self, TransportError>;
}

/// Configuration for the reqwest transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TransportConfig {
    /// Timeout and user agent taken from a client configuration
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Implementation of `HttpTransport` using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Reconfigure for ReqwestTransport {
    fn reconfigure(&self, config: &TransportConfig) -> Result<Self, TransportError> {
        Self::new(config.clone())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
        };
        let mut builder = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        trace!(status, "Response body: {}", body);

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_builders() {
        let config = TransportConfig::default()
            .with_timeout(5)
            .with_user_agent("test-agent".to_string());
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "test-agent");

        let transport = ReqwestTransport::new(config).unwrap();
        assert_eq!(transport.config().timeout_seconds, 5);
    }

    #[test]
    fn test_transport_config_follows_client_config() {
        let client_config = ClientConfig::new("ak", "sk")
            .timeout_seconds(7)
            .user_agent("agent/2");
        let config = TransportConfig::from_client_config(&client_config);
        assert_eq!(config.timeout_seconds, 7);
        assert_eq!(config.user_agent, "agent/2");

        let transport = ReqwestTransport::new(TransportConfig::default()).unwrap();
        let rebuilt = transport.reconfigure(&config).unwrap();
        assert_eq!(rebuilt.config().timeout_seconds, 7);
        assert_eq!(transport.config().timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = TransportRequest {
            method: RequestMethod::Get,
            url: "http://localhost/ipInfo".to_string(),
            headers: vec![("accessKey".to_string(), "ak".to_string())],
            body: None,
        };
        assert_eq!(request.header("ACCESSKEY"), Some("ak"));
        assert_eq!(request.header("sign"), None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let transport = ReqwestTransport::new(TransportConfig::default().with_timeout(2)).unwrap();
        let request = TransportRequest {
            method: RequestMethod::Get,
            url: "http://127.0.0.1:1/ipInfo".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}

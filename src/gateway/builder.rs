use crate::core::config::{ClientConfig, ConfigError, Credentials};
use crate::core::errors::ApiError;
use crate::core::kernel::rest::{HttpTransport, ReqwestTransport, TransportConfig};
use crate::core::kernel::signer::{HeaderShape, HmacSigner, Signer};
use crate::gateway::client::GatewayClient;
use std::sync::Arc;

/// Builder for creating gateway clients
///
/// Credentials are optional at build time: a client without defaults can
/// still be used with per-call credentials.
pub struct GatewayBuilder {
    config: ClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            signer: None,
        }
    }

    /// Set the whole client configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default credentials
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.config.credentials = Credentials::new(access_key, secret_key);
        self
    }

    /// Set the gateway host, e.g. `http://gw.example.com`
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    /// Set the transport timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn with_header_shape(mut self, header_shape: HeaderShape) -> Self {
        self.config.header_shape = header_shape;
        self
    }

    /// Replace the default HMAC-SHA256 signer
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build a client backed by reqwest
    pub fn build(self) -> Result<GatewayClient<ReqwestTransport>, ApiError> {
        let transport = ReqwestTransport::new(TransportConfig::from_client_config(&self.config))
            .map_err(|e| ConfigError::InvalidConfiguration(e.to_string()))?;

        Ok(self.build_with_transport(transport))
    }

    /// Build a client over a caller-supplied transport
    pub fn build_with_transport<T: HttpTransport>(self, transport: T) -> GatewayClient<T> {
        let signer = self
            .signer
            .unwrap_or_else(|| Arc::new(HmacSigner::new()));
        GatewayClient::new(self.config, transport, signer)
    }
}

/// Build a reqwest-backed client from a configuration
pub fn build_client(config: ClientConfig) -> Result<GatewayClient<ReqwestTransport>, ApiError> {
    GatewayBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_credentials() {
        let client = GatewayBuilder::new().build().unwrap();
        assert!(!client.config().has_credentials());
        assert_eq!(client.config().base_host(), "");
    }

    #[test]
    fn test_builder_settings_reach_client() {
        let client = GatewayBuilder::new()
            .with_credentials("ak", "sk")
            .with_host("http://gw.example.com")
            .with_timeout(7)
            .with_user_agent("demo/1.0")
            .with_header_shape(HeaderShape::LegacyNonce)
            .build()
            .unwrap();

        let config = client.config();
        assert!(config.has_credentials());
        assert_eq!(config.base_host(), "http://gw.example.com");
        assert_eq!(config.header_shape, HeaderShape::LegacyNonce);
        assert_eq!(client.transport().config().timeout_seconds, 7);
        assert_eq!(client.transport().config().user_agent, "demo/1.0");
    }

    #[test]
    fn test_derived_client_uses_new_transport_settings() {
        let client = GatewayBuilder::new()
            .with_credentials("ak", "sk")
            .with_timeout(30)
            .build()
            .unwrap();

        let derived = client
            .with_config(
                ClientConfig::new("a", "s")
                    .timeout_seconds(1)
                    .user_agent("derived/1.0"),
            )
            .unwrap();

        assert_eq!(derived.config().timeout_seconds, 1);
        assert_eq!(derived.transport().config().timeout_seconds, 1);
        assert_eq!(derived.transport().config().user_agent, "derived/1.0");
        assert_eq!(client.transport().config().timeout_seconds, 30);
    }

    #[test]
    fn test_build_client_from_config() {
        let config = ClientConfig::new("ak", "sk").host("http://gw");
        let client = build_client(config).unwrap();
        assert_eq!(client.config().base_host(), "http://gw");
    }
}

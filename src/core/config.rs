use crate::core::kernel::signer::HeaderShape;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "GatewaySdk/0.1";

/// Access key / secret key pair used to sign gateway calls
#[derive(Debug, Clone)]
pub struct Credentials {
    access_key: Secret<String>,
    secret_key: Secret<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: Secret::new(access_key.into()),
            secret_key: Secret::new(secret_key.into()),
        }
    }

    /// Both keys are present and not blank
    pub fn is_usable(&self) -> bool {
        !self.access_key.expose_secret().trim().is_empty()
            && !self.secret_key.expose_secret().trim().is_empty()
    }

    pub fn access_key(&self) -> &str {
        self.access_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

/// Client-wide settings: default credentials, gateway host and transport knobs.
///
/// A `ClientConfig` is read once when a client is built and never mutated
/// afterwards, so concurrent dispatches always see the same snapshot.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub host: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub header_shape: HeaderShape,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

// Never expose secrets in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ClientConfig", 6)?;
        state.serialize_field("access_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("host", &self.host)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.serialize_field("header_shape", &self.header_shape)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            #[serde(default)]
            access_key: String,
            #[serde(default)]
            secret_key: String,
            host: Option<String>,
            timeout_seconds: Option<u64>,
            user_agent: Option<String>,
            #[serde(default)]
            header_shape: HeaderShape,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            credentials: Credentials::new(helper.access_key, helper.secret_key),
            host: helper.host,
            timeout_seconds: helper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            user_agent: helper
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            header_shape: helper.header_shape,
        })
    }
}

impl ClientConfig {
    /// Create a new configuration with gateway credentials
    #[must_use]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key, secret_key),
            host: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            header_shape: HeaderShape::default(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_ACCESS_KEY`
    /// - `{PREFIX}_SECRET_KEY`
    /// - `{PREFIX}_HOST` (optional)
    /// - `{PREFIX}_TIMEOUT_SECONDS` (optional, defaults to 30)
    /// - `{PREFIX}_LEGACY_NONCE` (optional, `true` switches to the nonce header shape)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let access_key_var = format!("{}_ACCESS_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);
        let host_var = format!("{}_HOST", prefix);
        let timeout_var = format!("{}_TIMEOUT_SECONDS", prefix);
        let nonce_var = format!("{}_LEGACY_NONCE", prefix);

        let access_key = env::var(&access_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(access_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let host = env::var(&host_var).ok().filter(|h| !h.trim().is_empty());

        let timeout_seconds = match env::var(&timeout_var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!("{} must be a number: {}", timeout_var, e))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        let header_shape = if env::var(&nonce_var)
            .unwrap_or_default()
            .parse::<bool>()
            .unwrap_or(false)
        {
            HeaderShape::LegacyNonce
        } else {
            HeaderShape::Digest
        };

        Ok(Self {
            credentials: Credentials::new(access_key, secret_key),
            host,
            timeout_seconds,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            header_shape,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // missing file falls back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Load configuration with automatic .env file detection
    ///
    /// Tries `.env.local`, then `.env.{ENVIRONMENT}`, then `.env`; only the
    /// first file found is loaded.
    #[cfg(feature = "env-file")]
    pub fn from_env_auto(prefix: &str) -> Result<Self, ConfigError> {
        let env_files = [
            ".env.local".to_string(),
            format!(
                ".env.{}",
                env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
            ),
            ".env".to_string(),
        ];

        for env_file in &env_files {
            match dotenv::from_path(env_file) {
                Ok(()) => break,
                Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "Failed to load .env file '{}': {}",
                        env_file, e
                    )));
                }
            }
        }

        Self::from_env(prefix)
    }

    /// Check if the default credentials can sign a call
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_usable()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub const fn header_shape(mut self, header_shape: HeaderShape) -> Self {
        self.header_shape = header_shape;
        self
    }

    /// Gateway host, or an empty string when none is configured
    pub fn base_host(&self) -> &str {
        self.host.as_deref().map_or("", str::trim)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_usable() {
        assert!(Credentials::new("ak", "sk").is_usable());
        assert!(!Credentials::new("ak", "  ").is_usable());
        assert!(!Credentials::new("", "sk").is_usable());
    }

    #[test]
    fn test_serialize_redacts_keys() {
        let config = ClientConfig::new("ak-123", "sk-456").host("http://gw.example.com");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ak-123"));
        assert!(!json.contains("sk-456"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("gw.example.com"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"access_key":"ak","secret_key":"sk","host":"http://gw"}"#)
                .unwrap();
        assert!(config.has_credentials());
        assert_eq!(config.base_host(), "http://gw");
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.header_shape, HeaderShape::Digest);
    }

    #[test]
    fn test_base_host_defaults_to_empty() {
        assert_eq!(ClientConfig::default().base_host(), "");
        assert!(!ClientConfig::default().has_credentials());
    }

    #[test]
    fn test_from_env() {
        env::set_var("CFGTEST_ACCESS_KEY", "env-ak");
        env::set_var("CFGTEST_SECRET_KEY", "env-sk");
        env::set_var("CFGTEST_HOST", "http://gw.example.com");
        env::set_var("CFGTEST_TIMEOUT_SECONDS", "5");
        env::set_var("CFGTEST_LEGACY_NONCE", "true");

        let config = ClientConfig::from_env("cfgtest").unwrap();
        assert_eq!(config.credentials.access_key(), "env-ak");
        assert_eq!(config.credentials.secret_key(), "env-sk");
        assert_eq!(config.base_host(), "http://gw.example.com");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.header_shape, HeaderShape::LegacyNonce);
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = ClientConfig::from_env("CFGTEST_MISSING").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvironmentVariable(ref v) if v == "CFGTEST_MISSING_ACCESS_KEY"));
    }

    #[test]
    fn test_from_env_bad_timeout() {
        env::set_var("CFGBAD_ACCESS_KEY", "ak");
        env::set_var("CFGBAD_SECRET_KEY", "sk");
        env::set_var("CFGBAD_TIMEOUT_SECONDS", "soon");
        let err = ClientConfig::from_env("CFGBAD").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
    }
}

/// Gateway kernel - transport and signing layer
///
/// The kernel knows nothing about individual endpoints. It provides the two
/// seams the gateway client is assembled from:
///
/// ## Transport Layer
/// - `HttpTransport`: pluggable HTTP interface
/// - `ReqwestTransport`: reqwest-backed implementation
///
/// ## Authentication
/// - `Signer`: pluggable signature interface
/// - `HmacSigner`: HMAC-SHA256 over the `body` header value
/// - `SignedHeaders`: the `accessKey` / `body` / `sign` / `timestamp` header set
///
/// # Example
/// ```rust,no_run
/// use gateway_sdk::core::config::Credentials;
/// use gateway_sdk::core::kernel::*;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let creds = Credentials::new("access_key", "secret_key");
/// let headers = SignedHeaders::build(
///     &HmacSigner::new(),
///     &creds,
///     r#"{"method":"GET","path":"/ipInfo","requestParams":{}}"#,
///     HeaderShape::Digest,
///     unix_timestamp(),
/// )?;
/// let transport = ReqwestTransport::new(TransportConfig::default().with_timeout(10))?;
/// # let _ = (headers, transport);
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{
    HttpTransport, RawResponse, Reconfigure, ReqwestTransport, TransportConfig, TransportError,
    TransportRequest,
};
pub use signer::{
    body_digest, generate_nonce, unix_timestamp, HeaderShape, HmacSigner, SignedHeaders, Signer,
};

use crate::core::config::Credentials;
use crate::core::errors::ApiError;
use hmac::{Hmac, Mac};
use md5::Md5;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ACCESS_KEY_HEADER: &str = "accessKey";
pub const BODY_HEADER: &str = "body";
pub const SIGN_HEADER: &str = "sign";
pub const TIMESTAMP_HEADER: &str = "timestamp";
pub const NONCE_HEADER: &str = "nonce";

const NONCE_DIGITS: usize = 4;

/// Signer trait for request authentication
///
/// Implementations must be pure: the same payload and secret always produce
/// the same signature, so the gateway can recompute it on its side.
pub trait Signer: Send + Sync {
    /// Sign `payload` (the `body` header value) with `secret`
    fn sign(&self, payload: &str, secret: &str) -> Result<String, ApiError>;
}

/// HMAC-SHA256 signer producing lowercase hex signatures
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSigner;

impl HmacSigner {
    pub const fn new() -> Self {
        Self
    }
}

impl Signer for HmacSigner {
    fn sign(&self, payload: &str, secret: &str) -> Result<String, ApiError> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ApiError::Operation(format!("Failed to create HMAC: {}", e)))?;

        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Lowercase hex MD5 of the canonical request body
pub fn body_digest(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}

/// Which authentication headers go out with each call.
///
/// `Digest` is the canonical shape: the `body` header carries the MD5 digest
/// of the canonical body and `sign` is computed over that digest.
/// `LegacyNonce` is the wire format of the older verification filter: the
/// `body` header carries the canonical body itself, `sign` is computed over
/// that raw body, and a short random `nonce` is added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderShape {
    #[default]
    Digest,
    LegacyNonce,
}

/// Authentication headers for a single call. Computed once, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub access_key: String,
    /// Value of the `body` header: the digest, or the raw body under `LegacyNonce`
    pub body: String,
    pub sign: String,
    pub timestamp: i64,
    pub nonce: Option<String>,
}

impl SignedHeaders {
    /// Sign `body` according to `shape` and stamp the result with
    /// `timestamp` (Unix seconds).
    pub fn build(
        signer: &dyn Signer,
        credentials: &Credentials,
        body: &str,
        shape: HeaderShape,
        timestamp: i64,
    ) -> Result<Self, ApiError> {
        let (body, nonce) = match shape {
            HeaderShape::Digest => (body_digest(body.as_bytes()), None),
            HeaderShape::LegacyNonce => (body.to_string(), Some(generate_nonce())),
        };
        let sign = signer.sign(&body, credentials.secret_key())?;

        Ok(Self {
            access_key: credentials.access_key().to_string(),
            body,
            sign,
            timestamp,
            nonce,
        })
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (ACCESS_KEY_HEADER.to_string(), self.access_key),
            (BODY_HEADER.to_string(), self.body),
            (SIGN_HEADER.to_string(), self.sign),
            (TIMESTAMP_HEADER.to_string(), self.timestamp.to_string()),
        ];
        if let Some(nonce) = self.nonce {
            pairs.push((NONCE_HEADER.to_string(), nonce));
        }
        pairs
    }
}

/// Random decimal nonce for the legacy header shape
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..NONCE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Current Unix time in seconds
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

use crate::core::config::{ClientConfig, ConfigError, Credentials};
use crate::core::errors::ApiError;
use crate::core::kernel::rest::{
    HttpTransport, RawResponse, Reconfigure, TransportConfig, TransportRequest,
};
use crate::core::kernel::signer::{unix_timestamp, SignedHeaders, Signer};
use crate::core::traits::{ApiRequest, ApiResponse};
use crate::core::types::{param_to_string, ErrorEnvelope, Params, RequestMethod};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};
use url::form_urlencoded::byte_serialize;

const SUCCESS_STATUS: u16 = 200;

/// Signed client for the API gateway.
///
/// Every call runs the same independent pipeline: validate the descriptor,
/// pick credentials, strip a duplicated host prefix, sign, route by method,
/// send, and map the answer into the descriptor's container. Configuration is
/// an immutable snapshot shared behind an `Arc`; use
/// [`with_config`](Self::with_config) to derive a client with other defaults.
pub struct GatewayClient<T: HttpTransport> {
    transport: T,
    signer: Arc<dyn Signer>,
    config: Arc<ClientConfig>,
}

impl<T: HttpTransport + fmt::Debug> fmt::Debug for GatewayClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport + Clone> Clone for GatewayClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            signer: Arc::clone(&self.signer),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: HttpTransport> GatewayClient<T> {
    pub fn new(config: ClientConfig, transport: T, signer: Arc<dyn Signer>) -> Self {
        Self {
            transport,
            signer,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// A client sharing this one's signer but using `config`. The transport
    /// is rebuilt so the new timeout and user agent take effect. Calls
    /// already in flight keep the snapshot they started with.
    pub fn with_config(&self, config: ClientConfig) -> Result<Self, ApiError>
    where
        T: Reconfigure,
    {
        let transport = self
            .transport
            .reconfigure(&TransportConfig::from_client_config(&config))
            .map_err(|e| ConfigError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            transport,
            signer: Arc::clone(&self.signer),
            config: Arc::new(config),
        })
    }

    /// Send `request` signed with the client's default credentials
    pub async fn dispatch<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.dispatch_with_credentials(None, request).await
    }

    /// Send `request`, signing with `credentials` when both of its keys are
    /// set and with the client's defaults otherwise. The override applies to
    /// this call only.
    ///
    /// A non-200 answer is returned as `Ok` with `errorMessage` / `code` in
    /// the container; only local, transport and payload failures are `Err`.
    #[instrument(skip(self, credentials, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn dispatch_with_credentials<R: ApiRequest>(
        &self,
        credentials: Option<&Credentials>,
        request: &R,
    ) -> Result<R::Response, ApiError> {
        let transport_request = self.prepare(credentials, request)?;
        let mut response = request.new_response()?;

        let raw = self.transport.send(transport_request).await?;
        match map_response(raw)? {
            MappedResponse::Success(data) => response.set_data(data),
            MappedResponse::RemoteFailure(data) => {
                response.set_data(data);
                response.mark_remote_error();
            }
        }

        Ok(response)
    }

    /// Validate, sign and route `request` without sending it
    pub fn prepare<R: ApiRequest>(
        &self,
        credentials: Option<&Credentials>,
        request: &R,
    ) -> Result<TransportRequest, ApiError> {
        let (method, path) = validate(request)?;
        let credentials = self.select_credentials(credentials)?;

        let host = self.config.base_host();
        let path = strip_host_prefix(host, path);

        let body = canonical_body(method, path, request.params())?;
        let headers = SignedHeaders::build(
            self.signer.as_ref(),
            credentials,
            &body,
            self.config.header_shape,
            unix_timestamp(),
        )?;
        trace!(body = %headers.body, "Signed request");

        let url = join_url(host, path);
        let (url, body) = match method {
            RequestMethod::Get => (append_query(url, request.params()), None),
            RequestMethod::Post => {
                let body = serde_json::to_vec(request.params()).map_err(|e| {
                    ApiError::Operation(format!("Failed to serialize request body: {}", e))
                })?;
                (url, Some(body))
            }
        };
        debug!(%method, %url, param_count = request.params().len(), "Routed request");

        Ok(TransportRequest {
            method,
            url,
            headers: headers.into_pairs(),
            body,
        })
    }

    fn select_credentials<'a>(
        &'a self,
        credentials: Option<&'a Credentials>,
    ) -> Result<&'a Credentials, ApiError> {
        match credentials {
            Some(creds) if creds.is_usable() => Ok(creds),
            _ if self.config.credentials.is_usable() => Ok(&self.config.credentials),
            _ => Err(ApiError::Auth(
                "Configure an access key and secret key before calling the gateway".to_string(),
            )),
        }
    }
}

fn validate<R: ApiRequest>(request: &R) -> Result<(RequestMethod, &str), ApiError> {
    let method = request.method().trim();
    let path = request.path().trim();

    if method.is_empty() {
        return Err(ApiError::Validation(
            "Request method must not be empty".to_string(),
        ));
    }
    if path.is_empty() {
        return Err(ApiError::Validation(
            "Request path must not be empty".to_string(),
        ));
    }

    Ok((method.parse()?, path))
}

/// Drop `host` from the front of `path` so it is not repeated in the URL
pub(crate) fn strip_host_prefix<'a>(host: &str, path: &'a str) -> &'a str {
    if host.is_empty() {
        return path;
    }
    path.strip_prefix(host).unwrap_or(path)
}

/// `host` + `path` for both GET and POST. A trailing `/` on the host is
/// dropped when the path starts with `/`, so `http://gw/` and `/currency`
/// give `http://gw/currency` rather than a doubled slash.
pub(crate) fn join_url(host: &str, path: &str) -> String {
    match host.strip_suffix('/') {
        Some(trimmed) if path.starts_with('/') => format!("{}{}", trimmed, path),
        _ => format!("{}{}", host, path),
    }
}

pub(crate) fn append_query(mut url: String, params: &Params) -> String {
    if params.is_empty() {
        return url;
    }

    let query = params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                byte_serialize(key.as_bytes()).collect::<String>(),
                byte_serialize(param_to_string(value).as_bytes()).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    url.push('?');
    url.push_str(&query);
    url
}

/// JSON the body digest is computed over. Key order is fixed so the digest
/// is reproducible.
fn canonical_body(method: RequestMethod, path: &str, params: &Params) -> Result<String, ApiError> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SignablePayload<'a> {
        method: &'a str,
        path: &'a str,
        request_params: &'a Params,
    }

    serde_json::to_string(&SignablePayload {
        method: method.as_str(),
        path,
        request_params: params,
    })
    .map_err(|e| ApiError::Operation(format!("Failed to serialize request: {}", e)))
}

/// Gateway answer mapped into container data
#[derive(Debug, PartialEq)]
enum MappedResponse {
    Success(Params),
    /// `{errorMessage, code}` folded from a non-200 status
    RemoteFailure(Params),
}

fn map_response(raw: RawResponse) -> Result<MappedResponse, ApiError> {
    if raw.status == SUCCESS_STATUS {
        return serde_json::from_str::<Params>(&raw.body)
            .map(MappedResponse::Success)
            .map_err(|e| ApiError::Operation(format!("Failed to parse JSON response: {}", e)));
    }

    let envelope = ErrorEnvelope::parse_lenient(&raw.body);
    warn!(
        status = raw.status,
        code = envelope.code,
        message = %envelope.message,
        "Gateway reported a failure"
    );
    Ok(MappedResponse::RemoteFailure(envelope.into_data()))
}

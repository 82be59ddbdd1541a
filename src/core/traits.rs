use crate::core::{errors::ApiError, types::Params};

/// A response container the client can populate.
pub trait ApiResponse: Default + Send {
    /// Store the data mapped from the gateway answer
    fn set_data(&mut self, data: Params);

    /// Called after `set_data` when the data was folded from a non-200 answer
    fn mark_remote_error(&mut self) {}
}

/// Describes one gateway call: which endpoint, how, and with what parameters.
///
/// The method is kept as the caller wrote it; the client validates and
/// normalizes it at dispatch time.
pub trait ApiRequest: Send + Sync {
    type Response: ApiResponse;

    /// HTTP method, e.g. `GET` or `POST`
    fn method(&self) -> &str;

    /// Endpoint path, with or without the gateway host prefix
    fn path(&self) -> &str;

    fn params(&self) -> &Params;

    /// Build the empty container the answer will be written into
    fn new_response(&self) -> Result<Self::Response, ApiError> {
        Ok(Self::Response::default())
    }
}

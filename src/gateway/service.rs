use crate::core::config::Credentials;
use crate::core::errors::ApiError;
use crate::core::kernel::rest::HttpTransport;
use crate::core::traits::ApiRequest;
use crate::core::types::ResultResponse;
use crate::gateway::client::GatewayClient;
use crate::gateway::requests::IpInfoRequest;
use async_trait::async_trait;

/// Operations offered by the gateway SDK
#[async_trait]
pub trait ApiService {
    /// Call any endpoint with the default credentials
    async fn request<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError>;

    /// Call any endpoint, preferring `credentials` when both keys are set
    async fn request_with_credentials<R: ApiRequest>(
        &self,
        credentials: &Credentials,
        request: &R,
    ) -> Result<R::Response, ApiError>;

    async fn get_ip_info(&self, request: &IpInfoRequest) -> Result<ResultResponse, ApiError>;

    async fn get_ip_info_with_credentials(
        &self,
        credentials: &Credentials,
        request: &IpInfoRequest,
    ) -> Result<ResultResponse, ApiError>;
}

#[async_trait]
impl<T: HttpTransport> ApiService for GatewayClient<T> {
    async fn request<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.dispatch(request).await
    }

    async fn request_with_credentials<R: ApiRequest>(
        &self,
        credentials: &Credentials,
        request: &R,
    ) -> Result<R::Response, ApiError> {
        self.dispatch_with_credentials(Some(credentials), request)
            .await
    }

    async fn get_ip_info(&self, request: &IpInfoRequest) -> Result<ResultResponse, ApiError> {
        self.dispatch(request).await
    }

    async fn get_ip_info_with_credentials(
        &self,
        credentials: &Credentials,
        request: &IpInfoRequest,
    ) -> Result<ResultResponse, ApiError> {
        self.dispatch_with_credentials(Some(credentials), request)
            .await
    }
}

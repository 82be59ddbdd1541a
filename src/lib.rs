pub mod core;
pub mod gateway;

pub use crate::core::{
    config::{ClientConfig, ConfigError, Credentials},
    errors::{ApiError, ErrorCode, ErrorKind},
    kernel::{HeaderShape, HmacSigner, Signer},
    traits::{ApiRequest, ApiResponse},
    types::*,
};
pub use crate::gateway::{
    build_client, ApiService, CurrencyRequest, GatewayBuilder, GatewayClient, GenericRequest,
    IpInfoRequest,
};

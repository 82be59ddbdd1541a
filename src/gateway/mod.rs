pub mod builder;
pub mod client;
pub mod requests;
pub mod service;

// Re-export main components
pub use builder::{build_client, GatewayBuilder};
pub use client::GatewayClient;
pub use requests::{CurrencyRequest, GenericRequest, IpInfoRequest, IP_INFO_PATH};
pub use service::ApiService;

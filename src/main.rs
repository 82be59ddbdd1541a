use anyhow::Context;
use gateway_sdk::{build_client, ApiService, ClientConfig, IpInfoRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Reads API_CLIENT_ACCESS_KEY / API_CLIENT_SECRET_KEY / API_CLIENT_HOST
    #[cfg(feature = "env-file")]
    let config = ClientConfig::from_env_auto("API_CLIENT");
    #[cfg(not(feature = "env-file"))]
    let config = ClientConfig::from_env("API_CLIENT");

    let config = config.context("failed to load gateway configuration")?;
    let client = build_client(config).context("failed to build gateway client")?;

    let ip = std::env::args().nth(1).unwrap_or_else(|| "8.8.8.8".to_string());
    let request = IpInfoRequest::new().with_param("ip", ip);

    let response = client
        .get_ip_info(&request)
        .await
        .context("ipInfo call failed")?;

    if response.is_remote_error() {
        println!(
            "Gateway rejected the call: {} (code {})",
            response.error_message().unwrap_or_default(),
            response.code().unwrap_or_default()
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}

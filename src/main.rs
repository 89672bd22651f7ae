use api_bridge::config::BridgeConfig;
use api_bridge::handler::function_handler;
use api_bridge::http::HTTP_CLIENT;
use lambda_runtime::tracing::info;
use lambda_runtime::{Error, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    let config = BridgeConfig::from_env()?;
    info!(api_base_url = %config.api_base_url, "Bridge configured");

    let transport = &*HTTP_CLIENT;
    let config = &config;
    lambda_runtime::run(service_fn(move |event| async move {
        function_handler(transport, config, event).await
    }))
    .await
}

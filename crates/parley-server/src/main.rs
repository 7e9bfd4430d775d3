use anyhow::Context;
use parley_infrastructure::ConfigService;
use parley_server::app::bootstrap;
use parley_server::start_server;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str =
    "parley=info,parley_server=info,parley_application=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_service = ConfigService::from_env();
    let config = config_service
        .load_server_config()
        .context("Failed to load server configuration")?;
    let secrets = config_service.load_secrets();

    let state = bootstrap(&config, &secrets).context("Failed to initialize application")?;

    start_server(&config, state)
        .await
        .context("Server terminated with an error")?;

    Ok(())
}

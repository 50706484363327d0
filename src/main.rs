use overlaycast::{Server, config::ServerConfig, error::ServerError, store::ConfigStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("overlaycast=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store = ConfigStore::open(&config.config_path)?;
    tracing::info!(
        config = %config.config_path.display(),
        overlays = %config.overlays_dir.display(),
        control_token = config.control_token.is_some(),
        "starting overlaycast"
    );

    Server::new(config, store).run().await
}

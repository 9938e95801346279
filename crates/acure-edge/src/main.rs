use acure_edge::{EdgeConfig, start_server};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = EdgeConfig::load()?;
    start_server(config).await
}

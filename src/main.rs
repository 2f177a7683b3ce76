use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use footprint_oracle::{
    clients::{OpenAiClient, TextGenerator},
    config::{Config, RuntimeConfig},
    http::{AppState, start_http_server},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "footprint-oracle")]
#[command(about = "Carbon footprint quiz service with generated 2050 stories", long_about = None)]
struct Cli {
    /// Address to listen on, overrides ORACLE_HTTP_BIND
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,
    /// Path to the TOML config file, overrides ORACLE_CONFIG
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Before tracing init so RUST_LOG from an env file applies
    footprint_oracle::load_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(RuntimeConfig::load_from_env().log_level))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load_with_path(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.http_bind = bind;
    }

    let generator: Option<Arc<dyn TextGenerator>> = match OpenAiClient::from_config(&config)? {
        Some(client) => {
            info!("Text generation enabled (model {})", client.model());
            Some(Arc::new(client))
        }
        None => None,
    };

    info!("Starting footprint-oracle");
    start_http_server(AppState::new(config, generator)).await?;

    Ok(())
}

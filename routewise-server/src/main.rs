use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use routewise_core::prelude::*;
use routewise_server::{AppState, ServerConfig, app};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "routewise-server", version, about = "Route calculation service")]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides `bind` from the configuration
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Overrides `routing.graph_cache_dir` from the configuration
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(dir) = cli.cache_dir {
        config.routing.graph_cache_dir = dir;
    }
    config.validate()?;

    // Blocking HTTP clients are created here and dropped after the runtime
    let provider = OverpassProvider::new(&config.routing)?;
    let cache = GraphCache::from_config(&config.routing, Box::new(provider))?;
    let geocoder = NominatimGeocoder::new(&config.routing)?;
    let state = AppState::new(cache, geocoder, config.routing.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(&config, state.clone()))?;
    Ok(())
}

async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "Listening on {} (cache: {})",
        listener.local_addr()?,
        config.routing.graph_cache_dir.display()
    );

    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_proxy::config::{default_config, load_config};
use edge_proxy::observability::{logging, metrics};
use edge_proxy::{HttpServer, Shutdown};

/// Edge reverse proxy: prefix-routes inbound requests to fixed backend
/// services and stamps CORS headers on every response.
#[derive(Debug, Parser)]
#[command(name = "edge-proxy", version, about)]
struct Cli {
    /// Path to a TOML configuration file. Without it, built-in defaults
    /// plus environment overrides apply.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init(&config.observability.log_level);

    tracing::info!(
        name = %config.name,
        bind_address = %config.listener.bind_address,
        backend = %config.backend.address,
        services = config.services.len(),
        "edge-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

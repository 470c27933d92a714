use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use gateway_console::cluster::{ClusterAccessor, ClusterSnapshot};
use gateway_console::config::{ConsoleConfig, load_config};
use gateway_console::lifecycle::Shutdown;
use gateway_console::{HttpServer, observability};

#[derive(Parser)]
#[command(name = "gateway-console")]
#[command(about = "Management console API for a Gateway-API ingress layer", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ConsoleConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        "gateway-console starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let accessor: Option<Arc<dyn ClusterAccessor>> = match &config.cluster.snapshot_path {
        Some(path) => {
            let snapshot = ClusterSnapshot::load(Path::new(path))?;
            tracing::info!(snapshot = %path, "Cluster snapshot loaded");
            Some(Arc::new(snapshot))
        }
        None => {
            tracing::warn!("No cluster context configured; engine endpoints will answer 503");
            None
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config, accessor);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

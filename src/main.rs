//! Modal overlay demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser ──▶ http::server (session, timeout, trace, request id)
//!                     │
//!                     ▼
//!                 http::pages ──▶ server::ModalRenderer
//!                                   │ marked?    ──▶ fragment / signal headers
//!                                   │ unmarked   ──▶ server::PagePipeline
//!                                   ▼                 (GET background, in-process)
//!                                 full page with the modal root pre-filled
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use modal_overlay::config::{load_config, AppConfig};
use modal_overlay::http::HttpServer;
use modal_overlay::lifecycle::Shutdown;
use modal_overlay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "modal-overlay")]
#[command(about = "Serve pages with modal overlays", long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("modal-overlay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        session_cookie = %config.session.cookie_name,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! thing-server
//!
//! ```text
//!   Client ──▶ request id ─▶ trace ─▶ timeout ─▶ responder ─▶ handler
//!                                                   ▲            │
//!                                                   └─ Failure ◀─┤
//!                                                                ├─▶ data store
//!                                                                └─▶ notification service
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use thing_server::config::{load_config, validate_config, ConfigError, ServerConfig};
use thing_server::exceptions::TracingSink;
use thing_server::lifecycle::{bootstrap, wait_for_signal, Shutdown};
use thing_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "thing-server")]
#[command(about = "Thing service with centralized failure handling", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(args: &Args) -> Result<ServerConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load(&args)?;

    logging::init_logging(&config.observability)?;
    tracing::info!("thing-server v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        // Validated at load time.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    // Any failure here ends the process before a request is accepted.
    let started = match bootstrap(&config, Arc::new(TracingSink)).await {
        Ok(started) => started,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    tracing::info!(
        address = %started.listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    started.server.run(started.listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

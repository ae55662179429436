//! reflectsvc
//!
//! Receives XML event documents from an upstream document classifier,
//! renames and types their fields into a flat JSON object, and relays the
//! result to a downstream endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                    reflectsvc                    │
//!                         │                                                  │
//!   POST /xml2json        │  ┌─────────┐    ┌──────────┐    ┌────────────┐  │
//!   ──────────────────────┼─▶│  http   │───▶│ convert  │───▶│   relay    │──┼──▶ Destination
//!                         │  │ server  │    │  engine  │    │   client   │  │
//!                         │  └─────────┘    └────┬─────┘    └─────┬──────┘  │
//!                         │                      │                │         │
//!                         │               ┌──────┴──────┐   ┌─────┴──────┐  │
//!                         │               │ translation │   │  capture   │  │
//!                         │               │    table    │   │ (debug)    │  │
//!                         │               └─────────────┘   └────────────┘  │
//!   {"success":true} or   │                                                  │
//!   {"error":"<status>"}  │  config · observability · net/tls · lifecycle    │
//!   ◀─────────────────────┼──────────────────────────────────────────────────│
//!                         └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use reflectsvc::config::Cli;
use reflectsvc::lifecycle::{startup, Shutdown};
use reflectsvc::observability::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("reflectsvc: {}", e);
            std::process::exit(2);
        }
    };

    let log_path = init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_path.display(),
        "reflectsvc starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        destination = %config.relay.destination,
        debug = config.observability.debug,
        verbose = config.observability.verbose,
        insecure = config.relay.insecure,
        static_headers = config.relay.headers.len(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    if let Err(e) = startup::run(config, shutdown).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

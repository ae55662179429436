//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the translation table
//! - Start the metrics endpoint when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener starts last (traffic only when ready)

use crate::config::{load_translation, ServiceConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, load_tls_config};
use crate::observability::metrics;

/// Run the service with a validated configuration until shutdown.
pub async fn run(config: ServiceConfig, shutdown: Shutdown) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_translation(&config)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tls = match config.listener.tls() {
        Some((cert, key)) => Some(load_tls_config(cert, key).await?),
        None => None,
    };

    let server = HttpServer::new(&config, table)?;
    let listener = net::bind(&config.listener).await?;
    let signalled = shutdown.signalled();

    match tls {
        Some(tls) => server.run_tls(listener, tls, signalled).await?,
        None => server.run(listener, signalled).await?,
    }

    Ok(())
}

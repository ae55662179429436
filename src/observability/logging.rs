//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Route events to stderr and to the log file
//! - Pick the default level from the debug/verbose switches
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over the switches
//! - The log file is truncated on every start and never suppressed
//! - `quiet` only drops the stderr sink

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file '{path}': {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(config: &ObservabilityConfig) -> &'static str {
    if config.debug {
        "info,reflectsvc=debug,tower_http=debug"
    } else if config.verbose {
        "info,reflectsvc=debug"
    } else {
        "info"
    }
}

/// Install the global subscriber and return the absolute log file path.
pub fn init_logging(config: &ObservabilityConfig) -> Result<PathBuf, LoggingError> {
    let path = std::path::absolute(&config.log_file).map_err(|source| LoggingError::File {
        path: config.log_file.clone(),
        source,
    })?;
    let file = File::create(&path).map_err(|source| LoggingError::File {
        path: path.clone(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(config).into());

    let stderr = (!config.quiet).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file_layer)
        .try_init()?;

    Ok(path)
}

//! Command-line flags.
//!
//! Flags override values from the optional TOML file. Boolean flags can only
//! switch a setting on.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::{HeaderConfig, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

#[derive(Debug, Parser)]
#[command(name = "reflectsvc")]
#[command(about = "Converts XML event documents to JSON and relays them downstream", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug mode: extra diagnostics and per-request artifacts
    #[arg(short, long)]
    pub debug: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log only to the log file
    #[arg(short, long)]
    pub quiet: bool,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Destination URL, or "localhost" for this service's /reflect
    #[arg(long)]
    pub destination: Option<String>,

    /// Skip certificate validation toward the destination (debug only)
    #[arg(long)]
    pub insecure: bool,

    /// Field translation file
    #[arg(long = "fieldNames", alias = "field-names", alias = "fieldnames")]
    pub field_names: Option<PathBuf>,

    /// PEM certificate for HTTPS
    #[arg(long = "certfile")]
    pub cert_file: Option<PathBuf>,

    /// PEM private key for HTTPS
    #[arg(long = "keyfile")]
    pub key_file: Option<PathBuf>,

    /// Static outbound header name; pairs with --header-value by position
    #[arg(long = "header-key")]
    pub header_keys: Vec<String>,

    /// Static outbound header value
    #[arg(long = "header-value")]
    pub header_values: Vec<String>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics: Option<String>,
}

impl Cli {
    /// Merge the configuration file and flags into a validated configuration.
    pub fn into_config(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ServiceConfig::default(),
        };

        if self.header_keys.len() != self.header_values.len() {
            return Err(ConfigError::Validation(vec![
                ValidationError::HeaderCountMismatch {
                    keys: self.header_keys.len(),
                    values: self.header_values.len(),
                },
            ]));
        }

        let obs = &mut config.observability;
        obs.debug |= self.debug;
        obs.verbose |= self.verbose;
        obs.quiet |= self.quiet;
        if let Some(path) = self.log_file {
            obs.log_file = path;
        }
        if let Some(addr) = self.metrics {
            obs.metrics_enabled = true;
            obs.metrics_address = addr;
        }

        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(cert) = self.cert_file {
            config.listener.cert_path = Some(cert);
        }
        if let Some(key) = self.key_file {
            config.listener.key_path = Some(key);
        }

        if let Some(destination) = self.destination {
            config.relay.destination = destination;
        }
        config.relay.insecure |= self.insecure;
        config.relay.headers.extend(
            self.header_keys
                .into_iter()
                .zip(self.header_values)
                .map(|(name, value)| HeaderConfig { name, value }),
        );

        if let Some(path) = self.field_names {
            config.translation.path = Some(path);
        }

        config.resolve_destination();
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

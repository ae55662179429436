//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::convert::DateLayouts;
use crate::translation::TableFormat;

/// Destination value that resolves to this service's own reflect endpoint.
pub const LOCALHOST_DESTINATION: &str = "localhost";

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Downstream destination for converted documents.
    pub relay: RelayConfig,

    /// Field translation file settings.
    pub translation: TranslationConfig,

    /// Date layouts used by the conversion engine.
    pub conversion: ConversionConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Debug artifact capture.
    pub capture: CaptureConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,
}

impl ServiceConfig {
    /// Replace the `localhost` destination with this service's reflect URL.
    pub fn resolve_destination(&mut self) {
        if self.relay.destination == LOCALHOST_DESTINATION {
            let scheme = if self.listener.tls().is_some() { "https" } else { "http" };
            self.relay.destination =
                format!("{}://localhost:{}/reflect", scheme, self.listener.port);
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    pub port: u16,

    /// PEM certificate chain; enables HTTPS together with `key_path`.
    pub cert_path: Option<PathBuf>,

    /// PEM private key.
    pub key_path: Option<PathBuf>,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Certificate and key, when both are configured.
    pub fn tls(&self) -> Option<(&Path, &Path)> {
        match (&self.cert_path, &self.key_path) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
            cert_path: None,
            key_path: None,
        }
    }
}

/// Downstream relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Destination URL, or `localhost` for this service's `/reflect`.
    pub destination: String,

    /// Skip certificate validation. Only accepted in debug mode.
    pub insecure: bool,

    /// Deadline for the whole outbound exchange in seconds.
    pub timeout_secs: u64,

    /// Static headers added to every outbound request.
    pub headers: Vec<HeaderConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            destination: LOCALHOST_DESTINATION.to_string(),
            insecure: false,
            timeout_secs: 60,
            headers: Vec::new(),
        }
    }
}

/// One static outbound header.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeaderConfig {
    pub name: String,
    pub value: String,
}

/// Field translation file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Path of the translation table; unset means pass-through.
    pub path: Option<PathBuf>,

    pub delimiter: char,

    /// Lines starting with this character are comments.
    pub comment: char,
}

impl TranslationConfig {
    pub fn format(&self) -> TableFormat {
        TableFormat {
            delimiter: self.delimiter,
            comment: self.comment,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let format = TableFormat::default();
        Self {
            path: None,
            delimiter: format.delimiter,
            comment: format.comment,
        }
    }
}

/// Conversion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// chrono layout of upstream date values.
    pub input_date_format: String,

    /// chrono layout written to the JSON output.
    pub output_date_format: String,
}

impl ConversionConfig {
    pub fn layouts(&self) -> DateLayouts {
        DateLayouts {
            input: self.input_date_format.clone(),
            output: self.output_date_format.clone(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        let layouts = DateLayouts::default();
        Self {
            input_date_format: layouts.input,
            output_date_format: layouts.output,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Extra diagnostics, debug artifacts, and permission for `insecure`.
    pub debug: bool,

    pub verbose: bool,

    /// Log only to the log file, not stderr.
    pub quiet: bool,

    /// Log file, truncated at startup.
    pub log_file: PathBuf,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            debug: false,
            verbose: false,
            quiet: false,
            log_file: PathBuf::from("reflectsvc.log"),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9091".to_string(),
        }
    }
}

/// Debug artifact configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Directory receiving artifacts when debug mode is on.
    pub directory: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Total time allowed for one inbound request in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 90,
            max_body_bytes: 4 * 1024 * 1024, // 4MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_localhost() {
        let mut config = ServiceConfig::default();
        config.listener.port = 8443;
        config.resolve_destination();
        assert_eq!(config.relay.destination, "http://localhost:8443/reflect");

        let mut config = ServiceConfig::default();
        config.listener.cert_path = Some("cert.pem".into());
        config.listener.key_path = Some("key.pem".into());
        config.resolve_destination();
        assert_eq!(config.relay.destination, "https://localhost:9090/reflect");
    }

    #[test]
    fn test_explicit_destination_kept() {
        let mut config = ServiceConfig::default();
        config.relay.destination = "https://api.example.com/docs".into();
        config.resolve_destination();
        assert_eq!(config.relay.destination, "https://api.example.com/docs");
    }

    #[test]
    fn test_partial_toml() {
        let config: ServiceConfig = toml::from_str(
            r##"
            [relay]
            destination = "https://api.example.com/docs"
            headers = [{ name = "X-Tenant", value = "acme" }]

            [translation]
            path = "fields.csv"
            comment = "#"
            "##,
        )
        .unwrap();

        assert_eq!(config.relay.timeout_secs, 60);
        assert_eq!(config.relay.headers.len(), 1);
        assert_eq!(config.translation.delimiter, ';');
        assert_eq!(config.translation.comment, '#');
        assert_eq!(config.listener.port, 9090);
    }
}

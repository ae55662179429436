//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Refuse `insecure` outside debug mode
//! - Validate the destination URL and static relay headers
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs after command-line overrides and destination resolution

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;
use crate::relay::headers::parse_static_headers;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("--insecure cannot be used without --debug; do not use --insecure in production")]
    InsecureWithoutDebug,

    #[error("relay destination '{0}' is not an absolute http(s) URL")]
    InvalidDestination(String),

    #[error("count of --header-key values ({keys}) does not equal count of --header-value values ({values})")]
    HeaderCountMismatch { keys: usize, values: usize },

    #[error("{0}")]
    InvalidHeader(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("request timeout ({request}s) must exceed the relay timeout ({relay}s)")]
    TimeoutOrder { request: u64, relay: u64 },

    #[error("translation delimiter and comment marker must differ (both '{0}')")]
    DelimiterIsComment(char),

    #[error("HTTPS needs both a certificate file and a key file")]
    IncompleteTls,
}

/// Validate a fully-resolved configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.relay.insecure && !config.observability.debug {
        errors.push(ValidationError::InsecureWithoutDebug);
    }

    match Url::parse(&config.relay.destination) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidDestination(
            config.relay.destination.clone(),
        )),
    }

    let pairs = config
        .relay
        .headers
        .iter()
        .map(|h| (h.name.as_str(), h.value.as_str()));
    if let Err(e) = parse_static_headers(pairs) {
        errors.push(ValidationError::InvalidHeader(e.to_string()));
    }

    if config.relay.timeout_secs == 0 {
        errors.push(ValidationError::Zero("relay.timeout_secs"));
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("limits.request_timeout_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }
    if config.limits.request_timeout_secs <= config.relay.timeout_secs {
        errors.push(ValidationError::TimeoutOrder {
            request: config.limits.request_timeout_secs,
            relay: config.relay.timeout_secs,
        });
    }

    if config.translation.delimiter == config.translation.comment {
        errors.push(ValidationError::DelimiterIsComment(config.translation.delimiter));
    }

    if config.listener.cert_path.is_some() != config.listener.key_path.is_some() {
        errors.push(ValidationError::IncompleteTls);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

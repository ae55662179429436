//! Outbound relay to the configured destination.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::HeaderMap;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::capture::{ArtifactKind, CaptureSink, CaptureTicket};
use crate::relay::headers::{outbound_headers, parse_static_headers, InvalidHeader};
use crate::relay::outcome::ProxyOutcome;

/// Errors building the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("insecure TLS toward the destination requires debug mode")]
    InsecureWithoutDebug,

    #[error("invalid destination URL '{url}': {source}")]
    Destination {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Header(#[from] InvalidHeader),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sends converted documents downstream and classifies the result.
#[derive(Debug, Clone)]
pub struct ProxyRelay {
    client: Client,
    destination: Url,
    static_headers: HeaderMap,
    capture: Option<Arc<CaptureSink>>,
}

impl ProxyRelay {
    /// Build the relay from a resolved destination.
    ///
    /// `debug` gates the insecure flag; certificate checks are only skipped
    /// when both are set.
    pub fn new(
        config: &RelayConfig,
        debug: bool,
        capture: Option<Arc<CaptureSink>>,
    ) -> Result<Self, RelayError> {
        if config.insecure && !debug {
            return Err(RelayError::InsecureWithoutDebug);
        }

        let destination = Url::parse(&config.destination).map_err(|source| RelayError::Destination {
            url: config.destination.clone(),
            source,
        })?;

        let static_headers = parse_static_headers(
            config
                .headers
                .iter()
                .map(|h| (h.name.as_str(), h.value.as_str())),
        )?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        if config.insecure {
            tracing::warn!(
                destination = %destination,
                "Certificate validation toward the destination is DISABLED; never run this in production"
            );
        }

        Ok(Self {
            client,
            destination,
            static_headers,
            capture,
        })
    }

    pub fn destination(&self) -> &Url {
        &self.destination
    }

    /// POST `json_body` to the destination and classify what came back.
    pub async fn relay(
        &self,
        json_body: String,
        inbound: &HeaderMap,
        ticket: Option<&CaptureTicket>,
    ) -> ProxyOutcome {
        let start = Instant::now();
        let headers = outbound_headers(inbound, &self.static_headers);

        tracing::debug!(
            destination = %self.destination,
            headers = ?headers.keys().collect::<Vec<_>>(),
            bytes = json_body.len(),
            "Relaying converted document"
        );

        if let (Some(sink), Some(ticket)) = (&self.capture, ticket) {
            sink.record(
                ticket,
                ArtifactKind::Outbound,
                Some(&headers),
                Bytes::from(json_body.clone()),
            );
        }

        let sent = self
            .client
            .post(self.destination.clone())
            .headers(headers)
            .body(json_body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                let outcome = ProxyOutcome::from_send_error(&e);
                tracing::warn!(
                    destination = %self.destination,
                    timeout = e.is_timeout(),
                    error = %e,
                    code = outcome.code,
                    "Destination request failed"
                );
                metrics::record_relay(outcome.code, start);
                return outcome;
            }
        };

        let status = response.status();
        let outcome = match response.bytes().await {
            Ok(body) => ProxyOutcome::from_status(status, Some(body)),
            Err(e) => {
                tracing::warn!(
                    destination = %self.destination,
                    status = %status,
                    error = %e,
                    "Could not read destination response body"
                );
                ProxyOutcome::body_read_failure()
            }
        };

        tracing::debug!(outcome = %outcome, "Destination responded");
        metrics::record_relay(outcome.code, start);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeaderConfig;

    fn config() -> RelayConfig {
        RelayConfig {
            destination: "https://downstream.example.com/ingest".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insecure_requires_debug() {
        let mut config = config();
        config.insecure = true;
        assert!(matches!(
            ProxyRelay::new(&config, false, None),
            Err(RelayError::InsecureWithoutDebug)
        ));
        assert!(ProxyRelay::new(&config, true, None).is_ok());
    }

    #[test]
    fn test_rejects_bad_destination() {
        let mut config = config();
        config.destination = "not a url".into();
        assert!(matches!(
            ProxyRelay::new(&config, false, None),
            Err(RelayError::Destination { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_static_header() {
        let mut config = config();
        config.headers.push(HeaderConfig {
            name: "bad name".into(),
            value: "x".into(),
        });
        assert!(matches!(ProxyRelay::new(&config, false, None), Err(RelayError::Header(_))));
    }
}

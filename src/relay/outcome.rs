//! Relay outcome classification.
//!
//! # Classification Order
//! 1. No response obtained → 500 "No response from remote server"
//! 2. Transport error that still carries a downstream status → that status
//! 3. Body read failure → 501 "failure", whatever the status line said
//! 4. Otherwise → downstream status, reason phrase and body

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{json, Value};

pub const NO_RESPONSE_STATUS: &str = "No response from remote server";
pub const BODY_READ_FAILURE_STATUS: &str = "failure";

/// Normalized result of one relay attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOutcome {
    pub code: u16,
    pub status: String,
    pub body: Option<Bytes>,
}

impl ProxyOutcome {
    pub fn no_response() -> Self {
        Self {
            code: 500,
            status: NO_RESPONSE_STATUS.to_string(),
            body: None,
        }
    }

    pub fn body_read_failure() -> Self {
        Self {
            code: 501,
            status: BODY_READ_FAILURE_STATUS.to_string(),
            body: None,
        }
    }

    /// Outcome carrying the downstream status line.
    ///
    /// Codes without a standard reason phrase use the numeric code as status.
    pub fn from_status(status: StatusCode, body: Option<Bytes>) -> Self {
        Self {
            code: status.as_u16(),
            status: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string()),
            body,
        }
    }

    /// Classify a failed send.
    pub fn from_send_error(err: &reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::from_status(status, None),
            None => Self::no_response(),
        }
    }

    /// 2xx downstream code with a non-empty body.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code) && self.body.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// Status and JSON body returned to the original caller.
    ///
    /// The downstream body is never echoed; callers only learn pass/fail.
    pub fn caller_reply(&self) -> (StatusCode, Value) {
        if self.is_success() {
            let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
            (status, json!({ "success": true }))
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": self.status }))
        }
    }
}

impl std::fmt::Display for ProxyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "status: [{}] status code: [{}] body bytes: [{}]",
            self.status,
            self.code,
            self.body.as_ref().map_or(0, Bytes::len)
        )
    }
}

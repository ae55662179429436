//! Response construction.
//!
//! # Responsibilities
//! - Map relay outcomes to the caller-facing status and body
//! - Shape error replies as `{"error": "<text>"}`
//! - Serve already-encoded JSON without re-parsing it
//!
//! # Design Decisions
//! - The downstream body is never echoed to the `/xml2json` caller
//! - Raw transport errors never reach the caller, only normalized text

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::relay::ProxyOutcome;

/// JSON body paired with its status, kept for debug capture before sending.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonReply {
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    pub fn from_outcome(outcome: &ProxyOutcome) -> Self {
        let (status, body) = outcome.caller_reply();
        Self { status, body }
    }
}

impl IntoResponse for JsonReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 200 response carrying JSON text produced elsewhere.
pub fn raw_json(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

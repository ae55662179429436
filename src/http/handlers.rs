//! Endpoint handlers.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::convert::{EventDocument, JsonObject};
use crate::http::request::request_id;
use crate::http::response::{raw_json, JsonReply};
use crate::http::server::AppState;
use crate::http::shipment::{ShipmentRecord, UploadResponse};
use crate::observability::metrics;
use crate::relay::capture::ArtifactKind;

const MALFORMED_DOCUMENT: &str = "malformed event document";
const EMPTY_STRING: &str = "empty string";

/// Decode, convert and log one inbound payload.
fn convert_body(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Option<JsonObject> {
    let doc = match EventDocument::from_slice(body) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(request_id = %request_id(headers), error = %e, "Rejecting inbound payload");
            return None;
        }
    };

    tracing::debug!(
        request_id = %request_id(headers),
        document_id = %doc.document_id,
        workflow_id = %doc.workflow_id,
        classification = %doc.classification,
        fields = doc.fields.len(),
        "Decoded event document"
    );

    let object = state.engine.project(&doc);
    metrics::record_conversion(object.len());
    Some(object)
}

/// `POST /xml2json`: convert and relay downstream.
pub async fn xml2json(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start = Instant::now();
    let ticket = state.capture.as_ref().map(|sink| sink.begin());
    if let (Some(sink), Some(ticket)) = (&state.capture, &ticket) {
        sink.record(ticket, ArtifactKind::Inbound, Some(&headers), body.clone());
    }

    let reply = match convert_body(&state, &headers, &body) {
        Some(object) => {
            let outcome = state
                .relay
                .relay(object.to_json_string(), &headers, ticket.as_ref())
                .await;
            tracing::info!(
                request_id = %request_id(&headers),
                outcome = %outcome,
                "Relay finished"
            );
            JsonReply::from_outcome(&outcome)
        }
        None => JsonReply::error(StatusCode::BAD_REQUEST, MALFORMED_DOCUMENT),
    };

    if let (Some(sink), Some(ticket)) = (&state.capture, &ticket) {
        sink.record(
            ticket,
            ArtifactKind::Response,
            None,
            Bytes::from(reply.body.to_string()),
        );
    }

    metrics::record_request("/xml2json", reply.status.as_u16(), start);
    reply.into_response()
}

/// `POST /convert`: convert only and return the JSON.
pub async fn convert(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start = Instant::now();
    let response = match convert_body(&state, &headers, &body) {
        Some(object) => raw_json(object.to_json_string()),
        None => JsonReply::error(StatusCode::BAD_REQUEST, MALFORMED_DOCUMENT).into_response(),
    };
    metrics::record_request("/convert", response.status().as_u16(), start);
    response
}

/// `POST /reflect`: echo the body.
pub async fn reflect(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Bytes {
    let start = Instant::now();
    if let Some(sink) = &state.capture {
        let ticket = sink.begin();
        sink.record(&ticket, ArtifactKind::Reflect, None, body.clone());
    }
    tracing::debug!(request_id = %request_id(&headers), bytes = body.len(), "Reflecting request body");
    metrics::record_request("/reflect", 200, start);
    body
}

/// File name prefix of stored shipment records.
const UPLOAD_PREFIX: &str = "parsifal";

/// `POST /parsifal`: store one shipment record in a timestamped file.
pub async fn parsifal(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Json<UploadResponse> {
    let start = Instant::now();
    let record = ShipmentRecord::decode(&body);
    tracing::debug!(request_id = %request_id(&headers), record = ?record, "Received shipment record");

    let reply = match state.uploads.write_stamped(UPLOAD_PREFIX, format!("{:?}\n", record)).await {
        Ok(path) => {
            tracing::info!(request_id = %request_id(&headers), path = %path.display(), "Stored shipment record");
            UploadResponse::stored()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id(&headers), error = %e, "Could not store shipment record");
            UploadResponse::failed(e)
        }
    };

    metrics::record_request("/parsifal", 200, start);
    Json(reply)
}

#[derive(Debug, Default, Deserialize)]
pub struct StringRequest {
    #[serde(default)]
    pub s: String,
}

impl StringRequest {
    /// Malformed bodies read as the empty string.
    fn decode(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Could not decode string request");
            Self::default()
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub v: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub v: usize,
}

#[derive(Debug, Serialize)]
pub struct ReverseResponse {
    pub s: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<&'static str>,
}

/// `POST /uppercase`
pub async fn uppercase(body: Bytes) -> Json<ValueResponse> {
    let start = Instant::now();
    let req = StringRequest::decode(&body);
    let reply = if req.s.is_empty() {
        ValueResponse {
            v: String::new(),
            err: Some(EMPTY_STRING),
        }
    } else {
        ValueResponse {
            v: req.s.to_uppercase(),
            err: None,
        }
    };
    metrics::record_request("/uppercase", 200, start);
    Json(reply)
}

/// `POST /count`
pub async fn count(body: Bytes) -> Json<CountResponse> {
    let start = Instant::now();
    let req = StringRequest::decode(&body);
    metrics::record_request("/count", 200, start);
    Json(CountResponse {
        v: req.s.chars().count(),
    })
}

/// `POST /reverse`
pub async fn reverse(body: Bytes) -> Json<ReverseResponse> {
    let start = Instant::now();
    let req = StringRequest::decode(&body);
    let reply = if req.s.is_empty() {
        ReverseResponse {
            s: String::new(),
            err: Some(EMPTY_STRING),
        }
    } else {
        let reversed: String = req.s.chars().rev().collect();
        tracing::debug!(input = %req.s, output = %reversed, "Reversed a string");
        ReverseResponse {
            s: reversed,
            err: None,
        }
    };
    metrics::record_request("/reverse", 200, start);
    Json(reply)
}

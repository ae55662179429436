//! Outbound header construction.
//!
//! # Responsibilities
//! - Set the fixed JSON content negotiation and standard headers
//! - Add operator-configured static headers
//! - Copy only allow-listed headers from the inbound request
//!
//! Every other inbound header (cookies, forwarding headers, request IDs) is
//! dropped at this boundary.

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_CHARSET, AUTHORIZATION, CONTENT_TYPE, DNT,
    USER_AGENT,
};
use thiserror::Error;

/// Vendor API-gateway subscription key header.
pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Inbound headers copied verbatim onto the outbound request.
pub fn forwarded_header_names() -> [HeaderName; 3] {
    [
        AUTHORIZATION,
        USER_AGENT,
        HeaderName::from_static(SUBSCRIPTION_KEY_HEADER),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid header {name}: {reason}")]
pub struct InvalidHeader {
    pub name: String,
    pub reason: String,
}

/// Parse operator-supplied `(name, value)` pairs.
pub fn parse_static_headers<'a, I>(pairs: I) -> Result<HeaderMap, InvalidHeader>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}

/// Build the header set for the outbound POST.
pub fn outbound_headers(inbound: &HeaderMap, static_headers: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
    headers.insert(DNT, HeaderValue::from_static("1"));

    for name in static_headers.keys() {
        headers.remove(name);
        for value in static_headers.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    for name in forwarded_header_names() {
        let mut values = inbound.get_all(&name).iter().peekable();
        if values.peek().is_none() {
            continue;
        }
        headers.remove(&name);
        for value in values {
            headers.append(name.clone(), value.clone());
        }
    }

    headers
}

/// Render headers as `Name [ v1 | v2 ]` lines for debug artifacts.
pub fn describe_headers(headers: &HeaderMap) -> String {
    if headers.is_empty() {
        return "\n no headers \n".to_string();
    }

    let mut out = String::new();
    for name in headers.keys() {
        out.push_str(name.as_str());
        out.push_str(" [");
        for (ix, value) in headers.get_all(name).iter().enumerate() {
            out.push_str(if ix == 0 { " " } else { " | " });
            out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        }
        out.push_str(" ]\n");
    }
    out
}

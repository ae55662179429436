//! Downstream relay subsystem.
//!
//! # Data Flow
//! ```text
//! converted JSON + inbound headers
//!     → headers.rs (fixed headers + allow-listed inbound headers)
//!     → client.rs (POST with a bounded deadline)
//!     → outcome.rs (normalize into {code, status, body})
//!     → caller reply ({"success":true} or {"error": status})
//!
//! Debug mode:
//!     capture.rs writes numbered request/response artifacts off the hot path
//! ```
//!
//! # Design Decisions
//! - No retries: a downstream failure is surfaced once, immediately
//! - Callers never see raw transport errors, only the normalized outcome
//! - A body that cannot be read is a failure regardless of status code

pub mod capture;
pub mod client;
pub mod headers;
pub mod outcome;

pub use capture::{ArtifactKind, CaptureSink, CaptureTicket};
pub use client::{ProxyRelay, RelayError};
pub use outcome::ProxyOutcome;

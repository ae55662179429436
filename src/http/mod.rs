//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, layers: request ID, trace, timeout, body limit)
//!     → handlers.rs
//!         /xml2json: decode → convert → relay → outcome reply
//!         /convert:  decode → convert → JSON reply
//!         /parsifal: decode shipment record → stamped file
//!         /reflect, /uppercase, /count, /reverse
//!     → response.rs (outcome → status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod shipment;

pub use request::{RequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (bind host:port)
//!     → tls.rs (optional: PEM checks, rustls config)
//!     → Hand off to HTTP layer (plain axum::serve or axum-server TLS)
//! ```
//!
//! # Design Decisions
//! - Certificate problems surface at startup, before the port is served
//! - TLS is optional and selected by the presence of both cert and key

pub mod listener;
pub mod tls;

pub use listener::{bind, ListenerError};
pub use tls::{load_tls_config, TlsError};

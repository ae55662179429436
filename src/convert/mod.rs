//! Conversion subsystem.
//!
//! # Data Flow
//! ```text
//! XML request body
//!     → document.rs (decode into EventDocument, field order preserved)
//!     → engine.rs (rename + type each field via the translation table)
//!     → json.rs (ordered object builder, number literal validation)
//!     → JSON text handed to the relay
//! ```
//!
//! # Design Decisions
//! - Conversion is a pure function of (document, table); safe to run concurrently
//! - Conversion never fails: bad values degrade to a defined fallback and are logged

pub mod document;
pub mod engine;
pub mod json;

pub use document::{DocumentError, EventDocument, EventField};
pub use engine::{ConversionEngine, DateLayouts, DOCUMENT_LINK_KEY};
pub use json::JsonObject;

//! Field translation subsystem.
//!
//! # Data Flow
//! ```text
//! translation file (xmlName;jsonName;type;omitEmpty)
//!     → table.rs (parse rows, reject duplicates)
//!     → TranslationTable (immutable)
//!     → shared via Arc with the conversion engine
//! ```
//!
//! # Design Decisions
//! - Table is built once at startup and never mutated
//! - A missing or unreadable file yields an empty table (every field passes through)
//! - Duplicate source names abort startup; every other bad row is skipped

pub mod rule;
pub mod table;

pub use rule::{FieldRule, FieldType};
pub use table::{TableFormat, TranslationError, TranslationTable};

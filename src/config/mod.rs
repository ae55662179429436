//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (cli.rs)
//!     → optional TOML file (loader.rs)
//!     → flag overrides applied on top
//!     → "localhost" destination resolved to our own /reflect
//!     → validation.rs (semantic checks, all errors reported)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, load_translation, ConfigError};
pub use schema::{
    CaptureConfig, ConversionConfig, HeaderConfig, LimitsConfig, ListenerConfig,
    ObservabilityConfig, RelayConfig, ServiceConfig, TranslationConfig,
};
pub use validation::ValidationError;

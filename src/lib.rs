//! XML event document to JSON conversion service library.

pub mod config;
pub mod convert;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;
pub mod translation;

pub use config::schema::ServiceConfig;
pub use convert::ConversionEngine;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::ProxyRelay;
pub use translation::TranslationTable;

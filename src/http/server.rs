//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to a plain or TLS listener
//! - Drain in-flight requests on shutdown

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request};
use axum::routing::post;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{LimitsConfig, ServiceConfig};
use crate::convert::ConversionEngine;
use crate::http::handlers;
use crate::http::request::{request_id, RequestUuid};
use crate::relay::{CaptureSink, ProxyRelay, RelayError};
use crate::translation::TranslationTable;

/// Grace period for in-flight TLS requests after shutdown is signalled.
const TLS_DRAIN_SECS: u64 = 30;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<ConversionEngine>,
    pub relay: Arc<ProxyRelay>,
    /// Present only in debug mode.
    pub capture: Option<Arc<CaptureSink>>,
    /// Destination of `/parsifal` uploads.
    pub uploads: Arc<CaptureSink>,
}

/// HTTP server for the conversion service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server from a validated configuration and a loaded table.
    pub fn new(config: &ServiceConfig, table: TranslationTable) -> Result<Self, RelayError> {
        let debug = config.observability.debug;
        let capture = debug.then(|| Arc::new(CaptureSink::new(&config.capture.directory)));
        if let Some(sink) = &capture {
            tracing::info!(directory = %sink.dir().display(), "Debug artifacts enabled");
        }

        let relay = ProxyRelay::new(&config.relay, debug, capture.clone())?;
        let engine = ConversionEngine::new(Arc::new(table), config.conversion.layouts());

        tracing::info!(
            destination = %relay.destination(),
            translations = engine.table().len(),
            "Conversion service configured"
        );

        let state = AppState {
            engine: Arc::new(engine),
            relay: Arc::new(relay),
            capture,
            uploads: Arc::new(CaptureSink::new(&config.capture.directory)),
        };
        let router = Self::build_router(&config.limits, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(limits: &LimitsConfig, state: AppState) -> Router {
        Router::new()
            .route("/xml2json", post(handlers::xml2json))
            .route("/convert", post(handlers::convert))
            .route("/parsifal", post(handlers::parsifal))
            .route("/reflect", post(handlers::reflect))
            .route("/uppercase", post(handlers::uppercase))
            .route("/count", post(handlers::count))
            .route("/reverse", post(handlers::reverse))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(limits.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
    }

    /// Router with all layers, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve plain HTTP until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS until `shutdown` resolves.
    pub async fn run_tls<F>(
        self,
        listener: TcpListener,
        tls: RustlsConfig,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown.await;
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        axum_server::from_tcp_rustls(listener.into_std()?, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

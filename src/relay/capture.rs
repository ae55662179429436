//! Debug traffic capture.
//!
//! In debug mode each relayed request gets one ticket: a UTC timestamp and a
//! sequence number handed out under a mutex. Artifacts for that request share
//! the ticket, e.g. `20240112230627_xmldbg007.log`. Writes happen on spawned
//! tasks and failures are only logged.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use axum::body::Bytes;
use axum::http::HeaderMap;
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::relay::headers::describe_headers;

/// Filename timestamp, unique to the second.
const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Kind of captured artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Inbound XML request.
    Inbound,
    /// Outbound JSON request to the destination.
    Outbound,
    /// Reply sent to the original caller.
    Response,
    /// Body posted to the reflect endpoint.
    Reflect,
}

impl ArtifactKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Inbound => "xmldbg",
            Self::Outbound => "outdbg",
            Self::Response => "xmlrspdbg",
            Self::Reflect => "rfldbg",
        }
    }
}

/// Name allocation for one captured request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTicket {
    stamp: String,
    seq: u64,
}

impl CaptureTicket {
    pub fn file_name(&self, kind: ArtifactKind) -> String {
        format!("{}_{}{:03}.log", self.stamp, kind.tag(), self.seq)
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Writes debug artifacts into one directory.
#[derive(Debug)]
pub struct CaptureSink {
    dir: PathBuf,
    counter: Mutex<u64>,
}

impl CaptureSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: Mutex::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allocate the next ticket. Holds the lock only for the increment.
    pub fn begin(&self) -> CaptureTicket {
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        let ticket = CaptureTicket {
            stamp: Utc::now().format(STAMP_FORMAT).to_string(),
            seq: *counter,
        };
        *counter += 1;
        ticket
    }

    /// Write one artifact in the background.
    pub fn record(
        &self,
        ticket: &CaptureTicket,
        kind: ArtifactKind,
        headers: Option<&HeaderMap>,
        body: Bytes,
    ) -> JoinHandle<()> {
        let name = ticket.file_name(kind);
        let path = self.dir.join(&name);
        let contents = render_artifact(&name, headers, &body);

        tokio::spawn(async move {
            match tokio::fs::write(&path, contents).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Saved debug artifact"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Could not save debug artifact");
                    metrics::record_capture_failure(kind.tag());
                }
            }
        })
    }

    /// Write `<prefix>.<stamp>.log.txt`, replacing any file of that name.
    ///
    /// Unlike `record`, the write is awaited so the caller can report failure.
    pub async fn write_stamped(&self, prefix: &str, contents: impl Into<Vec<u8>>) -> std::io::Result<PathBuf> {
        let stamp = Utc::now().format(STAMP_FORMAT);
        let path = self.dir.join(format!("{}.{}.log.txt", prefix, stamp));
        tokio::fs::write(&path, contents.into()).await?;
        tracing::debug!(path = %path.display(), "Saved upload");
        Ok(path)
    }
}

fn render_artifact(name: &str, headers: Option<&HeaderMap>, body: &[u8]) -> Vec<u8> {
    let mut out = format!("request {}\n", name).into_bytes();
    if let Some(headers) = headers {
        out.extend_from_slice(b"\t\tHEADERS\n");
        out.extend_from_slice(describe_headers(headers).as_bytes());
        out.extend_from_slice(b"\n\t\tBODY\n");
    }
    out.extend_from_slice(body);
    out.push(b'\n');
    out
}

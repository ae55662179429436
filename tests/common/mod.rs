//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use reflectsvc::config::ServiceConfig;
use reflectsvc::http::HttpServer;
use reflectsvc::lifecycle::Shutdown;
use reflectsvc::translation::TranslationTable;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

pub const EVENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<events>
  <event sequence="7">
    <generated>2024-01-12 23:06:27</generated>
    <document revision="1">
      <workflow_id>991</workflow_id>
      <document_id>555</document_id>
      <document_status>output</document_status>
      <number_of_pages>1</number_of_pages>
      <classification>Invoice</classification>
      <document_url>https://example.com/doc/555</document_url>
      <field_data>
        <field>
          <field_name>Invoice Number</field_name>
          <field_value>INV-555</field_value>
        </field>
        <field>
          <field_name>Invoice Total</field_name>
          <field_value>99.95</field_value>
        </field>
        <field>
          <field_name>Invoice Date</field_name>
          <field_value>03/15/2024</field_value>
        </field>
        <field>
          <field_name>Paid</field_name>
          <field_value>TRUE</field_value>
        </field>
        <field>
          <field_name>PO Number</field_name>
          <field_value></field_value>
        </field>
      </field_data>
    </document>
  </event>
</events>
"#;

pub const FIELD_TABLE: &str = "\
`field translations for the sample invoice
xmlName;jsonName;fieldType;omitEmpty
Invoice Number;invoiceNumber;string;false
Invoice Total;total;numeric;false
Invoice Date;invoiceDate;date;false
Paid;paid;boolean;false
PO Number;poNumber;string;true
";

pub fn field_table() -> TranslationTable {
    TranslationTable::parse(FIELD_TABLE, "test", &Default::default()).unwrap()
}

/// Address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Read one HTTP/1.1 request (head and Content-Length body) as text.
pub async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return String::from_utf8_lossy(&buf).into_owned();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn status_line(status: u16) -> String {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    format!("HTTP/1.1 {} {}", status, reason)
}

/// Start a programmable mock backend; every request is also sent on the
/// returned channel.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, mpsc::UnboundedReceiver<String>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let _ = tx.send(request);

                let (status, body) = f().await;
                let response = format!(
                    "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}

/// Backend answering every request with a fixed status and body.
pub async fn start_fixed_backend(
    status: u16,
    body: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    start_programmable_backend(move || async move { (status, body.to_string()) }).await
}

/// Backend that promises more body than it sends, then hangs up.
pub async fn start_truncating_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request(&mut socket).await;
                let response = "HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n{\"partial\":";
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Backend that reads the request and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request(&mut socket).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    addr
}

/// Config pointing at `destination`, listening on an ephemeral port.
pub fn service_config(destination: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.relay.destination = destination.to_string();
    config
}

/// Bind an ephemeral port, finish the config for it and serve in the background.
///
/// A `localhost` destination resolves to the bound port.
pub async fn spawn_service(mut config: ServiceConfig, table: TranslationTable) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.port = addr.port();
    config.resolve_destination();

    let server = HttpServer::new(&config, table).unwrap();
    let shutdown = Shutdown::new();
    let signalled = shutdown.signalled();
    tokio::spawn(async move {
        let _ = server.run(listener, signalled).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

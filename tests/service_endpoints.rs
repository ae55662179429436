//! End-to-end behavior of the HTTP endpoints.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reflectsvc::http::HttpServer;
use reflectsvc::translation::TranslationTable;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_xml2json_relays_converted_document() {
    let (backend, mut requests) = common::start_fixed_backend(201, r#"{"id":1}"#).await;
    let config = common::service_config(&format!("http://{}/ingest", backend));
    let (addr, shutdown) = common::spawn_service(config, common::field_table()).await;

    let res = common::client()
        .post(format!("http://{}/xml2json", addr))
        .header("authorization", "Bearer abc")
        .header("cookie", "session=1")
        .body(common::EVENT_XML)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let request = requests.recv().await.unwrap();
    assert!(request.contains("Bearer abc"));
    assert!(!request.to_ascii_lowercase().contains("cookie:"));
    let json_start = request.find("\r\n\r\n").unwrap() + 4;
    assert_eq!(
        &request[json_start..],
        r#"{"documentLink":"https://example.com/doc/555","invoiceNumber":"INV-555","total":99.95,"invoiceDate":"2024-03-15","paid":true}"#
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_xml2json_downstream_failure() {
    let (backend, _requests) = common::start_fixed_backend(503, "maintenance").await;
    let config = common::service_config(&format!("http://{}/ingest", backend));
    let (addr, shutdown) = common::spawn_service(config, common::field_table()).await;

    let res = common::client()
        .post(format!("http://{}/xml2json", addr))
        .body(common::EVENT_XML)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Service Unavailable" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_xml2json_unreachable_destination() {
    let unused = common::unused_addr().await;
    let config = common::service_config(&format!("http://{}/ingest", unused));
    let (addr, shutdown) = common::spawn_service(config, TranslationTable::empty()).await;

    let res = common::client()
        .post(format!("http://{}/xml2json", addr))
        .body(common::EVENT_XML)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "No response from remote server");

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_xml_never_reaches_destination() {
    let (backend, mut requests) = common::start_fixed_backend(200, "{}").await;
    let config = common::service_config(&format!("http://{}/ingest", backend));
    let (addr, shutdown) = common::spawn_service(config, TranslationTable::empty()).await;

    let res = common::client()
        .post(format!("http://{}/xml2json", addr))
        .body("<events><event>")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "malformed event document" }));
    assert!(requests.try_recv().is_err());

    shutdown.trigger();
}

#[tokio::test]
async fn test_relay_to_own_reflect_endpoint() {
    let config = common::service_config("localhost");
    let (addr, shutdown) = common::spawn_service(config, common::field_table()).await;

    let res = common::client()
        .post(format!("http://{}/xml2json", addr))
        .body(common::EVENT_XML)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_debug_artifacts_written() {
    let dir = tempfile::tempdir().unwrap();
    let (backend, _requests) = common::start_fixed_backend(200, "{}").await;
    let mut config = common::service_config(&format!("http://{}/ingest", backend));
    config.observability.debug = true;
    config.capture.directory = dir.path().to_path_buf();
    let (addr, shutdown) = common::spawn_service(config, common::field_table()).await;

    let res = common::client()
        .post(format!("http://{}/xml2json", addr))
        .body(common::EVENT_XML)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let expected = ["_xmldbg000.log", "_outdbg000.log", "_xmlrspdbg000.log"];
    let mut names = Vec::new();
    for _ in 0..50 {
        names = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        if expected.iter().all(|suffix| names.iter().any(|n| n.ends_with(suffix))) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    for suffix in expected {
        assert!(names.iter().any(|n| n.ends_with(suffix)), "missing {} in {:?}", suffix, names);
    }

    shutdown.trigger();
}

fn router() -> axum::Router {
    let config = common::service_config("http://127.0.0.1:9/unused");
    HttpServer::new(&config, common::field_table()).unwrap().router()
}

async fn post(path: &str, body: &'static str) -> (StatusCode, Vec<u8>) {
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn post_json(path: &str, body: &'static str) -> Value {
    let (status, bytes) = post(path, body).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_convert_endpoint() {
    let (status, bytes) = post("/convert", common::EVENT_XML).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["documentLink"], "https://example.com/doc/555");
    assert_eq!(body["total"], json!(99.95));
    assert_eq!(body["paid"], json!(true));
    assert!(body.get("poNumber").is_none());

    let (status, _) = post("/convert", "<events><event>").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reflect_echoes_body() {
    let (status, bytes) = post("/reflect", "anything at all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"anything at all");
}

#[tokio::test]
async fn test_string_endpoints() {
    assert_eq!(post_json("/uppercase", r#"{"s":"hello"}"#).await, json!({ "v": "HELLO" }));
    assert_eq!(
        post_json("/uppercase", r#"{"s":""}"#).await,
        json!({ "v": "", "err": "empty string" })
    );
    assert_eq!(post_json("/count", r#"{"s":"héllo"}"#).await, json!({ "v": 5 }));
    assert_eq!(post_json("/reverse", r#"{"s":"abc"}"#).await, json!({ "s": "cba" }));
    assert_eq!(
        post_json("/reverse", "{not json").await,
        json!({ "s": "", "err": "empty string" })
    );
    assert_eq!(post_json("/count", "{not json").await, json!({ "v": 0 }));
}

async fn upload(config: &reflectsvc::config::ServiceConfig, body: &'static str) -> Value {
    let response = HttpServer::new(config, TranslationTable::empty())
        .unwrap()
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/parsifal")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_parsifal_stores_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::service_config("http://127.0.0.1:9/unused");
    config.capture.directory = dir.path().to_path_buf();

    let body = upload(&config, r#"{"File Number":"F-77","Origin City":"Boise","SP Bill Amount":"410.00"}"#).await;
    assert_eq!(body, json!({ "success": "Success" }));

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("parsifal.") && name.ends_with(".log.txt"), "{}", name);
    let stored = std::fs::read_to_string(&files[0]).unwrap();
    assert!(stored.contains("F-77"));
    assert!(stored.contains("Boise"));
    assert!(stored.ends_with('\n'));
}

#[tokio::test]
async fn test_parsifal_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::service_config("http://127.0.0.1:9/unused");
    config.capture.directory = dir.path().join("missing");

    let body = upload(&config, "{not json").await;
    assert_eq!(body["success"], "FAILURE");
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = post("/validate", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

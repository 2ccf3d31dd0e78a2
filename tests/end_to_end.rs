//! End-to-end tests over a real socket.

use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use otlp_server::net::{self, ListenerError};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_export_over_http() {
    let log_dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::spawn_server(log_dir.path()).await;
    let client = client();

    let health: Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("server unreachable")
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["endpoint"], "/v1/traces");

    let payload = json!({"resourceSpans": [{
        "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "web"}}]},
        "scopeSpans": [{"scope": {"name": "fetch"}, "spans": [{
            "traceId": "5b8efff798038103d269b633813fc60c",
            "spanId": "eee19b7ec3c1b174",
            "name": "GET /",
            "startTimeUnixNano": "1000000000",
            "endTimeUnixNano": "1050000000"
        }]}]
    }]});
    let response = client
        .post(format!("http://{addr}/v1/traces"))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));

    let dumps: Vec<_> = std::fs::read_dir(log_dir.path()).unwrap().collect();
    assert_eq!(dumps.len(), 1);

    shutdown.trigger();
}

/// Write a raw request and read the response until the server closes.
async fn exchange(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("server did not answer")
        .unwrap();
    String::from_utf8_lossy(&raw).into_owned()
}

#[tokio::test]
async fn test_chunked_body_without_content_length_is_persisted() {
    let log_dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::spawn_server(log_dir.path()).await;

    let text = exchange(
        addr,
        b"POST /v1/traces HTTP/1.1\r\n\
          Host: localhost\r\n\
          Content-Type: application/json\r\n\
          Transfer-Encoding: chunked\r\n\
          Connection: close\r\n\r\n\
          a\r\n{\"resource\r\n\
          a\r\nSpans\":[]}\r\n\
          0\r\n\r\n",
    )
    .await;

    assert!(text.starts_with("HTTP/1.1 200 OK"));
    assert!(text.ends_with(r#"{"status":"ok"}"#));

    let dumps: Vec<_> = std::fs::read_dir(log_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(dumps.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&dumps[0]).unwrap(),
        "{\n  \"resourceSpans\": []\n}"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_unframed_request_gets_empty_body_answer() {
    let log_dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::spawn_server(log_dir.path()).await;

    let text = exchange(
        addr,
        b"POST /v1/traces HTTP/1.1\r\n\
          Host: localhost\r\n\
          Content-Type: application/json\r\n\
          Connection: close\r\n\r\n",
    )
    .await;

    assert!(text.starts_with("HTTP/1.1 200 OK"));
    assert!(text.to_ascii_lowercase().contains("access-control-max-age: 3600"));
    assert!(text.ends_with(r#"{"status":"ok","message":"Empty body"}"#));
    assert_eq!(std::fs::read_dir(log_dir.path()).unwrap().count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_busy_port_refuses_to_start() {
    let log_dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::spawn_server(log_dir.path()).await;

    let mut config = common::config_for(log_dir.path()).listener;
    config.port = addr.port();

    let err = net::bind(&config).await.unwrap_err();
    assert!(matches!(err, ListenerError::AddrInUse { .. }));

    shutdown.trigger();
}

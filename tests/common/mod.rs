//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use otlp_server::{HttpServer, ServerConfig};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

/// A router whose trace dumps land in a fresh temporary directory.
pub struct TestApp {
    pub router: Router,
    pub log_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage_at(Path::to_path_buf)
    }

    /// Like `new`, but dumps go to `storage_dir(<temp root>)`.
    pub fn with_storage_at(storage_dir: impl FnOnce(&Path) -> PathBuf) -> Self {
        let log_dir = tempfile::tempdir().unwrap();
        let mut config = config_for(log_dir.path());
        config.storage.log_dir = storage_dir(log_dir.path());
        let server = HttpServer::new(config);
        Self {
            router: server.router(),
            log_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Files written to the log directory so far.
    pub fn dumps(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.log_dir.path()) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn config_for(log_dir: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1".into();
    config.storage.log_dir = log_dir.to_path_buf();
    config
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn post_traces(content_type: &str, body: impl Into<Body>, content_length: Option<usize>) -> Request<Body> {
    let mut builder = Request::post("/v1/traces").header("content-type", content_type);
    if let Some(len) = content_length {
        builder = builder.header("content-length", len);
    }
    builder.body(body.into()).unwrap()
}

/// Start a real server on an ephemeral port.
pub async fn spawn_server(log_dir: &Path) -> (SocketAddr, otlp_server::Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = otlp_server::Shutdown::new();
    let server = HttpServer::new(config_for(log_dir));
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

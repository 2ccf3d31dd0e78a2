//! Request handler: routing, body acquisition and content-type dispatch.
//!
//! ```text
//! OPTIONS *              → 200 preflight
//! GET / | /health        → 200 health
//! GET other, POST other  → 404
//! POST /v1/traces        → read body → dispatch on Content-Type → 200
//! anything else          → 501
//! ```

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{Method, Request},
    response::Response,
};
use serde_json::Value;
use std::net::SocketAddr;

use crate::http::request::{content_type, declared_length, read_body, request_id};
use crate::http::response::{self, TRACES_PATH};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::otlp::{log_report, render_report, TracePayload};

const HEX_PREVIEW_CHARS: usize = 100;
const RAW_PREVIEW_BYTES: usize = 200;

/// How a trace body is treated, chosen by `Content-Type` substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Protobuf,
    Other,
}

impl BodyKind {
    pub fn classify(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("application/json") {
            Self::Json
        } else if content_type.contains("application/x-protobuf")
            || content_type.contains("application/octet-stream")
        {
            Self::Protobuf
        } else {
            Self::Other
        }
    }
}

/// Entry point for every request.
pub async fn handle_request(State(state): State<AppState>, request: Request<Body>) -> Response {
    if let Some(ConnectInfo(peer)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        tracing::debug!(peer = %peer, "New request from client");
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let req_id = request_id(request.headers()).to_string();

    if method == Method::OPTIONS {
        tracing::info!(request_id = %req_id, path = %path, headers = ?request.headers(), "Received OPTIONS request");
        metrics::record_request("preflight", "ok");
        return response::preflight();
    }

    if method == Method::GET {
        if path == "/" || path == "/health" {
            metrics::record_request("health", "ok");
            return response::health();
        }
        return route_not_found(&req_id, &path);
    }

    if method == Method::POST {
        if path == TRACES_PATH {
            return receive_traces(&state, &req_id, request).await;
        }
        return route_not_found(&req_id, &path);
    }

    tracing::warn!(request_id = %req_id, method = %method, path = %path, "Unsupported method");
    metrics::record_request("unknown", "unsupported_method");
    response::unsupported_method()
}

fn route_not_found(req_id: &str, path: &str) -> Response {
    tracing::warn!(request_id = %req_id, path = %path, "404: path not found");
    metrics::record_request("unknown", "not_found");
    response::not_found()
}

async fn receive_traces(state: &AppState, req_id: &str, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let content_type = content_type(&parts.headers).to_string();
    let declared = declared_length(&parts.headers);

    tracing::info!(
        request_id = %req_id,
        content_type = %content_type,
        content_length = ?declared,
        headers = ?parts.headers,
        "Received POST request to {}",
        TRACES_PATH
    );

    let body = match read_body(body, declared, state.config.limits.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(request_id = %req_id, error = %e, "Error reading request body");
            metrics::record_request("traces", "read_error");
            return response::read_failed();
        }
    };

    if declared.is_none() {
        if body.is_empty() {
            tracing::warn!(request_id = %req_id, "Empty request body received");
            metrics::record_request("traces", "empty");
            return response::empty_body();
        }
        tracing::info!(
            request_id = %req_id,
            bytes = body.len(),
            "Read body without Content-Length header (likely sendBeacon)"
        );
    }

    tracing::info!(request_id = %req_id, bytes = body.len(), "Successfully read body");
    metrics::record_payload_size(body.len());

    match BodyKind::classify(&content_type) {
        BodyKind::Json => {
            if let Err(e) = process_json(state, &body).await {
                tracing::error!(request_id = %req_id, error = %e, "Error processing request");
                metrics::record_request("traces", "decode_error");
                return response::processing_failed(e);
            }
        }
        BodyKind::Protobuf => {
            tracing::info!("Received Protobuf data (not decoded, showing hex):");
            tracing::info!("  {}", hex_preview(&body));
        }
        BodyKind::Other => {
            tracing::info!("Received data with unknown content type: {}", content_type);
            tracing::info!("  First {} bytes: {}", RAW_PREVIEW_BYTES, raw_preview(&body));
        }
    }

    metrics::record_request("traces", "ok");
    tracing::debug!(request_id = %req_id, "Response sent successfully");
    response::accepted()
}

/// Decode, report and persist a JSON payload. Only decoding can fail;
/// persistence problems are logged here and never reach the client.
async fn process_json(state: &AppState, body: &Bytes) -> Result<(), serde_json::Error> {
    let raw: Value = serde_json::from_slice(body)?;

    let payload = TracePayload::from_json(&raw);
    log_report(&render_report(&payload, &raw));
    metrics::record_spans(payload.span_count());

    if let Some(store) = &state.store {
        if let Err(e) = store.persist(&raw).await {
            tracing::error!(
                error = %e,
                dir = %store.dir().display(),
                "Failed to save trace data to file"
            );
            metrics::record_persist_failure();
        }
    }

    Ok(())
}

/// Hex of the leading bytes, at most 100 hex characters.
pub fn hex_preview(body: &[u8]) -> String {
    let shown = &body[..body.len().min(HEX_PREVIEW_CHARS / 2)];
    let hex = hex::encode(shown);
    if shown.len() < body.len() {
        format!("{hex}...")
    } else {
        hex
    }
}

/// Escaped text of the first 200 bytes.
pub fn raw_preview(body: &[u8]) -> String {
    let shown = &body[..body.len().min(RAW_PREVIEW_BYTES)];
    format!("{:?}", String::from_utf8_lossy(shown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_substring() {
        assert_eq!(BodyKind::classify("application/json"), BodyKind::Json);
        assert_eq!(BodyKind::classify("application/json; charset=utf-8"), BodyKind::Json);
        assert_eq!(BodyKind::classify("Application/JSON"), BodyKind::Json);
        assert_eq!(BodyKind::classify("application/x-protobuf"), BodyKind::Protobuf);
        assert_eq!(BodyKind::classify("application/octet-stream"), BodyKind::Protobuf);
        assert_eq!(BodyKind::classify("text/plain"), BodyKind::Other);
        assert_eq!(BodyKind::classify(""), BodyKind::Other);
    }

    #[test]
    fn test_hex_preview_truncates_at_100_chars() {
        assert_eq!(hex_preview(&[0x0a, 0xff]), "0aff");

        let long = vec![0xab; 80];
        let preview = hex_preview(&long);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));

        assert_eq!(hex_preview(&[0x01; 50]).len(), 100);
    }

    #[test]
    fn test_raw_preview_caps_at_200_bytes() {
        let body = vec![b'a'; 300];
        assert_eq!(raw_preview(&body), format!("\"{}\"", "a".repeat(200)));
        assert_eq!(raw_preview(b"line\nbreak"), "\"line\\nbreak\"");
    }
}

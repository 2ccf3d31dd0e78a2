//! Response envelopes and response headers.
//!
//! # Responsibilities
//! - Build the JSON bodies the receiver answers with
//! - Attach CORS headers and `Content-Type: application/json` to every response
//!
//! # Design Decisions
//! - Trace submissions are always answered 200; failures are reported in
//!   the `status`/`error` fields so instrumented clients never retry
//! - Only routing mismatches produce 404

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

pub const SERVICE_NAME: &str = "otlp-server";
pub const TRACES_PATH: &str = "/v1/traces";

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Accept";
const MAX_AGE: &str = "3600";

/// Body of health responses.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub service: &'static str,
    pub endpoint: &'static str,
}

/// Body of trace submission responses.
#[derive(Debug, Serialize)]
pub struct SubmissionBody {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of routing errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Apply the CORS and content-type headers to every route of `router`.
pub fn with_default_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
}

/// CORS preflight: 200 with no body.
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}

pub fn health() -> Response {
    Json(HealthBody {
        status: "ok",
        service: SERVICE_NAME,
        endpoint: TRACES_PATH,
    })
    .into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: "Not found" })).into_response()
}

pub fn unsupported_method() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ErrorBody { error: "Unsupported method" }),
    )
        .into_response()
}

fn submission(status: &'static str, message: Option<&'static str>, error: Option<String>) -> Response {
    Json(SubmissionBody { status, message, error }).into_response()
}

/// Payload received and handled.
pub fn accepted() -> Response {
    submission("ok", None, None)
}

/// No framing and nothing on the wire.
pub fn empty_body() -> Response {
    submission("ok", Some("Empty body"), None)
}

/// The body could not be read off the connection.
pub fn read_failed() -> Response {
    submission("ok", None, Some("Failed to read body".to_string()))
}

/// The body was read but could not be decoded.
pub fn processing_failed(error: impl ToString) -> Response {
    submission("error", None, Some(error.to_string()))
}

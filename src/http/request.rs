//! Request-side helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for log correlation
//! - Acquire the request body when framing may be missing
//!
//! # Body acquisition
//! A positive `Content-Length` means exactly that many bytes are taken from
//! the stream. Without one the stream is drained until the last chunk, which
//! under hyper means a `Transfer-Encoding: chunked` body. A request carrying
//! neither header has an empty body as far as HTTP/1.1 framing goes; any
//! bytes after its headers are parsed as the next request, so such a request
//! gets the empty-body answer. Either way the configured limit caps how much
//! is buffered.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Request},
};
use futures_util::StreamExt;
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns a fresh UUID v4 to every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request, `"unknown"` when none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Error type for body acquisition.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("failed to read request body: {0}")]
    Read(#[from] axum::Error),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Positive `Content-Length`, if one was sent. Zero, missing and
/// unparsable values all mean "no usable framing".
pub fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// `Content-Type` header value, empty when absent.
pub fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Read the body according to `declared` (see module docs).
pub async fn read_body(body: Body, declared: Option<usize>, limit: usize) -> Result<Bytes, BodyError> {
    if let Some(n) = declared {
        if n > limit {
            return Err(BodyError::TooLarge { limit });
        }
    }

    let mut stream = body.into_data_stream();
    let mut buf: Vec<u8> = Vec::with_capacity(declared.unwrap_or(0));

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        match declared {
            Some(n) => {
                let take = chunk.len().min(n - buf.len());
                buf.extend_from_slice(&chunk[..take]);
                if buf.len() == n {
                    break;
                }
            }
            None => {
                if buf.len() + chunk.len() > limit {
                    return Err(BodyError::TooLarge { limit });
                }
                buf.extend_from_slice(&chunk);
            }
        }
    }

    Ok(Bytes::from(buf))
}

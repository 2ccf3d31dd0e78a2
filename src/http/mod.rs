//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, CORS headers)
//!     → handler.rs (route, acquire body, dispatch on Content-Type)
//!         → request.rs (framing-tolerant body read)
//!         → otlp (report) + storage (dump) for JSON payloads
//!     → response.rs (JSON envelopes)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

//! OTLP/JSON trace decoding and reporting.
//!
//! # Data Flow
//! ```text
//! request body (JSON text)
//!     → serde_json::Value (order-preserving)
//!     → payload.rs (lenient typed view, defaults filled in)
//!     → render.rs (line-oriented report)
//!     → tracing sink
//! ```
//!
//! Protobuf bodies are never decoded here; the handler only hex-dumps them.

pub mod payload;
pub mod render;
pub mod value;

pub use payload::TracePayload;
pub use render::{log_report, render_report};
pub use value::{format_value, AttributeValue};

//! OTLP/HTTP trace receiver for local development.
//!
//! Accepts trace exports on `/v1/traces`, logs them as a readable report and
//! dumps every JSON payload to a timestamped file.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod otlp;
pub mod storage;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

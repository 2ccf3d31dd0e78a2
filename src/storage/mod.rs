//! Trace dump persistence.
//!
//! Each decoded JSON payload is written, pretty-printed, to
//! `<log_dir>/<YYYY-MM-DD_HH:MM:SS>.json` using local time. Two payloads
//! received in the same second share a file name; the later one wins.

pub mod writer;

pub use writer::{PersistError, TraceStore};

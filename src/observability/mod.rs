//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler, renderer, store
//!     → logging.rs (structured log events, one per report line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;

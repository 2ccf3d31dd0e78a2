//! Startup orchestration.
//!
//! Listener binding happens before this runs, so a busy port aborts startup
//! before anything is created on disk.

use std::net::SocketAddr;

use crate::config::ServerConfig;
use crate::storage::TraceStore;

/// Prepare the log directory and print the startup banner.
pub async fn announce(config: &ServerConfig, local_addr: SocketAddr) {
    if config.storage.enabled {
        let store = TraceStore::new(&config.storage.log_dir);
        if let Err(e) = store.ensure_dir().await {
            tracing::warn!(error = %e, "Trace log directory unavailable; dumps will be retried per request");
        }
    }

    let port = local_addr.port();
    tracing::info!("OTLP test server starting...");
    tracing::info!("Listening on http://{}", local_addr);
    tracing::info!("OTLP traces endpoint: http://localhost:{}/v1/traces", port);
    tracing::info!("Health check: http://localhost:{}/health", port);
    if config.storage.enabled {
        tracing::info!("Trace logs directory: {}", config.storage.log_dir.display());
    } else {
        tracing::info!("Trace persistence disabled");
    }
    tracing::info!("Press Ctrl+C to stop the server");
    tracing::info!("{}", "=".repeat(80));
    tracing::info!("Waiting for connections...");
}

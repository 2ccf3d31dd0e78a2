//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured address and port
//! - Refuse to start when the port is already taken
//!
//! The OS reports an occupied port as `AddrInUse` on bind, so the bind
//! itself is the availability check.

use std::io::ErrorKind;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Another process holds the port.
    #[error("Port {port} is already in use: {source}")]
    AddrInUse {
        port: u16,
        source: std::io::Error,
    },

    /// `bind_address:port` is not a socket address.
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    /// Failed to bind for any other reason.
    #[error("Failed to bind: {0}")]
    Bind(std::io::Error),
}

/// Bind a listener for the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address = config.socket_address();
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| ListenerError::InvalidAddress(address.clone()))?;

    let listener = TcpListener::bind(addr).await.map_err(|e| match e.kind() {
        ErrorKind::AddrInUse => ListenerError::AddrInUse {
            port: config.port,
            source: e,
        },
        _ => ListenerError::Bind(e),
    })?;

    let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;
    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}

//! OTLP test server.
//!
//! # Architecture Overview
//!
//! ```text
//!   client ──▶ net::listener ──▶ http::server ──▶ http::handler
//!                                                      │
//!                                  ┌───────────────────┴───────────────┐
//!                                  ▼                                   ▼
//!                           otlp::render                      storage::writer
//!                       (report to the log)          ($TMPDIR/ecmaos/logs/*.json)
//! ```
//!
//! Point a browser client at it with
//! `VITE_OPENTELEMETRY_ENDPOINT=http://localhost:4318/v1/traces`.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use otlp_server::config::{load_config, validate_config, ServerConfig};
use otlp_server::lifecycle::{signals, startup, Shutdown};
use otlp_server::net::{self, ListenerError};
use otlp_server::observability::{init_logging, metrics};
use otlp_server::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "otlp-server")]
#[command(about = "OTLP test server that logs received traces", long_about = None)]
struct Cli {
    /// Port to listen on (default: 4318)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (default: 0.0.0.0)
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory receiving one JSON file per trace payload
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer command line flags over `config`.
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(log_dir) = self.log_dir {
            config.storage.log_dir = log_dir;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ServerConfig::default(),
    };
    let config = cli.apply(base);

    init_logging(&config.observability.log_level);

    if let Err(errors) = validate_config(&config) {
        for e in errors {
            tracing::error!("Invalid configuration: {}", e);
        }
        return ExitCode::FAILURE;
    }

    let listener = match net::bind(&config.listener).await {
        Ok(listener) => listener,
        Err(e @ ListenerError::AddrInUse { .. }) => {
            tracing::error!("{}", e);
            tracing::error!("Please stop the existing server or use a different port with --port");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let local_addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "Listener has no local address");
            return ExitCode::FAILURE;
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    startup::announce(&config, local_addr).await;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::forward_signals(shutdown.clone()));

    let server = HttpServer::new(config);
    if let Err(e) = server.run(listener, shutdown.subscribe()).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

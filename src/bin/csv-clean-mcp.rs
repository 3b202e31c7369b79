//! CSV Clean MCP Server - Main binary

use anyhow::Result;
use clap::Parser;
use csv_clean_mcp::config::TransportMode;
use csv_clean_mcp::resources::discover_datasets;
use csv_clean_mcp::transport::TransportFactory;
use csv_clean_mcp::{CsvCleaningServer, ServerConfig};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "csv-clean-mcp")]
#[command(about = "Model Context Protocol server for inspecting and cleaning CSV data")]
#[command(version)]
struct Cli {
    /// Transport mode: stdio, http, or both
    #[arg(long, value_enum, default_value = "stdio", env = "CSV_CLEAN_TRANSPORT")]
    transport: TransportMode,

    /// Host to bind to for HTTP transport
    #[arg(long, default_value = "localhost", env = "CSV_CLEAN_HOST")]
    host: String,

    /// Port to bind to for HTTP transport
    #[arg(long, default_value = "3000", env = "CSV_CLEAN_PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "CSV_CLEAN_LOG_LEVEL")]
    log_level: String,

    /// Enable debug logging (overrides --log-level)
    #[arg(long, env = "CSV_CLEAN_DEBUG")]
    debug: bool,

    /// Directory searched for relative CSV paths; repeat to add more (replaces the defaults)
    #[arg(long = "data-dir", env = "CSV_CLEAN_DATA_DIRS", value_delimiter = ',')]
    data_dirs: Vec<PathBuf>,

    /// Rows shown in tool result previews
    #[arg(long, default_value = "5", env = "CSV_CLEAN_PREVIEW_ROWS")]
    preview_rows: usize,

    /// Largest CSV input accepted, in megabytes
    #[arg(long, default_value = "50", env = "CSV_CLEAN_MAX_INPUT_MB")]
    max_input_mb: u64,

    /// Reject tool calls that write an output file
    #[arg(long, env = "CSV_CLEAN_READ_ONLY")]
    read_only: bool,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host,
            port: self.port,
            log_level: if self.debug {
                "debug".to_string()
            } else {
                self.log_level
            },
            transport: self.transport,
            search_dirs: if self.data_dirs.is_empty() {
                defaults.search_dirs
            } else {
                self.data_dirs
            },
            max_input_bytes: self.max_input_mb.saturating_mul(1024 * 1024),
            preview_rows: self.preview_rows,
            sample_rows: defaults.sample_rows,
            read_only: self.read_only,
        }
    }
}

fn init_tracing(config: &ServerConfig) {
    // stdout carries the MCP stream whenever stdio is in use
    if config.transport.uses_stdio() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .with(tracing_subscriber::EnvFilter::new(&config.log_level))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(tracing_subscriber::EnvFilter::new(&config.log_level))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config();
    init_tracing(&config);

    info!("Starting CSV Clean MCP Server v{}", csv_clean_mcp::VERSION);
    info!("Server configuration: {:?}", config);
    if let Ok(cwd) = std::env::current_dir() {
        info!("Working directory: {}", cwd.display());
    }
    let datasets = discover_datasets(&config.search_dirs);
    info!(
        "Available CSV files: {:?}",
        datasets.iter().map(|d| d.file_name.as_str()).collect::<Vec<_>>()
    );

    let server = CsvCleaningServer::new(config.clone());

    // Handle shutdown signals
    let shutdown_signal = async {
        match signal::ctrl_c().await {
            Ok(_) => info!("Received Ctrl+C, shutting down..."),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    };

    match config.transport {
        TransportMode::Stdio => {
            let transport = TransportFactory::create_stdio(server);
            tokio::select! {
                result = transport.start() => {
                    match result {
                        Ok(_) => info!("Stdio transport completed successfully"),
                        Err(e) => error!("Stdio transport error: {}", e),
                    }
                }
                _ = shutdown_signal => info!("Shutdown signal received, stopping stdio transport"),
            }
        }
        TransportMode::Http => {
            let transport = TransportFactory::create_http(&config.host, config.port, server);
            tokio::select! {
                result = transport.start() => {
                    if let Err(e) = result {
                        error!("HTTP transport error: {}", e);
                        return Err(e);
                    }
                }
                _ = shutdown_signal => info!("Shutdown signal received, stopping HTTP transport"),
            }
        }
        TransportMode::Both => {
            info!("Starting both stdio and HTTP transports");
            let stdio_transport = TransportFactory::create_stdio(server.clone());
            let http_transport = TransportFactory::create_http(&config.host, config.port, server);

            let stdio_task = tokio::spawn(async move {
                if let Err(e) = stdio_transport.start().await {
                    error!("Stdio transport error: {}", e);
                }
            });
            let http_task = tokio::spawn(async move {
                if let Err(e) = http_transport.start().await {
                    error!("HTTP transport error: {}", e);
                }
            });

            tokio::select! {
                _ = stdio_task => info!("Stdio transport task completed"),
                _ = http_task => info!("HTTP transport task completed"),
                _ = shutdown_signal => info!("Shutdown signal received, stopping all transports"),
            }
        }
    }

    info!("CSV Clean MCP Server shutdown complete");
    Ok(())
}

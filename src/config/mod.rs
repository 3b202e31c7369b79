//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Transport used to talk to MCP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Stdio,
    Http,
    Both,
}

impl TransportMode {
    pub fn uses_stdio(self) -> bool {
        matches!(self, Self::Stdio | Self::Both)
    }

    pub fn uses_http(self) -> bool {
        matches!(self, Self::Http | Self::Both)
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host (default: localhost)
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Log level (default: info)
    pub log_level: String,
    /// Transport mode (default: stdio)
    pub transport: TransportMode,
    /// Directories searched for relative CSV paths, in order
    pub search_dirs: Vec<PathBuf>,
    /// Largest CSV input accepted, in bytes
    pub max_input_bytes: u64,
    /// Rows shown in tool result previews
    pub preview_rows: usize,
    /// Rows included in `inspect_csv` sample data
    pub sample_rows: usize,
    /// Reject tool calls that write an output file
    pub read_only: bool,
}

impl ServerConfig {
    pub fn default_search_dirs() -> Vec<PathBuf> {
        [".", "./data", "../data", "./datasets"]
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            transport: TransportMode::Stdio,
            search_dirs: Self::default_search_dirs(),
            max_input_bytes: 50 * 1024 * 1024, // 50MB
            preview_rows: 5,
            sample_rows: 3,
            read_only: false,
        }
    }
}

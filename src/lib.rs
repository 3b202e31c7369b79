//! # CSV Clean MCP Server
//!
//! Model Context Protocol server that inspects and cleans CSV data: null
//! handling, deduplication, text standardization and row filtering, exposed
//! as MCP tools alongside dataset resources and cleaning prompts.

pub mod cleaning;
pub mod config;
pub mod error;
pub mod loader;
pub mod prompts;
pub mod resources;
pub mod security;
pub mod server;
pub mod table;
pub mod tools;
pub mod transport;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::CleanError;
pub use server::CsvCleaningServer;

/// Current version of the MCP server
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![allow(dead_code)]

use csv_clean_mcp::{CsvCleaningServer, ServerConfig};
use rmcp::model::CallToolResult;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test utilities for integration testing
pub mod test_utils {
    use super::*;

    /// Customers with a blank name, a missing age and one repeated row
    pub const CUSTOMERS: &str = "\
id,name,age,city
1,  alice smith ,34,Berlin
2,Bob,,paris
3,,29,Berlin
2,Bob,,paris
4,dana,41,Oslo
";

    /// A data directory holding `customers.csv`
    pub struct Fixture {
        pub dir: TempDir,
    }

    impl Fixture {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().expect("create temp dir");
            std::fs::write(dir.path().join("customers.csv"), CUSTOMERS).expect("write fixture");
            Self { dir }
        }

        pub fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        pub fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.path(name);
            std::fs::write(&path, content).expect("write fixture");
            path
        }

        pub fn config(&self) -> ServerConfig {
            ServerConfig {
                search_dirs: vec![self.dir.path().to_path_buf()],
                ..ServerConfig::default()
            }
        }

        pub fn server(&self) -> CsvCleaningServer {
            CsvCleaningServer::new(self.config())
        }

        pub fn read_only_server(&self) -> CsvCleaningServer {
            CsvCleaningServer::new(ServerConfig {
                read_only: true,
                ..self.config()
            })
        }
    }

    /// Concatenated text content of a tool result
    pub fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_error(result: &CallToolResult) -> bool {
        result.is_error == Some(true)
    }

    pub fn read(path: &Path) -> String {
        std::fs::read_to_string(path).expect("read output")
    }
}

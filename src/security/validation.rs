use std::path::PathBuf;

use crate::cleaning::split_columns;
use crate::error::{CleanError, Result};

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub allow_writes: bool,
    pub max_pattern_length: usize,
    pub max_columns: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_writes: true,
            max_pattern_length: 1000,
            max_columns: 1024,
        }
    }
}

/// Checks tool arguments before any table work starts
#[derive(Debug, Clone)]
pub struct InputValidator {
    config: ValidationConfig,
}

impl InputValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Parse an optional comma-separated column list; blank lists mean "all"
    pub fn columns(&self, columns: Option<&str>) -> Result<Option<Vec<String>>> {
        let Some(raw) = columns else {
            return Ok(None);
        };

        let names = split_columns(&sanitize(raw));
        if names.len() > self.config.max_columns {
            return Err(CleanError::Malformed(format!(
                "too many columns requested: {} > {}",
                names.len(),
                self.config.max_columns
            )));
        }
        Ok(if names.is_empty() { None } else { Some(names) })
    }

    pub fn output_path(&self, output_path: &str) -> Result<PathBuf> {
        if !self.config.allow_writes {
            return Err(CleanError::WritesDisabled);
        }

        let path = PathBuf::from(sanitize(output_path).trim());
        if path.as_os_str().is_empty() {
            return Err(CleanError::InvalidOutputPath {
                path,
                reason: "path is empty".to_string(),
            });
        }
        if path.is_dir() {
            return Err(CleanError::InvalidOutputPath {
                path,
                reason: "path is a directory".to_string(),
            });
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(CleanError::InvalidOutputPath {
                    reason: format!("directory {} does not exist", parent.display()),
                    path,
                });
            }
        }

        Ok(path)
    }

    pub fn pattern(&self, pattern: &str) -> Result<String> {
        if pattern.len() > self.config.max_pattern_length {
            return Err(CleanError::InvalidPattern {
                pattern: pattern.chars().take(32).collect(),
                message: format!(
                    "pattern too long: {} > {}",
                    pattern.len(),
                    self.config.max_pattern_length
                ),
            });
        }
        // Patterns reach the regex engine verbatim; control characters may be
        // exactly what the caller is searching for
        Ok(pattern.to_string())
    }
}

/// Strip NUL and carriage-return characters from client input
fn sanitize(input: &str) -> String {
    input.chars().filter(|&c| c != '\0' && c != '\r').collect()
}

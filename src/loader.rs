//! Resolving a `csv_path` argument into a table
//!
//! Clients pass either a file path or the CSV text itself. Relative paths are
//! looked up in the working directory first and then in each configured data
//! directory.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CleanError, Result};
use crate::table::Table;

/// Longest slice of the raw input echoed back in a load error
const ECHO_LIMIT: usize = 200;

/// Where a table was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    Inline,
    File(PathBuf),
}

impl fmt::Display for CsvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvSource::Inline => f.write_str("<inline CSV content>"),
            CsvSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub struct LoadedTable {
    pub table: Table,
    pub source: CsvSource,
}

#[derive(Debug, Clone)]
pub struct TableLoader {
    search_dirs: Vec<PathBuf>,
    max_input_bytes: u64,
}

impl TableLoader {
    pub fn new(search_dirs: Vec<PathBuf>, max_input_bytes: u64) -> Self {
        Self {
            search_dirs,
            max_input_bytes,
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn max_input_bytes(&self) -> u64 {
        self.max_input_bytes
    }

    pub fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_input_bytes {
            return Err(CleanError::InputTooLarge {
                size,
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }

    /// Load from a path or inline CSV text
    pub fn load(&self, input: &str) -> Result<LoadedTable> {
        self.check_size(input.len() as u64)?;

        if looks_inline(input) {
            match Table::parse_str(input) {
                Ok(table) => {
                    info!("Loaded CSV from string content with {} rows", table.row_count());
                    return Ok(LoadedTable {
                        table,
                        source: CsvSource::Inline,
                    });
                }
                Err(e) => debug!("Inline parse failed, trying as a path: {}", e),
            }
        }

        match self.load_file(input) {
            Ok(loaded) => Ok(loaded),
            Err(e @ CleanError::InputTooLarge { .. }) => Err(e),
            Err(e) => {
                if input.contains('\n') {
                    if let Ok(table) = Table::parse_str(input) {
                        info!("Loaded CSV from string content with {} rows", table.row_count());
                        return Ok(LoadedTable {
                            table,
                            source: CsvSource::Inline,
                        });
                    }
                }
                Err(CleanError::Load {
                    input: echo(input),
                    cause: e.to_string(),
                })
            }
        }
    }

    /// Find the file a relative path refers to
    pub fn resolve(&self, input: &str) -> PathBuf {
        self.resolve_from(std::env::current_dir().ok().as_deref(), input)
    }

    /// Working directory first, then each search directory in order
    fn resolve_from(&self, cwd: Option<&Path>, input: &str) -> PathBuf {
        let path = Path::new(input);
        if path.is_absolute() {
            return path.to_path_buf();
        }

        if let Some(full) = cwd.map(|dir| dir.join(path)).filter(|p| p.exists()) {
            return full;
        }

        self.search_dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| path.to_path_buf())
    }

    fn load_file(&self, input: &str) -> Result<LoadedTable> {
        let path = self.resolve(input);
        debug!("Attempting to read CSV from: {}", path.display());

        let metadata = std::fs::metadata(&path)?;
        self.check_size(metadata.len())?;

        let table = Table::from_reader(BufReader::new(File::open(&path)?))?;
        info!(
            "Loaded CSV from {} with {} rows",
            path.display(),
            table.row_count()
        );
        Ok(LoadedTable {
            table,
            source: CsvSource::File(path),
        })
    }
}

/// Multi-line input whose first line has a comma is treated as CSV text
fn looks_inline(input: &str) -> bool {
    input
        .split_once('\n')
        .is_some_and(|(first, _)| first.contains(','))
}

fn echo(input: &str) -> String {
    match input.char_indices().nth(ECHO_LIMIT) {
        Some((cut, _)) => format!("{}...", &input[..cut]),
        None => input.to_string(),
    }
}

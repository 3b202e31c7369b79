//! CSV files exposed as resources

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::DATASET_URI_PREFIX;
use crate::error::Result;
use crate::loader::TableLoader;

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    pub uri: String,
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl DatasetEntry {
    pub fn description(&self) -> String {
        let modified = self
            .modified
            .map(|m| m.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "CSV file at {} ({} bytes, modified {})",
            self.path.display(),
            self.size,
            modified
        )
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// List `*.csv` files directly inside each search directory.
///
/// A file name seen in an earlier directory shadows later ones, matching the
/// order relative paths are resolved in.
pub fn discover_datasets(search_dirs: &[PathBuf]) -> Vec<DatasetEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for dir in search_dirs {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                debug!("Skipping data directory {}: {}", dir.display(), e);
                continue;
            }
        };

        let mut found: Vec<DatasetEntry> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_csv(path))
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                let metadata = match std::fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!("Cannot stat {}: {}", path.display(), e);
                        return None;
                    }
                };
                Some(DatasetEntry {
                    uri: format!("{DATASET_URI_PREFIX}{file_name}"),
                    file_name,
                    size: metadata.len(),
                    modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                    path,
                })
            })
            .collect();
        found.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        for entry in found {
            if seen.insert(entry.file_name.clone()) {
                entries.push(entry);
            }
        }
    }

    entries
}

/// Content of the dataset behind `uri`, or `None` when no such dataset exists
pub fn read_dataset(loader: &TableLoader, uri: &str) -> Result<Option<String>> {
    let Some(file_name) = uri.strip_prefix(DATASET_URI_PREFIX) else {
        return Ok(None);
    };

    let Some(entry) = discover_datasets(loader.search_dirs())
        .into_iter()
        .find(|e| e.file_name == file_name)
    else {
        return Ok(None);
    };

    loader.check_size(entry.size)?;
    Ok(Some(std::fs::read_to_string(&entry.path)?))
}

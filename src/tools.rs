//! CSV cleaning tools
//!
//! Argument types derive `JsonSchema` so the MCP layer can publish an input
//! schema for every tool. [`CsvToolkit`] holds the synchronous tool bodies;
//! `server.rs` runs them on the blocking pool and turns failures into tool
//! errors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::cleaning::{self, CaseOperation, FillStrategy, FilterOperator, Keep};
use crate::config::ServerConfig;
use crate::error::{CleanError, Result};
use crate::loader::TableLoader;
use crate::security::{InputValidator, ValidationConfig};
use crate::table::{Table, render};

/// Input parameters for CSV inspection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InspectParams {
    /// Path to the CSV file or CSV string content
    pub csv_path: String,
}

/// Input parameters for null row removal
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveNullRowsParams {
    /// Path to the CSV file or CSV string content
    pub csv_path: String,
    /// Comma-separated column names to check for nulls (checks all if not provided)
    pub columns: Option<String>,
    /// Path to save cleaned CSV (returns preview if not provided)
    pub output_path: Option<String>,
}

/// Input parameters for filling missing values
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FillMissingParams {
    /// Path to the CSV file or CSV string content
    pub csv_path: String,
    /// Strategy to use: mean, median, mode, forward, backward, constant
    pub strategy: String,
    /// Comma-separated column names to fill (fills all applicable columns if not provided)
    pub columns: Option<String>,
    /// Value to use when strategy is 'constant'
    pub fill_value: Option<String>,
    /// Path to save cleaned CSV (returns preview if not provided)
    pub output_path: Option<String>,
}

fn default_keep() -> String {
    "first".to_string()
}

/// Input parameters for duplicate removal
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveDuplicatesParams {
    /// Path to the CSV file or CSV string content
    pub csv_path: String,
    /// Comma-separated column names to check for duplicates (checks all if not provided)
    pub columns: Option<String>,
    /// Which duplicate to keep: first, last, or none (removes all duplicates)
    #[serde(default = "default_keep")]
    pub keep: String,
    /// Path to save cleaned CSV (returns preview if not provided)
    pub output_path: Option<String>,
}

/// Input parameters for column standardization
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StandardizeParams {
    /// Path to the CSV file or CSV string content
    pub csv_path: String,
    /// Operation to perform: lower, upper, trim, title
    pub operation: String,
    /// Comma-separated column names (applies to all text columns if not provided)
    pub columns: Option<String>,
    /// Path to save cleaned CSV (returns preview if not provided)
    pub output_path: Option<String>,
}

/// Input parameters for row filtering
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FilterParams {
    /// Path to the CSV file or CSV string content
    pub csv_path: String,
    /// Column name to filter on
    pub column: String,
    /// Operator: equals, not_equals, greater, less, contains, not_contains
    pub operator: String,
    /// Value to compare against
    pub value: String,
    /// Path to save filtered CSV (returns preview if not provided)
    pub output_path: Option<String>,
}

/// Input parameters for greet
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GreetParams {
    /// Name of the person to greet
    pub name: String,
}

/// Two integer operands
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NumberPairParams {
    pub a: i64,
    pub b: i64,
}

/// Where a transformed table went
enum Outcome {
    Saved(PathBuf),
    Preview(String),
}

/// Synchronous bodies of the CSV tools
#[derive(Debug, Clone)]
pub struct CsvToolkit {
    loader: TableLoader,
    validator: InputValidator,
    preview_rows: usize,
    sample_rows: usize,
}

impl Default for CsvToolkit {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}

impl CsvToolkit {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            loader: TableLoader::new(config.search_dirs.clone(), config.max_input_bytes),
            validator: InputValidator::new(ValidationConfig::from(config)),
            preview_rows: config.preview_rows,
            sample_rows: config.sample_rows,
        }
    }

    pub fn loader(&self) -> &TableLoader {
        &self.loader
    }

    /// Validate the output path before loading so bad calls fail fast
    fn output(&self, output_path: Option<&str>) -> Result<Option<PathBuf>> {
        output_path
            .map(|p| self.validator.output_path(p))
            .transpose()
    }

    fn finish(&self, table: &Table, output: Option<PathBuf>) -> Result<Outcome> {
        match output {
            Some(path) => {
                table.write_to_path(&path)?;
                info!("Saved {} rows to {}", table.row_count(), path.display());
                Ok(Outcome::Saved(path))
            }
            None => Ok(Outcome::Preview(render(&table.head(self.preview_rows)))),
        }
    }

    pub fn inspect_csv(&self, params: &InspectParams) -> Result<String> {
        let loaded = self.loader.load(&params.csv_path)?;
        let report = cleaning::inspect(&loaded.table, &params.csv_path, self.sample_rows);
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn remove_null_rows(&self, params: &RemoveNullRowsParams) -> Result<String> {
        let columns = self.validator.columns(params.columns.as_deref())?;
        let output = self.output(params.output_path.as_deref())?;

        let mut table = self.loader.load(&params.csv_path)?.table;
        let removed = cleaning::drop_nulls(&mut table, columns.as_deref())?;
        let remaining = table.row_count();

        Ok(match self.finish(&table, output)? {
            Outcome::Saved(path) => format!(
                "Removed {removed} rows with null values. Saved to {}. Remaining rows: {remaining}",
                path.display()
            ),
            Outcome::Preview(preview) => {
                format!("Removed {removed} rows. Remaining: {remaining} rows\n\nPreview:\n{preview}")
            }
        })
    }

    pub fn fill_missing_values(&self, params: &FillMissingParams) -> Result<String> {
        let strategy: FillStrategy = params.strategy.parse()?;
        if strategy == FillStrategy::Constant && params.fill_value.is_none() {
            return Err(CleanError::MissingFillValue);
        }
        let columns = self.validator.columns(params.columns.as_deref())?;
        let output = self.output(params.output_path.as_deref())?;

        let mut table = self.loader.load(&params.csv_path)?.table;
        let filled = cleaning::fill_missing(
            &mut table,
            strategy,
            columns.as_deref(),
            params.fill_value.as_deref(),
        )?;
        info!("Filled columns {:?} using '{}'", filled, strategy);

        Ok(match self.finish(&table, output)? {
            Outcome::Saved(path) => format!(
                "Filled missing values using '{strategy}' strategy. Saved to {}",
                path.display()
            ),
            Outcome::Preview(preview) => {
                format!("Filled missing values using '{strategy}' strategy\n\nPreview:\n{preview}")
            }
        })
    }

    pub fn remove_duplicates(&self, params: &RemoveDuplicatesParams) -> Result<String> {
        let keep: Keep = params.keep.parse()?;
        let columns = self.validator.columns(params.columns.as_deref())?;
        let output = self.output(params.output_path.as_deref())?;

        let mut table = self.loader.load(&params.csv_path)?.table;
        let removed = cleaning::drop_duplicates(&mut table, columns.as_deref(), keep)?;
        let remaining = table.row_count();

        Ok(match self.finish(&table, output)? {
            Outcome::Saved(path) => format!(
                "Removed {removed} duplicate rows. Saved to {}. Remaining rows: {remaining}",
                path.display()
            ),
            Outcome::Preview(preview) => format!(
                "Removed {removed} duplicate rows. Remaining: {remaining} rows\n\nPreview:\n{preview}"
            ),
        })
    }

    pub fn standardize_columns(&self, params: &StandardizeParams) -> Result<String> {
        let operation: CaseOperation = params.operation.parse()?;
        let columns = self.validator.columns(params.columns.as_deref())?;
        let output = self.output(params.output_path.as_deref())?;

        let mut table = self.loader.load(&params.csv_path)?.table;
        let applied = cleaning::standardize(&mut table, operation, columns.as_deref()).join(", ");

        Ok(match self.finish(&table, output)? {
            Outcome::Saved(path) => format!(
                "Applied '{operation}' to columns: {applied}. Saved to {}",
                path.display()
            ),
            Outcome::Preview(preview) => {
                format!("Applied '{operation}' to columns: {applied}\n\nPreview:\n{preview}")
            }
        })
    }

    pub fn filter_rows(&self, params: &FilterParams) -> Result<String> {
        let operator: FilterOperator = params.operator.parse()?;
        let value = match operator {
            FilterOperator::Contains | FilterOperator::NotContains => {
                self.validator.pattern(&params.value)?
            }
            _ => params.value.clone(),
        };
        let output = self.output(params.output_path.as_deref())?;

        let mut table = self.loader.load(&params.csv_path)?.table;
        let before = table.row_count();
        cleaning::filter_rows(&mut table, &params.column, operator, &value)?;
        let after = table.row_count();

        Ok(match self.finish(&table, output)? {
            Outcome::Saved(path) => format!(
                "Filtered to {after} rows (from {before}). Saved to {}",
                path.display()
            ),
            Outcome::Preview(preview) => {
                format!("Filtered to {after} rows (from {before})\n\nPreview:\n{preview}")
            }
        })
    }
}

pub fn greet(params: &GreetParams) -> String {
    format!("Hello, {}!", params.name)
}

pub fn add_numbers(params: &NumberPairParams) -> Result<i64> {
    params
        .a
        .checked_add(params.b)
        .ok_or_else(|| CleanError::Overflow(format!("{} + {}", params.a, params.b)))
}

pub fn subtract_numbers(params: &NumberPairParams) -> Result<i64> {
    params
        .a
        .checked_sub(params.b)
        .ok_or_else(|| CleanError::Overflow(format!("{} - {}", params.a, params.b)))
}

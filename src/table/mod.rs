//! In-memory CSV table
//!
//! A [`Table`] is stored column-major. Every column carries an inferred
//! [`DType`] and the table keeps the original row labels so that previews
//! still show where a row came from after rows have been dropped.

mod parse;
mod render;
mod writer;

pub use parse::is_null_token;
pub use render::render;

use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{CleanError, Result};

/// A single parsed field
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell; text is coerced when it parses as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Null | Cell::Bool(_) => None,
        }
    }

    /// Text form used for comparisons and string operations
    pub fn display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => format_float(*f),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }

    pub(crate) fn key(&self) -> CellKey {
        match self {
            Cell::Null => CellKey::Null,
            Cell::Int(i) => CellKey::Int(*i),
            // -0.0 and 0.0 compare equal, so they must share a key
            Cell::Float(f) if *f == 0.0 => CellKey::Float(0.0f64.to_bits()),
            Cell::Float(f) => CellKey::Float(f.to_bits()),
            Cell::Bool(b) => CellKey::Bool(*b),
            Cell::Text(s) => CellKey::Text(s.clone()),
        }
    }

    /// Total order used to break ties: nulls first, then numbers, bools, text
    pub(crate) fn sort_cmp(&self, other: &Cell) -> Ordering {
        fn rank(cell: &Cell) -> u8 {
            match cell {
                Cell::Null => 0,
                Cell::Int(_) | Cell::Float(_) => 1,
                Cell::Bool(_) => 2,
                Cell::Text(_) => 3,
            }
        }

        match (self, other) {
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (a, b) if rank(a) == 1 && rank(b) == 1 => {
                let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                x.total_cmp(&y)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

/// Hashable identity of a cell; nulls compare equal to each other
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
}

/// Floats always keep a decimal point so `3.0` stays distinguishable from `3`
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Column data type, named the way data-frame tooling prints it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Object,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Object => "object",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which occurrence of a duplicated row survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keep {
    #[default]
    First,
    Last,
    /// Every occurrence of a duplicated row is dropped
    None,
}

impl FromStr for Keep {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(Keep::First),
            "last" => Ok(Keep::Last),
            "none" => Ok(Keep::None),
            other => Err(CleanError::InvalidKeep(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Non-null numeric values, in row order
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_f64).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Build a table from columns of equal length
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.cells.len());
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != rows) {
            return Err(CleanError::Malformed(format!(
                "column '{}' has {} values, expected {}",
                bad.name,
                bad.cells.len(),
                rows
            )));
        }
        Ok(Self {
            columns,
            index: (0..rows).collect(),
        })
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Original row labels of the remaining rows
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Resolve a column subset to positions, failing on any unknown name
    pub fn resolve_subset(&self, subset: Option<&[String]>) -> Result<Vec<usize>> {
        let Some(names) = subset else {
            return Ok((0..self.columns.len()).collect());
        };

        let missing: Vec<String> = names
            .iter()
            .filter(|n| self.column_index(n).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(CleanError::MissingColumns(missing));
        }

        Ok(names.iter().filter_map(|n| self.column_index(n)).collect())
    }

    /// Keep only the rows whose mask entry is `true`
    pub fn retain_rows(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.row_count());
        for column in &mut self.columns {
            let mut keep = mask.iter();
            column.cells.retain(|_| *keep.next().unwrap_or(&false));
        }
        let mut keep = mask.iter();
        self.index.retain(|_| *keep.next().unwrap_or(&false));
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.row_count());
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    dtype: c.dtype,
                    cells: c.cells[..n].to_vec(),
                })
                .collect(),
            index: self.index[..n].to_vec(),
        }
    }

    /// Row as a JSON object keyed by column name
    pub fn record(&self, row: usize) -> Map<String, Value> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.cells[row].to_json()))
            .collect()
    }

    fn row_key(&self, row: usize, subset: &[usize]) -> Vec<CellKey> {
        subset
            .iter()
            .map(|&col| self.columns[col].cells[row].key())
            .collect()
    }

    /// Mark rows that duplicate another row over `subset` columns
    pub fn duplicated(&self, subset: &[usize], keep: Keep) -> Vec<bool> {
        let rows = self.row_count();
        let keys: Vec<Vec<CellKey>> = (0..rows).map(|r| self.row_key(r, subset)).collect();
        let mut mask = vec![false; rows];

        match keep {
            Keep::First => {
                let mut seen = HashSet::new();
                for (row, key) in keys.iter().enumerate() {
                    mask[row] = !seen.insert(key);
                }
            }
            Keep::Last => {
                let mut seen = HashSet::new();
                for (row, key) in keys.iter().enumerate().rev() {
                    mask[row] = !seen.insert(key);
                }
            }
            Keep::None => {
                let mut counts: HashMap<&Vec<CellKey>, usize> = HashMap::new();
                for key in &keys {
                    *counts.entry(key).or_default() += 1;
                }
                for (row, key) in keys.iter().enumerate() {
                    mask[row] = counts[key] > 1;
                }
            }
        }

        mask
    }

    /// Deep memory estimate in bytes
    pub fn memory_usage_bytes(&self) -> usize {
        let mut total = 128;
        for column in &self.columns {
            total += column
                .cells
                .iter()
                .map(|cell| match (column.dtype, cell) {
                    (DType::Bool, _) => 1,
                    (DType::Int64 | DType::Float64, _) => 8,
                    (DType::Object, Cell::Text(s)) => 57 + s.len(),
                    (DType::Object, Cell::Null) => 16,
                    (DType::Object, _) => 32,
                })
                .sum::<usize>();
        }
        total
    }
}

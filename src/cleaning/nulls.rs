//! Dropping and filling missing values

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::table::{Cell, Column, DType, Table};

/// Drop rows holding a null in any of `subset` (every column when `None`).
/// Returns the number of rows removed.
pub fn drop_nulls(table: &mut Table, subset: Option<&[String]>) -> Result<usize> {
    let cols = table.resolve_subset(subset)?;
    let mask: Vec<bool> = (0..table.row_count())
        .map(|row| {
            cols.iter()
                .all(|&col| !table.columns()[col].cells[row].is_null())
        })
        .collect();

    let before = table.row_count();
    table.retain_rows(&mask);
    Ok(before - table.row_count())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    Mean,
    Median,
    Mode,
    Forward,
    Backward,
    Constant,
}

impl FromStr for FillStrategy {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "constant" => Ok(Self::Constant),
            other => Err(CleanError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Constant => "constant",
        })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Most frequent non-null value; ties go to the smallest value
fn mode(column: &Column) -> Option<Cell> {
    let mut counts: HashMap<_, (usize, &Cell)> = HashMap::new();
    for cell in column.cells.iter().filter(|c| !c.is_null()) {
        counts.entry(cell.key()).or_insert((0, cell)).0 += 1;
    }
    counts
        .into_values()
        .max_by(|(ca, a), (cb, b)| ca.cmp(cb).then_with(|| b.sort_cmp(a)))
        .map(|(_, cell)| cell.clone())
}

fn fill_with(column: &mut Column, value: Cell) {
    for cell in column.cells.iter_mut().filter(|c| c.is_null()) {
        *cell = value.clone();
    }
}

fn fill_forward<'a>(cells: impl Iterator<Item = &'a mut Cell>) {
    let mut last: Option<Cell> = None;
    for cell in cells {
        if cell.is_null() {
            if let Some(value) = &last {
                *cell = value.clone();
            }
        } else {
            last = Some(cell.clone());
        }
    }
}

/// Fill nulls in `columns` (every column when `None`).
///
/// Names that are not in the table are skipped. Returns the columns that
/// were changed.
pub fn fill_missing(
    table: &mut Table,
    strategy: FillStrategy,
    columns: Option<&[String]>,
    fill_value: Option<&str>,
) -> Result<Vec<String>> {
    if strategy == FillStrategy::Constant && fill_value.is_none() {
        return Err(CleanError::MissingFillValue);
    }

    let targets = match columns {
        Some(names) => names.to_vec(),
        None => table.column_names(),
    };

    let mut filled = Vec::new();
    for name in targets {
        let Some(column) = table.column_mut(&name) else {
            debug!("Skipping unknown column '{}'", name);
            continue;
        };
        if column.null_count() == 0 {
            continue;
        }

        let changed = match strategy {
            FillStrategy::Mean | FillStrategy::Median if column.dtype.is_numeric() => {
                let values = column.numeric_values();
                let stat = if strategy == FillStrategy::Mean {
                    mean(&values)
                } else {
                    median(&values)
                };
                match stat {
                    Some(stat) => {
                        fill_with(column, Cell::Float(stat));
                        column.dtype = DType::Float64;
                        true
                    }
                    None => false,
                }
            }
            FillStrategy::Mean | FillStrategy::Median => false,
            FillStrategy::Mode => match mode(column) {
                Some(value) => {
                    fill_with(column, value);
                    true
                }
                None => false,
            },
            FillStrategy::Forward => {
                fill_forward(column.cells.iter_mut());
                true
            }
            FillStrategy::Backward => {
                fill_forward(column.cells.iter_mut().rev());
                true
            }
            FillStrategy::Constant => {
                let value = fill_value.unwrap_or_default();
                fill_with(column, Cell::Text(value.to_string()));
                column.dtype = DType::Object;
                true
            }
        };

        if changed {
            filled.push(name);
        }
    }

    Ok(filled)
}

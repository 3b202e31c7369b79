//! Text normalization of column values

use std::fmt;
use std::str::FromStr;

use crate::error::{CleanError, Result};
use crate::table::{Cell, DType, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOperation {
    Lower,
    Upper,
    Trim,
    Title,
}

impl FromStr for CaseOperation {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "trim" => Ok(Self::Trim),
            "title" => Ok(Self::Title),
            other => Err(CleanError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for CaseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Trim => "trim",
            Self::Title => "title",
        })
    }
}

impl CaseOperation {
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lower => text.to_lowercase(),
            Self::Upper => text.to_uppercase(),
            Self::Trim => text.trim().to_string(),
            Self::Title => title_case(text),
        }
    }
}

/// Upper-case the first letter of every run of letters, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Apply `operation` to `columns`, defaulting to every text column.
///
/// Returns the column list the operation was requested for; names missing
/// from the table are skipped. Nulls stay null.
pub fn standardize(
    table: &mut Table,
    operation: CaseOperation,
    columns: Option<&[String]>,
) -> Vec<String> {
    let targets: Vec<String> = match columns {
        Some(names) => names.to_vec(),
        None => table
            .columns()
            .iter()
            .filter(|c| c.dtype == DType::Object)
            .map(|c| c.name.clone())
            .collect(),
    };

    for name in &targets {
        let Some(column) = table.column_mut(name) else {
            continue;
        };
        for cell in column.cells.iter_mut().filter(|c| !c.is_null()) {
            *cell = Cell::Text(operation.apply(&cell.display()));
        }
        column.dtype = DType::Object;
    }

    targets
}

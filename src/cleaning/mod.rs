//! Table cleaning operations
//!
//! Each operation works in place on a [`Table`](crate::table::Table) and
//! reports what it changed. Loading, previews and output files are handled
//! by the tool layer.

pub mod duplicates;
pub mod filter;
pub mod inspect;
pub mod nulls;
pub mod standardize;

pub use duplicates::drop_duplicates;
pub use filter::{FilterOperator, filter_rows};
pub use inspect::{InspectReport, inspect};
pub use nulls::{FillStrategy, drop_nulls, fill_missing};
pub use standardize::{CaseOperation, standardize};

pub use crate::table::Keep;

/// Split a comma-separated column list, trimming names and dropping blanks
pub fn split_columns(columns: &str) -> Vec<String> {
    columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_columns() {
        assert_eq!(split_columns(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_columns(" , ").is_empty());
    }
}

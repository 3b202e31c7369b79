//! Row filtering on a single column condition

use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::{CleanError, Result};
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Greater,
    Less,
    Contains,
    NotContains,
}

impl FromStr for FilterOperator {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "equals" => Ok(Self::Equals),
            "not_equals" => Ok(Self::NotEquals),
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            other => Err(CleanError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Greater => "greater",
            Self::Less => "less",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        })
    }
}

enum Predicate {
    Equals(String),
    Greater(f64),
    Less(f64),
    Contains(Regex),
}

impl Predicate {
    fn matches(&self, cell: &Cell) -> bool {
        match self {
            Predicate::Equals(value) => !cell.is_null() && cell.display() == *value,
            Predicate::Greater(bound) => cell.as_f64().is_some_and(|v| v > *bound),
            Predicate::Less(bound) => cell.as_f64().is_some_and(|v| v < *bound),
            Predicate::Contains(re) => !cell.is_null() && re.is_match(&cell.display()),
        }
    }
}

fn parse_bound(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CleanError::NotNumeric(value.to_string()))
}

/// Keep rows where `column` satisfies `operator value`
pub fn filter_rows(
    table: &mut Table,
    column: &str,
    operator: FilterOperator,
    value: &str,
) -> Result<()> {
    let Some(col) = table.column(column) else {
        return Err(CleanError::ColumnNotFound {
            column: column.to_string(),
            available: table.column_names(),
        });
    };

    let (predicate, negate) = match operator {
        FilterOperator::Equals => (Predicate::Equals(value.to_string()), false),
        FilterOperator::NotEquals => (Predicate::Equals(value.to_string()), true),
        FilterOperator::Greater => (Predicate::Greater(parse_bound(value)?), false),
        FilterOperator::Less => (Predicate::Less(parse_bound(value)?), false),
        FilterOperator::Contains | FilterOperator::NotContains => {
            let re = Regex::new(value).map_err(|e| CleanError::InvalidPattern {
                pattern: value.to_string(),
                message: e.to_string(),
            })?;
            (
                Predicate::Contains(re),
                operator == FilterOperator::NotContains,
            )
        }
    };

    let mask: Vec<bool> = col
        .cells
        .iter()
        .map(|cell| predicate.matches(cell) != negate)
        .collect();
    table.retain_rows(&mask);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SALES: &str = "region,amount,note\nnorth,120,priority order\nsouth,80,\neast,n/a,late\nwest,200.5,Priority\n";

    fn filtered(op: FilterOperator, column: &str, value: &str) -> Vec<usize> {
        let mut table = Table::parse_str(SALES).unwrap();
        filter_rows(&mut table, column, op, value).unwrap();
        table.index().to_vec()
    }

    #[rstest]
    #[case(FilterOperator::Equals, "region", "south", vec![1])]
    #[case(FilterOperator::NotEquals, "region", "south", vec![0, 2, 3])]
    #[case(FilterOperator::Greater, "amount", "100", vec![0, 3])]
    #[case(FilterOperator::Less, "amount", "100", vec![1])]
    #[case(FilterOperator::Contains, "note", "^[Pp]riority", vec![0, 3])]
    #[case(FilterOperator::NotContains, "note", "priority", vec![1, 2, 3])]
    #[case(FilterOperator::Equals, "amount", "120.0", vec![0])]
    fn test_operators(
        #[case] op: FilterOperator,
        #[case] column: &str,
        #[case] value: &str,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(filtered(op, column, value), expected);
    }

    #[test]
    fn test_unknown_column_lists_available() {
        let mut table = Table::parse_str(SALES).unwrap();
        let err = filter_rows(&mut table, "price", FilterOperator::Equals, "1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'price' not found in CSV. Available columns: [\"region\", \"amount\", \"note\"]"
        );
    }

    #[test]
    fn test_numeric_bound_must_parse() {
        let mut table = Table::parse_str(SALES).unwrap();
        let err = filter_rows(&mut table, "amount", FilterOperator::Greater, "lots").unwrap_err();
        assert!(matches!(err, CleanError::NotNumeric(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let mut table = Table::parse_str(SALES).unwrap();
        let err = filter_rows(&mut table, "note", FilterOperator::Contains, "(").unwrap_err();
        assert!(matches!(err, CleanError::InvalidPattern { .. }));
    }

    #[test]
    fn test_unknown_operator_message() {
        let err = "between".parse::<FilterOperator>().unwrap_err();
        assert!(err.to_string().contains("Valid operators: equals, not_equals"));
    }
}

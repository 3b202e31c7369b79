//! Structural summary of a table

use serde::Serialize;
use serde_json::{Map, Value};

use crate::table::{Keep, Table};

#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

/// Summary returned by `inspect_csv`; field order is the output order
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub shape: Shape,
    pub columns: Vec<String>,
    pub dtypes: Map<String, Value>,
    pub missing_values: Map<String, Value>,
    pub missing_percentages: Map<String, Value>,
    pub duplicate_rows: usize,
    pub memory_usage: String,
    pub sample_data: Vec<Map<String, Value>>,
    pub file_path_used: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn inspect(table: &Table, file_path_used: &str, sample_rows: usize) -> InspectReport {
    let rows = table.row_count();
    let mut dtypes = Map::new();
    let mut missing_values = Map::new();
    let mut missing_percentages = Map::new();

    for column in table.columns() {
        let missing = column.null_count();
        let pct = if rows == 0 {
            0.0
        } else {
            round2(missing as f64 / rows as f64 * 100.0)
        };
        dtypes.insert(column.name.clone(), Value::from(column.dtype.as_str()));
        missing_values.insert(column.name.clone(), Value::from(missing));
        missing_percentages.insert(column.name.clone(), Value::from(pct));
    }

    let all: Vec<usize> = (0..table.column_count()).collect();
    let duplicate_rows = table
        .duplicated(&all, Keep::First)
        .into_iter()
        .filter(|d| *d)
        .count();

    InspectReport {
        shape: Shape {
            rows,
            columns: table.column_count(),
        },
        columns: table.column_names(),
        dtypes,
        missing_values,
        missing_percentages,
        duplicate_rows,
        memory_usage: format!("{:.2} KB", table.memory_usage_bytes() as f64 / 1024.0),
        sample_data: (0..sample_rows.min(rows)).map(|r| table.record(r)).collect(),
        file_path_used: file_path_used.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inspect_counts() {
        let table =
            Table::parse_str("id,name,score\n1,Ann,3.5\n2,,\n2,,\n4,Dee,1\n").unwrap();
        let report = inspect(&table, "scores.csv", 3);

        assert_eq!(report.shape.rows, 4);
        assert_eq!(report.shape.columns, 3);
        assert_eq!(report.dtypes["id"], json!("int64"));
        assert_eq!(report.dtypes["name"], json!("object"));
        assert_eq!(report.dtypes["score"], json!("float64"));
        assert_eq!(report.missing_values["name"], json!(2));
        assert_eq!(report.missing_percentages["score"], json!(50.0));
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(report.sample_data.len(), 3);
        assert_eq!(report.sample_data[1]["name"], Value::Null);
        assert_eq!(report.file_path_used, "scores.csv");
    }

    #[test]
    fn test_inspect_serializes_in_field_order() {
        let table = Table::parse_str("b,a\n1,2\n").unwrap();
        let text = serde_json::to_string(&inspect(&table, "x", 3)).unwrap();
        let shape = text.find("\"shape\"").unwrap();
        let sample = text.find("\"sample_data\"").unwrap();
        assert!(shape < sample);
        assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn test_inspect_empty_table() {
        let table = Table::parse_str("a\n").unwrap();
        let report = inspect(&table, "x", 3);
        assert_eq!(report.missing_percentages["a"], json!(0.0));
        assert!(report.sample_data.is_empty());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.33333), 33.33);
        assert_eq!(round2(66.666), 66.67);
    }
}

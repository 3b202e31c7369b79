//! CSV parsing and per-column type inference

use std::collections::HashMap;
use std::io::Read;

use super::{Cell, Column, DType, Table};
use crate::error::{CleanError, Result};

/// Field values read as missing data
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null_token(field: &str) -> bool {
    NULL_TOKENS.contains(&field)
}

fn parse_bool(field: &str) -> Option<bool> {
    match field.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Infer the column type from its raw fields and convert them to cells
fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let has_null = raw.iter().any(Option::is_none);
    let present: Vec<&str> = raw.iter().flatten().map(String::as_str).collect();

    if present.is_empty() {
        return Column {
            name,
            dtype: DType::Float64,
            cells: vec![Cell::Null; raw.len()],
        };
    }

    if present.iter().all(|f| f.trim().parse::<i64>().is_ok()) {
        let (dtype, cells) = if has_null {
            let cells = raw
                .iter()
                .map(|f| match f {
                    Some(f) => f.trim().parse::<f64>().map_or(Cell::Null, Cell::Float),
                    None => Cell::Null,
                })
                .collect();
            (DType::Float64, cells)
        } else {
            let cells = raw
                .iter()
                .map(|f| {
                    f.as_deref()
                        .and_then(|f| f.trim().parse::<i64>().ok())
                        .map_or(Cell::Null, Cell::Int)
                })
                .collect();
            (DType::Int64, cells)
        };
        return Column { name, dtype, cells };
    }

    if present.iter().all(|f| f.trim().parse::<f64>().is_ok()) {
        let cells = raw
            .iter()
            .map(|f| {
                f.as_deref()
                    .and_then(|f| f.trim().parse::<f64>().ok())
                    .map_or(Cell::Null, Cell::Float)
            })
            .collect();
        return Column {
            name,
            dtype: DType::Float64,
            cells,
        };
    }

    if !has_null && present.iter().all(|f| parse_bool(f).is_some()) {
        let cells = present
            .iter()
            .map(|f| parse_bool(f).map_or(Cell::Null, Cell::Bool))
            .collect();
        return Column {
            name,
            dtype: DType::Bool,
            cells,
        };
    }

    let cells = raw
        .into_iter()
        .map(|f| f.map_or(Cell::Null, Cell::Text))
        .collect();
    Column {
        name,
        dtype: DType::Object,
        cells,
    }
}

/// Blank headers become `Unnamed: i`, repeated headers get a `.n` suffix.
///
/// A suffixed name that collides with a later (or earlier) header is
/// suffixed again, so `a,a,a.1` becomes `a, a.1, a.1.1`.
fn normalize_headers(headers: &csv::StringRecord) -> Vec<String> {
    // Every name handed out has a non-zero count
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let mut name = if h.is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            };
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}

impl Table {
    /// Parse CSV with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(CleanError::Malformed(
                "No columns to parse from file".to_string(),
            ));
        }
        let names = normalize_headers(&headers);

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > names.len() {
                return Err(CleanError::Malformed(format!(
                    "Expected {} fields in line {}, saw {}",
                    names.len(),
                    line + 2,
                    record.len()
                )));
            }
            // short rows are padded with nulls
            for (col, values) in raw.iter_mut().enumerate() {
                let field = record.get(col).filter(|f| !is_null_token(f));
                values.push(field.map(str::to_string));
            }
        }

        let columns = names
            .into_iter()
            .zip(raw)
            .map(|(name, values)| infer_column(name, values))
            .collect();
        Table::new(columns)
    }

    pub fn parse_str(content: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dtype_of(content: &str, column: &str) -> DType {
        Table::parse_str(content).unwrap().column(column).unwrap().dtype
    }

    #[rstest]
    #[case("a\n1\n2\n", DType::Int64)]
    #[case("a,b\n1,x\n,y\n", DType::Float64)]
    #[case("a\n1.5\n2\n", DType::Float64)]
    #[case("a\ntrue\nFalse\n", DType::Bool)]
    #[case("a,b\ntrue,1\nNA,2\n", DType::Object)]
    #[case("a\nx\n3\n", DType::Object)]
    #[case("a,b\n,1\nNA,2\n", DType::Float64)]
    fn test_dtype_inference(#[case] content: &str, #[case] expected: DType) {
        assert_eq!(dtype_of(content, "a"), expected);
    }

    #[test]
    fn test_int_column_with_nulls_is_widened() {
        let table = Table::parse_str("a,b\n1,x\n,y\n3,z\n").unwrap();
        let col = table.column("a").unwrap();
        assert_eq!(col.cells, vec![Cell::Float(1.0), Cell::Null, Cell::Float(3.0)]);
    }

    #[rstest]
    #[case("NA")]
    #[case("null")]
    #[case("N/A")]
    #[case("")]
    fn test_null_tokens(#[case] token: &str) {
        assert!(is_null_token(token));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::parse_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.column("c").unwrap().cells, vec![Cell::Null]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = Table::parse_str("a,b\n1,2,3\n").unwrap_err();
        assert!(err.to_string().contains("Expected 2 fields"));
    }

    #[rstest]
    #[case("a,,a\n1,2,3\n", &["a", "Unnamed: 1", "a.1"])]
    #[case("a,a,a\n1,2,3\n", &["a", "a.1", "a.2"])]
    #[case("a,a,a.1\n1,2,3\n", &["a", "a.1", "a.1.1"])]
    #[case("a.1,a,a\n1,2,3\n", &["a.1", "a", "a.1.1"])]
    fn test_header_normalization(#[case] content: &str, #[case] expected: &[&str]) {
        let table = Table::parse_str(content).unwrap();
        assert_eq!(table.column_names(), expected);
        assert_eq!(table.column("a").unwrap().cells.len(), 1);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(Table::parse_str("").is_err());
    }

    #[test]
    fn test_header_only() {
        let table = Table::parse_str("a,b\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }
}

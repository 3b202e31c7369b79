//! Reference text for the cleaning tools

pub fn operations_guide() -> String {
    r#"# CSV cleaning operations

Every tool takes `csv_path`: a file path (searched in the working directory and
the configured data directories) or the CSV text itself. Tools that change data
accept an optional `output_path`; without it they return a preview of the
first rows.

## Tools
- `inspect_csv`: shape, column types, missing values, duplicate count, sample rows
- `remove_null_rows`: drop rows with nulls in `columns` (all columns by default)
- `fill_missing_values`: fill nulls with a `strategy`
- `remove_duplicates`: drop repeated rows over `columns`, honoring `keep`
- `standardize_columns`: normalize text with an `operation`
- `filter_rows`: keep rows where `column` `operator` `value` holds

## fill_missing_values strategies
- `mean`: column average (numeric columns only)
- `median`: column median (numeric columns only)
- `mode`: most frequent value, smallest on ties
- `forward`: copy the previous non-null value down
- `backward`: copy the next non-null value up
- `constant`: use `fill_value`

## remove_duplicates keep
- `first`: keep the first occurrence
- `last`: keep the last occurrence
- `none`: drop every occurrence of a duplicated row

## standardize_columns operations
- `lower`, `upper`: change case
- `trim`: strip surrounding whitespace
- `title`: capitalize each word

## filter_rows operators
- `equals`, `not_equals`: exact text comparison
- `greater`, `less`: numeric comparison, non-numeric cells never match
- `contains`, `not_contains`: regular expression search
"#
    .to_string()
}

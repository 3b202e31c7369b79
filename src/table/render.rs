//! Fixed-width text preview of a table

use super::{Cell, Column, DType, Table, format_float};

const MAX_DECIMALS: usize = 6;

/// Decimals needed to print `value` without losing digits, capped
fn decimals_needed(value: f64) -> usize {
    let text = format!("{value}");
    match text.split_once('.') {
        Some((_, frac)) => frac.len().min(MAX_DECIMALS),
        None => 1,
    }
}

fn render_column(column: &Column) -> Vec<String> {
    match column.dtype {
        DType::Float64 => {
            let decimals = column
                .cells
                .iter()
                .filter_map(|c| match c {
                    Cell::Float(f) if f.is_finite() => Some(decimals_needed(*f)),
                    _ => None,
                })
                .max()
                .unwrap_or(1)
                .max(1);
            column
                .cells
                .iter()
                .map(|c| match c {
                    Cell::Float(f) if f.is_finite() => format!("{f:.decimals$}"),
                    Cell::Float(f) => format!("{f}"),
                    Cell::Null => "NaN".to_string(),
                    other => other.display(),
                })
                .collect()
        }
        _ => column
            .cells
            .iter()
            .map(|c| match c {
                Cell::Null => "NaN".to_string(),
                Cell::Float(f) => format_float(*f),
                other => other.display(),
            })
            .collect(),
    }
}

/// Render the table the way a data-frame printout looks
pub fn render(table: &Table) -> String {
    if table.column_count() == 0 || table.row_count() == 0 {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            table.column_names().join(", ")
        );
    }

    let labels: Vec<String> = table.index().iter().map(usize::to_string).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let rendered: Vec<Vec<String>> = table.columns().iter().map(render_column).collect();
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .zip(&rendered)
        .map(|(column, values)| {
            values
                .iter()
                .map(|v| v.chars().count())
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(table.row_count() + 1);

    let mut header = " ".repeat(label_width);
    for (column, &width) in table.columns().iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", column.name));
    }
    lines.push(header);

    for (row, label) in labels.iter().enumerate() {
        let mut line = format!("{label:<label_width$}");
        for (values, &width) in rendered.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", values[row]));
        }
        lines.push(line);
    }

    lines.join("\n")
}

use crate::error::Result;
use crate::table::{Keep, Table};

/// Drop duplicated rows over `subset` columns. Returns the number removed.
pub fn drop_duplicates(table: &mut Table, subset: Option<&[String]>, keep: Keep) -> Result<usize> {
    let cols = table.resolve_subset(subset)?;
    let mask: Vec<bool> = table
        .duplicated(&cols, keep)
        .into_iter()
        .map(|dup| !dup)
        .collect();

    let before = table.row_count();
    table.retain_rows(&mask);
    Ok(before - table.row_count())
}

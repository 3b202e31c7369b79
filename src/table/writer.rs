//! CSV output

use std::io::Write;
use std::path::Path;

use super::{Cell, Table};
use crate::error::Result;

fn field(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        other => other.display(),
    }
}

impl Table {
    /// Write the table as CSV with a header row and without row labels
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.columns().iter().map(|c| c.name.as_str()))?;
        for row in 0..self.row_count() {
            writer.write_record(self.columns().iter().map(|c| field(&c.cells[row])))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

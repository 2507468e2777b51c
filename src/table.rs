//! Header-driven tabular data.
//!
//! A [`Table`] is an ordered column list plus a sequence of [`Row`]s. Values
//! are always strings; numeric interpretation happens where a value is used.

use crate::error::Result;
use indexmap::IndexMap;
use std::io::{Read, Write};
use std::path::Path;

/// An ordered mapping from column name to cell text.
pub type Row = IndexMap<String, String>;

/// A parsed table. The header defines the schema for every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in header order
    pub columns: Vec<String>,
    /// Rows, each keyed by the header columns
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from a header and positional records.
    ///
    /// Short records are padded with empty cells; extra cells are ignored.
    pub fn from_records<H, R, C>(header: H, records: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let columns: Vec<String> = header.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut cells = record.into_iter().map(Into::into);
                columns
                    .iter()
                    .map(|col| (col.clone(), cells.next().unwrap_or_default()))
                    .collect::<Row>()
            })
            .collect();
        Self { columns, rows }
    }

    /// Read a table from CSV data with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let row: Row = columns
                .iter()
                .enumerate()
                .map(|(i, col)| (col.clone(), record.get(i).unwrap_or("").to_string()))
                .collect();
            rows.push(row);
        }

        log::debug!("Read CSV table: {} columns, {} rows", columns.len(), rows.len());
        Ok(Self { columns, rows })
    }

    /// Read a table from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(
                self.columns
                    .iter()
                    .map(|col| row.get(col).map(String::as_str).unwrap_or("")),
            )?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the header contains a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

//! Delimited table format
//!
//! Tables are header + rows of text cells. The delimiter follows the file
//! extension: `.tsv` / `.tab` use tabs, everything else uses commas.

use crate::error::{IoError, ParseError, SchemaError};
use crate::formats::DocumentFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const UTF8_BOM: char = '\u{feff}';

/// In-memory table: header row plus equally wide data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given headers
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Header names in column order
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in file order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Position of the first column named `name`
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column that must exist
    ///
    /// # Errors
    /// `SchemaError::MissingColumn` naming `path` if the column is absent
    pub fn require_column(&self, path: &Path, name: &str) -> Result<usize, SchemaError> {
        self.column_index(name)
            .ok_or_else(|| SchemaError::missing_column(path, name))
    }

    /// Resolve a selector against the header row
    ///
    /// # Errors
    /// `SchemaError` if the named column is absent or the index is past the
    /// last column
    pub fn resolve(&self, path: &Path, selector: &ColumnSelector) -> Result<usize, SchemaError> {
        match selector {
            ColumnSelector::Index(index) if *index < self.width() => Ok(*index),
            ColumnSelector::Index(index) => Err(SchemaError::ColumnOutOfRange {
                path: path.to_path_buf(),
                index: *index,
                width: self.width(),
            }),
            ColumnSelector::Name(name) => self.require_column(path, name),
        }
    }

    /// Position of column `name`, appending it (with empty cells) if absent
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Cell text, empty if out of range
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }

    /// Overwrite a cell; out-of-range coordinates are ignored
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value.into();
        }
    }

    /// Iterate over a single column
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(column).map_or("", String::as_str))
    }
}

/// Column addressed by zero-based position or by header name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    /// Zero-based column position
    Index(usize),
    /// Header name
    Name(String),
}

impl FromStr for ColumnSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<usize>()
            .map_or_else(|_| ColumnSelector::Name(s.to_string()), ColumnSelector::Index))
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(index) => write!(f, "column {}", index + 1),
            ColumnSelector::Name(name) => write!(f, "column '{name}'"),
        }
    }
}

/// Delimited text format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    delimiter: u8,
}

impl TableFormat {
    /// Comma-separated values
    #[inline]
    #[must_use]
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-separated values
    #[inline]
    #[must_use]
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Pick the delimiter from the path's extension
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let tsv = Self::tsv();
        if tsv.can_decode(path) {
            tsv
        } else {
            Self::csv()
        }
    }

    /// Field delimiter byte
    #[inline]
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl Default for TableFormat {
    fn default() -> Self {
        Self::csv()
    }
}

impl DocumentFormat for TableFormat {
    type Document = Table;

    fn decode(&self, path: &Path, content: &str) -> Result<Table, ParseError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ParseError::syntax(path, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut table = Table::new(headers);
        for (idx, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| ParseError::syntax(path, format!("row {}: {e}", idx + 1)))?;
            table.rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.width(),
            "decoded table"
        );
        Ok(table)
    }

    fn encode(&self, path: &Path, table: &Table) -> Result<Vec<u8>, IoError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer
            .write_record(&table.headers)
            .map_err(|e| IoError::encode(path, e.to_string()))?;
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| IoError::encode(path, e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| IoError::encode(path, e.to_string()))
    }

    fn extensions(&self) -> &[&str] {
        if self.delimiter == b'\t' {
            &["tsv", "tab"]
        } else {
            &["csv"]
        }
    }
}

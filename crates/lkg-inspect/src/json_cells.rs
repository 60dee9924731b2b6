//! JSON-cell validator
//!
//! Linking spreadsheets store JSON fragments in a cell, usually written with
//! single quotes. Each cell is normalized (`'` → `"`) and parsed; nothing is
//! written back.

use lkg_core::error::{SchemaError, ToolResult};
use lkg_core::formats::{ColumnSelector, Table, TableFormat};
use lkg_core::layer::DocumentLayer;
use std::path::Path;

/// Result of checking one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    /// Cell parses as JSON after quote normalization
    Valid,
    /// Cell does not parse
    Invalid {
        /// Parser message
        message: String,
        /// Normalized cell text
        value: String,
    },
    /// Blank cell
    Empty,
}

/// Outcome for a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellCheck {
    /// 1-based data row number
    pub row: usize,
    /// What the check found
    pub outcome: CellOutcome,
}

/// Per-row outcomes for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellReport {
    /// Zero-based column position
    pub index: usize,
    /// Header of the checked column
    pub column: String,
    /// One entry per data row, in table order
    pub checks: Vec<CellCheck>,
}

impl CellReport {
    /// Rows holding valid JSON
    #[must_use]
    pub fn valid(&self) -> usize {
        self.count(|o| matches!(o, CellOutcome::Valid))
    }

    /// Rows holding invalid JSON
    #[must_use]
    pub fn invalid(&self) -> usize {
        self.count(|o| matches!(o, CellOutcome::Invalid { .. }))
    }

    /// Blank rows
    #[must_use]
    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, CellOutcome::Empty))
    }

    fn count(&self, pred: impl Fn(&CellOutcome) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.outcome)).count()
    }

    /// Human-readable report, one line per row plus totals
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Checking JSON in column {} ({})\n",
            self.index + 1,
            self.column
        ));
        report.push_str(&format!("{}\n", "-".repeat(50)));

        for check in &self.checks {
            match &check.outcome {
                CellOutcome::Valid => {
                    report.push_str(&format!("Row {}: valid JSON\n", check.row));
                }
                CellOutcome::Empty => {
                    report.push_str(&format!("Row {}: warning - empty cell\n", check.row));
                }
                CellOutcome::Invalid { message, value } => {
                    report.push_str(&format!("Row {}: invalid JSON\n", check.row));
                    report.push_str(&format!("  Error: {message}\n"));
                    report.push_str(&format!("  Value: {value}\n"));
                    report.push_str(&format!("{}\n", "-".repeat(30)));
                }
            }
        }

        report.push_str(&format!(
            "\nRows: {}  Valid: {}  Invalid: {}  Empty: {}\n",
            self.checks.len(),
            self.valid(),
            self.invalid(),
            self.empty()
        ));
        report
    }
}

/// Check a single cell
#[must_use]
pub fn check_cell(text: &str) -> CellOutcome {
    if text.trim().is_empty() {
        return CellOutcome::Empty;
    }
    let normalized = text.replace('\'', "\"");
    match serde_json::from_str::<serde_json::Value>(&normalized) {
        Ok(_) => CellOutcome::Valid,
        Err(e) => CellOutcome::Invalid {
            message: e.to_string(),
            value: normalized,
        },
    }
}

/// Check every cell of the selected column
///
/// # Errors
/// `SchemaError` if the selector names no column of `table`
pub fn check_table(
    table: &Table,
    path: &Path,
    selector: &ColumnSelector,
) -> Result<CellReport, SchemaError> {
    let index = table.resolve(path, selector)?;
    let checks = table
        .column(index)
        .enumerate()
        .map(|(i, cell)| CellCheck {
            row: i + 1,
            outcome: check_cell(cell),
        })
        .collect();

    Ok(CellReport {
        index,
        column: table.headers()[index].clone(),
        checks,
    })
}

/// Read the table at `path` and check the selected column
///
/// # Errors
/// - `ToolError::Io` if the file cannot be read
/// - `ToolError::Parse` if the table is malformed
/// - `ToolError::Schema` if the column does not exist
pub fn check_json_cells(
    layer: &DocumentLayer,
    path: &Path,
    selector: &ColumnSelector,
) -> ToolResult<CellReport> {
    let table = layer.read(&TableFormat::for_path(path), path)?;
    let report = check_table(&table, path, selector)?;
    tracing::info!(
        path = %path.display(),
        column = %report.column,
        valid = report.valid(),
        invalid = report.invalid(),
        "checked JSON cells"
    );
    Ok(report)
}

//! Mention reconciler
//!
//! Joins every table row to the mention metadata on `original_mention` and
//! stores the result in the `feature_id` and `commit_ids` columns.

use crate::mentions::{MentionIndex, MentionRecord};
use lkg_core::config::DEFAULT_SAMPLE_SIZE;
use lkg_core::error::{SchemaError, ToolResult};
use lkg_core::formats::{JsonFormat, Table, TableFormat};
use lkg_core::layer::DocumentLayer;
use std::path::{Path, PathBuf};

/// Join key column
pub const MENTION_COLUMN: &str = "original_mention";
/// Row identifier column shown in samples
pub const MENTION_ID_COLUMN: &str = "mention_id";
/// Derived feature column
pub const FEATURE_ID_COLUMN: &str = "feature_id";
/// Derived commit column
pub const COMMIT_IDS_COLUMN: &str = "commit_ids";

/// Options for a file-level reconcile run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Output table (default: overwrite the input table)
    pub output: Option<PathBuf>,
    /// Rows shown in the report sample
    pub sample_size: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            output: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl ReconcileOptions {
    /// Write to `path` instead of the input table
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Show `rows` rows in the report sample
    #[must_use]
    pub fn with_sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows;
        self
    }
}

/// Row counters from one join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Rows in the table
    pub rows: usize,
    /// Rows left with a non-empty `feature_id`
    pub matched: usize,
}

/// One row of the post-join sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    /// `mention_id` cell (empty if the table has no such column)
    pub mention_id: String,
    /// Join key
    pub original_mention: String,
    /// Joined feature id
    pub feature_id: String,
    /// Joined commit ids as a JSON array
    pub commit_ids: String,
}

/// Outcome of a file-level reconcile run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// Where the updated table was written
    pub output: PathBuf,
    /// Join counters
    pub stats: JoinStats,
    /// First rows after the join
    pub sample: Vec<SampleRow>,
    /// Metadata entries that overwrote an earlier entry for the same mention
    pub duplicate_mentions: usize,
}

impl ReconcileReport {
    /// Fraction of rows matched, in `[0, 1]` (0 for an empty table)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn match_rate(&self) -> f64 {
        if self.stats.rows == 0 {
            0.0
        } else {
            self.stats.matched as f64 / self.stats.rows as f64
        }
    }

    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Updated table written to {}\n", self.output.display()));
        report.push_str(&format!("Total rows: {}\n", self.stats.rows));

        if !self.sample.is_empty() {
            report.push_str(&format!("\nFirst {} rows after update:\n", self.sample.len()));
            report.push_str("mention_id | original_mention | feature_id | commit_ids\n");
            for row in &self.sample {
                report.push_str(&format!(
                    "{} | {} | {} | {}\n",
                    row.mention_id, row.original_mention, row.feature_id, row.commit_ids
                ));
            }
            report.push('\n');
        }

        report.push_str(&format!(
            "Matched mentions: {}/{} ({:.2}%)\n",
            self.stats.matched,
            self.stats.rows,
            self.match_rate() * 100.0
        ));
        if self.duplicate_mentions > 0 {
            report.push_str(&format!(
                "Duplicate mentions overwritten: {}\n",
                self.duplicate_mentions
            ));
        }
        report
    }
}

/// Join `table` against `index` in place
///
/// Existing `feature_id`/`commit_ids` columns are overwritten where they
/// stand; otherwise they are appended in that order. Unmatched rows get an
/// empty `feature_id` and `[]`.
///
/// # Errors
/// `SchemaError::MissingColumn` if the table has no `original_mention`
/// column. The table is not modified in that case.
pub fn reconcile_table(
    table: &mut Table,
    index: &MentionIndex,
    path: &Path,
) -> Result<JoinStats, SchemaError> {
    let key = table.require_column(path, MENTION_COLUMN)?;
    let feature_col = table.ensure_column(FEATURE_ID_COLUMN);
    let commits_col = table.ensure_column(COMMIT_IDS_COLUMN);

    let mut stats = JoinStats {
        rows: table.len(),
        matched: 0,
    };
    for row in 0..table.len() {
        let (feature_id, commit_ids) = match index.get(table.cell(row, key)) {
            Some(meta) => (meta.feature_id.to_string(), meta.commit_ids_cell()),
            None => (String::new(), "[]".to_string()),
        };
        if !feature_id.is_empty() {
            stats.matched += 1;
        }
        table.set_cell(row, feature_col, feature_id);
        table.set_cell(row, commits_col, commit_ids);
    }

    tracing::debug!(rows = stats.rows, matched = stats.matched, "joined mention table");
    Ok(stats)
}

/// First `limit` rows of a joined table
#[must_use]
pub fn sample_rows(table: &Table, limit: usize) -> Vec<SampleRow> {
    let column = |name: &str, row: usize| {
        table
            .column_index(name)
            .map(|col| table.cell(row, col).to_string())
            .unwrap_or_default()
    };
    (0..table.len().min(limit))
        .map(|row| SampleRow {
            mention_id: column(MENTION_ID_COLUMN, row),
            original_mention: column(MENTION_COLUMN, row),
            feature_id: column(FEATURE_ID_COLUMN, row),
            commit_ids: column(COMMIT_IDS_COLUMN, row),
        })
        .collect()
}

/// Reconcile the table at `table_path` with the metadata at `mentions_path`
///
/// Both inputs are fully decoded and the join completed before anything is
/// written.
///
/// # Errors
/// - `ToolError::Io` if an input cannot be read or the output written
/// - `ToolError::Parse` if the table or the mention JSON is malformed
/// - `ToolError::Schema` if the table has no `original_mention` column
pub fn reconcile(
    layer: &DocumentLayer,
    table_path: &Path,
    mentions_path: &Path,
    options: &ReconcileOptions,
) -> ToolResult<ReconcileReport> {
    let output = options.output.as_deref().unwrap_or(table_path);

    tracing::info!(
        table = %table_path.display(),
        mentions = %mentions_path.display(),
        "reconciling mentions"
    );
    let mut table = layer.read(&TableFormat::for_path(table_path), table_path)?;
    let records = layer.read(&JsonFormat::<Vec<MentionRecord>>::new(), mentions_path)?;

    let index = MentionIndex::build(records);
    let stats = reconcile_table(&mut table, &index, table_path)?;
    layer.write(&TableFormat::for_path(output), &table, output)?;

    tracing::info!(
        output = %output.display(),
        rows = stats.rows,
        matched = stats.matched,
        "reconciled mentions"
    );
    Ok(ReconcileReport {
        output: output.to_path_buf(),
        stats,
        sample: sample_rows(&table, options.sample_size),
        duplicate_mentions: index.overwritten().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lkg_core::formats::DocumentFormat;
    use lkg_test_utils::{MENTION_METADATA, MENTION_TABLE};
    use pretty_assertions::assert_eq;

    fn table(text: &str) -> Table {
        TableFormat::csv().decode(Path::new("t.csv"), text).unwrap()
    }

    fn index() -> MentionIndex {
        MentionIndex::build(serde_json::from_str::<Vec<MentionRecord>>(MENTION_METADATA).unwrap())
    }

    #[test]
    fn joins_with_last_write_wins() {
        let mut t = table(MENTION_TABLE);
        let stats = reconcile_table(&mut t, &index(), Path::new("t.csv")).unwrap();

        assert_eq!(stats, JoinStats { rows: 3, matched: 2 });
        assert_eq!(
            t.headers(),
            ["mention_id", "original_mention", "overall_linkable", "feature_id", "commit_ids"]
        );
        assert_eq!(t.rows()[0][3..], ["F1".to_string(), r#"["c1"]"#.to_string()]);
        assert_eq!(t.rows()[1][3..], [String::new(), "[]".to_string()]);
        assert_eq!(t.rows()[2][3..], ["7".to_string(), r#"["c7","c8"]"#.to_string()]);
    }

    #[test]
    fn existing_columns_overwritten_in_place() {
        let mut t = table("commit_ids,original_mention,feature_id\nstale,bar,old\nstale,baz,old\n");
        reconcile_table(&mut t, &index(), Path::new("t.csv")).unwrap();

        assert_eq!(t.headers(), ["commit_ids", "original_mention", "feature_id"]);
        assert_eq!(t.rows()[0], ["[]", "bar", ""]);
        assert_eq!(t.rows()[1], [r#"["c7","c8"]"#, "baz", "7"]);
    }

    #[test]
    fn missing_key_column_leaves_table_alone() {
        let mut t = table("mention_id,mention\n1,foo\n");
        let before = t.clone();
        let err = reconcile_table(&mut t, &index(), Path::new("t.csv")).unwrap_err();

        assert!(matches!(err, SchemaError::MissingColumn { .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn empty_feature_id_counts_as_unmatched() {
        let index = MentionIndex::build(vec![MentionRecord {
            mention: "foo".into(),
            feature_id: crate::Identifier::new(""),
            commit_ids: vec![],
        }]);
        let mut t = table("original_mention\nfoo\n");
        let stats = reconcile_table(&mut t, &index, Path::new("t.csv")).unwrap();
        assert_eq!(stats.matched, 0);
    }

    #[test]
    fn sample_is_bounded() {
        let mut t = table(MENTION_TABLE);
        reconcile_table(&mut t, &index(), Path::new("t.csv")).unwrap();

        let sample = sample_rows(&t, 2);
        assert_eq!(sample.len(), 2);
        assert_eq!(
            sample[0],
            SampleRow {
                mention_id: "1".into(),
                original_mention: "foo".into(),
                feature_id: "F1".into(),
                commit_ids: r#"["c1"]"#.into(),
            }
        );
        assert_eq!(sample_rows(&t, 10).len(), 3);
    }

    #[test]
    fn report_text() {
        let report = ReconcileReport {
            output: PathBuf::from("entity_links.csv"),
            stats: JoinStats { rows: 3, matched: 2 },
            sample: vec![],
            duplicate_mentions: 1,
        };
        let text = report.generate_text();
        assert!(text.contains("Total rows: 3\n"));
        assert!(text.contains("Matched mentions: 2/3 (66.67%)"));
        assert!(text.contains("Duplicate mentions overwritten: 1"));
    }

    #[test]
    fn empty_table_rate_is_zero() {
        let report = ReconcileReport {
            output: PathBuf::from("t.csv"),
            stats: JoinStats::default(),
            sample: vec![],
            duplicate_mentions: 0,
        };
        assert!(report.match_rate().abs() < f64::EPSILON);
        assert!(!report.generate_text().contains("Duplicate"));
    }
}

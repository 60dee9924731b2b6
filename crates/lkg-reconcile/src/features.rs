//! Feature mention collector
//!
//! Feature sheets list a feature once and leave the feature columns blank on
//! the following rows, one mention per row. Collecting forward-fills the open
//! feature and groups its mentions.

use indexmap::IndexMap;
use lkg_core::error::{SchemaError, ToolResult};
use lkg_core::formats::{Table, TableFormat};
use lkg_core::layer::DocumentLayer;
use serde::Serialize;
use std::path::Path;

/// Column opening a new feature
pub const FEATURE_COLUMN: &str = "feature_id";
/// Column carrying one mention per row
pub const MENTION_COLUMN: &str = "mention";

/// A feature and the mentions listed under it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureMentions {
    /// Feature identifier from the sheet
    pub feature_id: String,
    /// Top-level section heading
    pub h1: String,
    /// Subsection heading
    pub h2: String,
    /// Feature text
    pub feature_description: String,
    /// Kernel version the feature appeared in
    pub version: String,
    /// Mentions in sheet order
    pub mentions: Vec<String>,
}

impl FeatureMentions {
    /// Number of mentions collected
    #[inline]
    #[must_use]
    pub fn mention_count(&self) -> usize {
        self.mentions.len()
    }
}

/// Optional descriptive columns, resolved once per table
struct DetailColumns {
    h1: Option<usize>,
    h2: Option<usize>,
    description: Option<usize>,
    version: Option<usize>,
}

impl DetailColumns {
    fn resolve(table: &Table) -> Self {
        Self {
            h1: table.column_index("h1"),
            h2: table.column_index("h2"),
            description: table.column_index("feature_description"),
            version: table.column_index("version"),
        }
    }

    fn open(&self, table: &Table, row: usize, feature_id: &str) -> FeatureMentions {
        let cell = |col: Option<usize>| col.map(|c| table.cell(row, c).to_string()).unwrap_or_default();
        FeatureMentions {
            feature_id: feature_id.to_string(),
            h1: cell(self.h1),
            h2: cell(self.h2),
            feature_description: cell(self.description),
            version: cell(self.version),
            mentions: Vec::new(),
        }
    }
}

fn present(cell: &str) -> bool {
    !cell.trim().is_empty()
}

/// Group mentions under the feature open at each row
///
/// Mentions before the first feature row are ignored, features without
/// mentions are dropped and the remaining features keep the order in which
/// they first appear. A feature id seen again starts that feature over.
///
/// # Errors
/// `SchemaError::MissingColumn` if `feature_id` or `mention` is absent.
pub fn collect_feature_mentions(
    table: &Table,
    path: &Path,
) -> Result<Vec<FeatureMentions>, SchemaError> {
    let feature_col = table.require_column(path, FEATURE_COLUMN)?;
    let mention_col = table.require_column(path, MENTION_COLUMN)?;
    let details = DetailColumns::resolve(table);

    let mut features: IndexMap<String, FeatureMentions> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut orphans = 0usize;

    for row in 0..table.len() {
        let feature_id = table.cell(row, feature_col);
        if present(feature_id) {
            let feature = details.open(table, row, feature_id);
            if features.insert(feature_id.to_string(), feature).is_some() {
                tracing::debug!(feature_id, row, "feature repeated, restarting");
            }
            current = Some(feature_id.to_string());
        }

        let mention = table.cell(row, mention_col);
        if !present(mention) {
            continue;
        }
        match current.as_ref().and_then(|id| features.get_mut(id)) {
            Some(feature) => feature.mentions.push(mention.to_string()),
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        tracing::debug!(orphans, "mentions before the first feature ignored");
    }
    features.retain(|_, feature| !feature.mentions.is_empty());
    Ok(features.into_values().collect())
}

/// Read the feature sheet at `path` and collect its mentions
///
/// # Errors
/// - `ToolError::Io` if the file cannot be read
/// - `ToolError::Parse` if the table is malformed
/// - `ToolError::Schema` if a required column is absent
pub fn feature_mentions(layer: &DocumentLayer, path: &Path) -> ToolResult<Vec<FeatureMentions>> {
    let table = layer.read(&TableFormat::for_path(path), path)?;
    let features = collect_feature_mentions(&table, path)?;
    tracing::info!(
        path = %path.display(),
        features = features.len(),
        mentions = features.iter().map(FeatureMentions::mention_count).sum::<usize>(),
        "collected feature mentions"
    );
    Ok(features)
}

/// Human-readable listing of collected features
#[must_use]
pub fn features_text(features: &[FeatureMentions], show_mentions: bool) -> String {
    let mut report = String::new();
    let total: usize = features.iter().map(FeatureMentions::mention_count).sum();
    report.push_str(&format!(
        "Features with mentions: {} ({} mentions)\n",
        features.len(),
        total
    ));

    for feature in features {
        report.push_str(&format!(
            "\n[{}] {}\n",
            feature.feature_id, feature.feature_description
        ));
        let section: Vec<&str> = [feature.h1.as_str(), feature.h2.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !section.is_empty() {
            report.push_str(&format!("  Section: {}\n", section.join(" / ")));
        }
        if !feature.version.is_empty() {
            report.push_str(&format!("  Version: {}\n", feature.version));
        }
        report.push_str(&format!("  Mentions: {}\n", feature.mention_count()));
        if show_mentions {
            for mention in &feature.mentions {
                report.push_str(&format!("    - {mention}\n"));
            }
        }
    }
    report
}

//! Cache census
//!
//! Counts how many cache entries actually carry data. Two cache shapes
//! occur in practice:
//! - entity → record object with a `references` array (fusion cache)
//! - entity → array of candidate objects with a `url` array (link cache)

use crate::document::CacheDocument;
use lkg_core::error::ToolResult;
use lkg_core::formats::JsonFormat;
use lkg_core::layer::DocumentLayer;
use serde_json::Value;
use std::path::Path;

/// Population statistics of a cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheCensus {
    /// Entries in the cache
    pub total: usize,
    /// Entries carrying data
    pub populated: usize,
    /// Entries carrying nothing
    pub empty: usize,
    /// Keys whose candidates include a non-empty `url` list, in file order
    pub url_bearing: Vec<String>,
}

impl CacheCensus {
    /// Count a decoded cache
    #[must_use]
    pub fn collect(doc: &CacheDocument) -> Self {
        let mut census = Self::default();
        for (key, value) in doc.iter() {
            census.total += 1;
            if is_populated(value) {
                census.populated += 1;
            } else {
                census.empty += 1;
            }
            if has_url(value) {
                census.url_bearing.push(key.clone());
            }
        }
        census
    }

    /// Percentage of populated entries (0 for an empty cache)
    #[must_use]
    pub fn populated_rate(&self) -> f64 {
        percent(self.populated, self.total)
    }

    /// Percentage of empty entries (0 for an empty cache)
    #[must_use]
    pub fn empty_rate(&self) -> f64 {
        percent(self.empty, self.total)
    }

    /// Human-readable report listing at most `list_limit` url-bearing keys
    #[must_use]
    pub fn generate_text(&self, source: &str, list_limit: usize) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Cache census: {source} ===\n"));
        report.push_str(&format!("Total entries: {}\n", self.total));
        report.push_str(&format!(
            "Populated entries: {} ({:.2}%)\n",
            self.populated,
            self.populated_rate()
        ));
        report.push_str(&format!(
            "Empty entries: {} ({:.2}%)\n",
            self.empty,
            self.empty_rate()
        ));
        report.push_str(&format!("Entries with urls: {}\n", self.url_bearing.len()));

        if !self.url_bearing.is_empty() {
            if self.url_bearing.len() > list_limit {
                report.push_str(&format!("(showing first {list_limit})\n"));
            }
            for key in self.url_bearing.iter().take(list_limit) {
                report.push_str(&format!("- {key}\n"));
            }
        }
        report
    }
}

/// Read the cache at `path` and count it
///
/// # Errors
/// `ToolError::Io` if unreadable, `ToolError::Parse` if not a JSON object
pub fn census(layer: &DocumentLayer, path: &Path) -> ToolResult<CacheCensus> {
    let doc = layer.read(&JsonFormat::<CacheDocument>::new(), path)?;
    let census = CacheCensus::collect(&doc);
    tracing::info!(
        path = %path.display(),
        total = census.total,
        populated = census.populated,
        "cache census"
    );
    Ok(census)
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(record) => record
            .get("references")
            .and_then(Value::as_array)
            .is_some_and(|refs| !refs.is_empty()),
        _ => false,
    }
}

fn has_url(value: &Value) -> bool {
    value.as_array().is_some_and(|candidates| {
        candidates.iter().any(|candidate| {
            candidate
                .get("url")
                .and_then(Value::as_array)
                .is_some_and(|urls| !urls.is_empty())
        })
    })
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

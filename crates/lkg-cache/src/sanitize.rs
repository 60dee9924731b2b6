//! Cache sanitizer
//!
//! Drops degenerate references (type `"code"`, no nested references) from
//! every entity and writes the cache back. Everything else, including field
//! and entity order, is preserved, so running the sanitizer on its own
//! output produces identical bytes.

use crate::document::{kind, CacheDocument, ReferenceView};
use lkg_core::error::{ParseError, ToolResult};
use lkg_core::formats::JsonFormat;
use lkg_core::layer::DocumentLayer;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Counters from one sanitizer pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    /// Entities in the cache
    pub entities: usize,
    /// Entities that lost at least one reference
    pub entities_changed: usize,
    /// References removed in total
    pub references_removed: usize,
}

/// Outcome of a file-level sanitizer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Pass counters
    pub stats: SanitizeStats,
    /// Where the cleaned cache was written
    pub output: PathBuf,
}

impl SanitizeReport {
    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Sanitized cache written to {}\n", self.output.display()));
        report.push_str(&format!("Entities: {}\n", self.stats.entities));
        report.push_str(&format!("Entities changed: {}\n", self.stats.entities_changed));
        report.push_str(&format!(
            "Empty code references removed: {}\n",
            self.stats.references_removed
        ));
        report
    }
}

/// Remove degenerate references in place
///
/// Entities without a `references` field, and entity values that are not
/// objects, are left alone. `path` is only used in error messages.
///
/// # Errors
/// `ParseError::Structure` if a `references` field is not an array or one
/// of its items is not a well-formed reference (an object with a
/// `reference_type`, plus a `references` body when the type is `"code"`). The document may be
/// partially filtered when this happens and must not be persisted.
pub fn sanitize_document(doc: &mut CacheDocument, path: &Path) -> Result<SanitizeStats, ParseError> {
    let mut stats = SanitizeStats::default();

    for (id, entity) in doc.iter_mut() {
        stats.entities += 1;

        let Some(references) = entity.as_object_mut().and_then(|e| e.get_mut("references"))
        else {
            continue;
        };
        let items = match references {
            Value::Array(items) => items,
            other => {
                return Err(ParseError::structure(
                    path,
                    format!(
                        "entity '{id}': field 'references' must be an array, found {}",
                        kind(other)
                    ),
                ))
            }
        };

        // Check every item before removing any
        let mut degenerate = Vec::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            let view = ReferenceView::parse(item).map_err(|message| {
                ParseError::structure(path, format!("entity '{id}', reference {pos}: {message}"))
            })?;
            degenerate.push(view.is_degenerate());
        }

        let before = items.len();
        let mut flags = degenerate.into_iter();
        items.retain(|_| !flags.next().unwrap_or(false));
        let removed = before - items.len();

        if removed > 0 {
            tracing::debug!(entity = %id, removed, "dropped empty code references");
            stats.entities_changed += 1;
            stats.references_removed += removed;
        }
    }

    Ok(stats)
}

/// Sanitize the cache at `input`, writing to `output` (default: `input`)
///
/// Nothing is written unless the whole cache decodes and filters cleanly.
///
/// # Errors
/// - `ToolError::Io` if the input cannot be read or the output written
/// - `ToolError::Parse` if the input is not a JSON object of entity records
pub fn sanitize(
    layer: &DocumentLayer,
    input: &Path,
    output: Option<&Path>,
) -> ToolResult<SanitizeReport> {
    let output = output.unwrap_or(input);
    let format = JsonFormat::<CacheDocument>::new();

    tracing::info!(input = %input.display(), "sanitizing entity cache");
    let mut doc = layer.read(&format, input)?;
    let stats = sanitize_document(&mut doc, input)?;
    layer.write(&format, &doc, output)?;

    tracing::info!(
        output = %output.display(),
        entities = stats.entities,
        removed = stats.references_removed,
        "sanitized entity cache"
    );
    Ok(SanitizeReport {
        stats,
        output: output.to_path_buf(),
    })
}

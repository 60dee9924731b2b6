//! Wikipedia link extractor

use lkg_core::error::ToolResult;
use lkg_core::formats::JsonFormat;
use lkg_core::layer::DocumentLayer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Indentation of the extracted link list
pub const LINKS_INDENT: usize = 4;

/// Linking result; fields other than `linking` are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingDocument {
    /// Linked mentions in input order
    #[serde(default)]
    pub linking: Vec<LinkingEntry>,
}

/// One linked mention
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingEntry {
    /// Surface text as it appeared in the source
    pub mention: Option<String>,
    /// Entity the linker resolved the mention to
    pub linked_entity: Option<String>,
    /// Article URL, absent or empty when unlinked
    pub wikipedia_url: Option<String>,
}

impl LinkingEntry {
    fn field(value: Option<&String>) -> &str {
        value.map_or("", String::as_str)
    }

    /// Mention if non-empty, else the linked entity
    #[must_use]
    pub fn concept(&self) -> &str {
        let mention = Self::field(self.mention.as_ref());
        if mention.is_empty() {
            Self::field(self.linked_entity.as_ref())
        } else {
            mention
        }
    }

    /// Link target, empty when unlinked
    #[must_use]
    pub fn url(&self) -> &str {
        Self::field(self.wikipedia_url.as_ref())
    }
}

/// Extracted `{concept, wikipedia_url}` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptLink {
    /// Mention text, or the linked entity when the mention is blank
    pub concept: String,
    /// Article URL
    pub wikipedia_url: String,
}

/// Outcome of a file-level extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Entries in the input `linking` list
    pub entries: usize,
    /// Links written
    pub extracted: usize,
    /// Where the link list was written
    pub output: PathBuf,
}

impl LinkReport {
    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Linking entries: {}\n", self.entries));
        report.push_str(&format!("Links extracted: {}\n", self.extracted));
        report.push_str(&format!(
            "Skipped (no wikipedia_url): {}\n",
            self.entries - self.extracted
        ));
        report.push_str(&format!("Written to {}\n", self.output.display()));
        report
    }
}

/// Entries with a Wikipedia link, in input order
#[must_use]
pub fn select_links(doc: &LinkingDocument) -> Vec<ConceptLink> {
    doc.linking
        .iter()
        .filter(|entry| !entry.url().is_empty())
        .map(|entry| ConceptLink {
            concept: entry.concept().to_string(),
            wikipedia_url: entry.url().to_string(),
        })
        .collect()
}

/// Extract the links of the linking result at `input` into `output`
///
/// # Errors
/// - `ToolError::Io` if the input cannot be read or the output written
/// - `ToolError::Parse` if the input is not a linking document
pub fn extract_links(layer: &DocumentLayer, input: &Path, output: &Path) -> ToolResult<LinkReport> {
    let doc = layer.read(&JsonFormat::<LinkingDocument>::new(), input)?;
    let links = select_links(&doc);
    layer.write(
        &JsonFormat::<Vec<ConceptLink>>::with_indent(LINKS_INDENT),
        &links,
        output,
    )?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        extracted = links.len(),
        "extracted wikipedia links"
    );
    Ok(LinkReport {
        entries: doc.linking.len(),
        extracted: links.len(),
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lkg_test_utils::LINKING_DOCUMENT;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_linked_entries_with_fallback_concept() {
        let doc: LinkingDocument = serde_json::from_str(LINKING_DOCUMENT).unwrap();
        let links = select_links(&doc);

        assert_eq!(
            links,
            vec![
                ConceptLink {
                    concept: "RCU".into(),
                    wikipedia_url: "https://en.wikipedia.org/wiki/Read-copy-update".into(),
                },
                ConceptLink {
                    concept: "Slab allocation".into(),
                    wikipedia_url: "https://en.wikipedia.org/wiki/Slab_allocation".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_linking_is_empty() {
        let doc: LinkingDocument = serde_json::from_str(r#"{"feature_id": 1}"#).unwrap();
        assert!(select_links(&doc).is_empty());
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let doc: LinkingDocument = serde_json::from_str(
            r#"{"linking": [
                {"wikipedia_url": "https://en.wikipedia.org/wiki/Kernel"},
                {"mention": null, "linked_entity": "Page cache", "wikipedia_url": "u"},
                {"mention": "x", "wikipedia_url": null}
            ]}"#,
        )
        .unwrap();
        let links = select_links(&doc);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].concept, "");
        assert_eq!(links[1].concept, "Page cache");
    }

    #[test]
    fn report_text() {
        let report = LinkReport {
            entries: 3,
            extracted: 2,
            output: PathBuf::from("links.json"),
        };
        let text = report.generate_text();
        assert!(text.contains("Links extracted: 2\n"));
        assert!(text.contains("Skipped (no wikipedia_url): 1\n"));
    }
}

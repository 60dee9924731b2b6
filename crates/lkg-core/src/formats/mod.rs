//! Document formats for toolkit inputs and outputs
//!
//! - JSON documents (caches, mention metadata, linking results) via serde_json
//! - Delimited tables (mention datasets, feature sheets) via csv

use crate::error::{IoError, ParseError};
use std::path::Path;

mod json;
mod table;

pub use json::JsonFormat;
pub use table::{ColumnSelector, Table, TableFormat};

/// Codec between file contents and an in-memory document
///
/// Implement this trait to add support for new file formats.
pub trait DocumentFormat {
    /// The document type this format produces
    type Document;

    /// Decode file contents into a document
    fn decode(&self, path: &Path, content: &str) -> Result<Self::Document, ParseError>;

    /// Render a document into the bytes written to `path`
    fn encode(&self, path: &Path, document: &Self::Document) -> Result<Vec<u8>, IoError>;

    /// Conventional file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if the path carries one of this format's extensions
    fn can_decode(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

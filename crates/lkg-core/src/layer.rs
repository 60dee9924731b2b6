//! Document layer - the only component that touches the filesystem
//!
//! Provides:
//! - File → document decoding (ingress) with a size guard
//! - Document → file encoding (egress) with atomic replacement
//!
//! Egress writes to a temporary file in the target directory and renames
//! it over the target, so a failed run never leaves a half-written file.

use crate::error::{IoError, ParseError, ToolResult};
use crate::formats::DocumentFormat;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default maximum input size (256 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Bounded reads and atomic writes of documents
#[derive(Debug, Clone)]
pub struct DocumentLayer {
    /// Maximum file size to decode (bytes)
    max_file_size: u64,
}

impl DocumentLayer {
    /// Create layer with the default size limit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_file_size(DEFAULT_MAX_FILE_SIZE)
    }

    /// Create layer with a specific size limit
    #[inline]
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Configured size limit
    #[inline]
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Read and decode a document (Ingress)
    ///
    /// # Errors
    /// - `IoError::Read` if the file cannot be opened
    /// - `ParseError::TooLarge` if the file exceeds the size limit
    /// - `ParseError::Syntax` if the file is not UTF-8 or not well-formed
    /// - `ParseError::Structure` if the content has the wrong shape
    pub fn read<F: DocumentFormat>(&self, format: &F, path: &Path) -> ToolResult<F::Document> {
        let metadata = fs::metadata(path).map_err(|e| IoError::read(path, e))?;
        if metadata.len() > self.max_file_size {
            return Err(ParseError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max: self.max_file_size,
            }
            .into());
        }

        if !format.can_decode(path) {
            tracing::debug!(
                path = %path.display(),
                expected = ?format.extensions(),
                "unexpected file extension, decoding anyway"
            );
        }

        let bytes = fs::read(path).map_err(|e| IoError::read(path, e))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| ParseError::syntax(path, format!("not valid UTF-8: {e}")))?;

        let document = format.decode(path, &content)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "read document");
        Ok(document)
    }

    /// Encode and atomically write a document (Egress)
    ///
    /// # Errors
    /// - `IoError::Encode` if the document cannot be rendered
    /// - `IoError::Write` if the temp file cannot be created or renamed
    pub fn write<F: DocumentFormat>(
        &self,
        format: &F,
        document: &F::Document,
        path: &Path,
    ) -> ToolResult<()> {
        let bytes = format.encode(path, document)?;
        write_atomic(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
        Ok(())
    }
}

impl Default for DocumentLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `path` with `bytes` via temp file + rename
///
/// An existing target keeps its permissions.
///
/// # Errors
/// `IoError::Write` on any filesystem failure; the target is untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".lkg-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| IoError::write(path, e))?;

    tmp.write_all(bytes).map_err(|e| IoError::write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| IoError::write(path, e))?;

    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| IoError::write(path, e))?;
    }

    tmp.persist(path).map_err(|e| IoError::write(path, e.error))?;
    Ok(())
}

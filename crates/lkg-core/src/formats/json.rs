//! JSON document format
//!
//! Uses serde_json for parsing and pretty-printing. Object key order is
//! preserved end to end, so an untouched document re-encodes to the same
//! bytes.

use crate::error::{IoError, ParseError};
use crate::formats::DocumentFormat;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;
use serde_json::ser::PrettyFormatter;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Default indentation width (spaces)
pub const DEFAULT_INDENT: usize = 2;

/// JSON format decoding into `T`
pub struct JsonFormat<T> {
    indent: usize,
    _document: PhantomData<fn() -> T>,
}

impl<T> JsonFormat<T> {
    /// Create format with two-space indentation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    /// Create format with custom indentation width
    #[inline]
    #[must_use]
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            _document: PhantomData,
        }
    }

    /// Indentation width used by `encode`
    #[inline]
    #[must_use]
    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl<T> Default for JsonFormat<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonFormat<T> {
    fn clone(&self) -> Self {
        Self::with_indent(self.indent)
    }
}

impl<T> fmt::Debug for JsonFormat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFormat")
            .field("indent", &self.indent)
            .finish()
    }
}

impl<T> DocumentFormat for JsonFormat<T>
where
    T: Serialize + DeserializeOwned,
{
    type Document = T;

    fn decode(&self, path: &Path, content: &str) -> Result<T, ParseError> {
        serde_json::from_str(content).map_err(|e| match e.classify() {
            // Well-formed JSON of the wrong shape
            Category::Data => ParseError::structure(path, e.to_string()),
            Category::Io | Category::Syntax | Category::Eof => {
                ParseError::syntax(path, e.to_string())
            }
        })
    }

    fn encode(&self, path: &Path, document: &T) -> Result<Vec<u8>, IoError> {
        let indent = " ".repeat(self.indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document
            .serialize(&mut serializer)
            .map_err(|e| IoError::encode(path, e.to_string()))?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

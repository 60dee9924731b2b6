//! Entity cache document
//!
//! A cache is a JSON object mapping entity identifier → entity record. The
//! records are kept as raw JSON so that every field and key order survives a
//! read/write cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference type whose empty references are dropped by the sanitizer
pub const CODE_REFERENCE: &str = "code";

/// Top-level cache mapping, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheDocument {
    entries: Map<String, Value>,
}

impl CacheDocument {
    /// Wrap an already-decoded mapping
    #[must_use]
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Number of entities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entities
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entity record by identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    /// Entities in file order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Mutable entities in file order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    /// Unwrap into the raw mapping
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

/// Borrowed view of one reference item
#[derive(Debug, Clone, Copy)]
pub struct ReferenceView<'a> {
    /// `reference_type` tag; non-string tags never match `"code"`
    pub reference_type: &'a Value,
    /// Nested `references` body, if present
    pub references: Option<&'a Value>,
}

impl<'a> ReferenceView<'a> {
    /// Borrow a reference item, checking its shape
    ///
    /// Only code references must carry a `references` body. For those the
    /// body may be an array, an object, a string or null; any other kind is
    /// rejected. Other reference types are not inspected beyond their tag.
    ///
    /// # Errors
    /// A description of the first missing or mistyped field
    pub fn parse(item: &'a Value) -> Result<Self, String> {
        let object = item
            .as_object()
            .ok_or_else(|| format!("expected an object, found {}", kind(item)))?;
        let reference_type = object
            .get("reference_type")
            .ok_or_else(|| "missing field 'reference_type'".to_string())?;
        let references = object.get("references");

        if reference_type.as_str() == Some(CODE_REFERENCE) {
            match references {
                Some(Value::Array(_) | Value::Object(_) | Value::String(_) | Value::Null) => {}
                Some(other) => {
                    return Err(format!(
                        "code reference field 'references' must be an array, found {}",
                        kind(other)
                    ))
                }
                None => return Err("code reference is missing field 'references'".to_string()),
            }
        }
        Ok(Self {
            reference_type,
            references,
        })
    }

    /// A code reference with nothing behind it
    ///
    /// Null, `""`, `[]` and `{}` all count as nothing.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.reference_type.as_str() == Some(CODE_REFERENCE)
            && self.references.map_or(true, is_blank)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// JSON type name for error messages
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Mention metadata and the mention → metadata index

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Opaque scalar identifier (feature id, commit id)
///
/// Producers emit these as strings or numbers; both are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap identifier text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty identifier
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct IdentifierVisitor;

impl Visitor<'_> for IdentifierVisitor {
    type Value = Identifier;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or number identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Identifier, E> {
        Ok(Identifier::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Identifier, E> {
        Ok(Identifier(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Identifier, E> {
        Ok(Identifier(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Identifier, E> {
        Ok(Identifier(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Identifier, E> {
        Ok(Identifier(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}

/// Null reads as the type's empty value; the field itself is still required
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the mention metadata file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRecord {
    /// Join key
    pub mention: String,
    /// Feature the mention belongs to; null means none
    #[serde(deserialize_with = "null_as_default")]
    pub feature_id: Identifier,
    /// Commits the mention was extracted from; null means none
    #[serde(deserialize_with = "null_as_default")]
    pub commit_ids: Vec<Identifier>,
}

/// Metadata joined onto a table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionMeta {
    /// Feature the mention belongs to
    pub feature_id: Identifier,
    /// Commits the mention was extracted from
    pub commit_ids: Vec<Identifier>,
}

impl MentionMeta {
    /// Commit ids rendered as a compact JSON array
    #[must_use]
    pub fn commit_ids_cell(&self) -> String {
        render_commit_ids(&self.commit_ids)
    }
}

/// Render commit ids as a compact JSON array (`[]` when empty)
#[must_use]
pub fn render_commit_ids(ids: &[Identifier]) -> String {
    Value::Array(
        ids.iter()
            .map(|id| Value::String(id.as_str().to_string()))
            .collect(),
    )
    .to_string()
}

/// Exact-match index from mention text to metadata
///
/// Duplicate mentions are last-write-wins; every overwritten key is
/// remembered so callers can report it.
#[derive(Debug, Clone, Default)]
pub struct MentionIndex {
    entries: HashMap<String, MentionMeta>,
    overwritten: Vec<String>,
}

impl MentionIndex {
    /// Build the index from records in file order
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = MentionRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            index.insert(record);
        }
        if !index.overwritten.is_empty() {
            tracing::warn!(
                duplicates = index.overwritten.len(),
                "duplicate mentions in metadata, later entries win"
            );
        }
        index
    }

    /// Insert one record, replacing any earlier entry for the same mention
    pub fn insert(&mut self, record: MentionRecord) {
        let meta = MentionMeta {
            feature_id: record.feature_id,
            commit_ids: record.commit_ids,
        };
        if self.entries.insert(record.mention.clone(), meta).is_some() {
            tracing::debug!(mention = %record.mention, "mention overwritten");
            self.overwritten.push(record.mention);
        }
    }

    /// Metadata for an exact mention string
    #[must_use]
    pub fn get(&self, mention: &str) -> Option<&MentionMeta> {
        self.entries.get(mention)
    }

    /// Number of distinct mentions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no mentions are indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mentions that replaced an earlier entry, once per replacement
    #[inline]
    #[must_use]
    pub fn overwritten(&self) -> &[String] {
        &self.overwritten
    }
}

impl FromIterator<MentionRecord> for MentionIndex {
    fn from_iter<I: IntoIterator<Item = MentionRecord>>(iter: I) -> Self {
        Self::build(iter)
    }
}

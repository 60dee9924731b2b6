//! Testing utilities for the LKG toolkit workspace
//!
//! Shared fixtures and on-disk scratch helpers.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Cache with one degenerate code reference followed by a doc reference
pub const SAMPLE_CACHE: &str = r#"{
  "E1": {
    "references": [
      {"reference_type": "code", "references": []},
      {"reference_type": "doc", "references": ["x"]}
    ]
  }
}"#;

/// Cache mixing every shape the sanitizer has to handle
pub const MIXED_CACHE: &str = r#"{
  "slab allocator": {
    "canonical_name": "SLAB",
    "references": [
      {"reference_type": "code", "references": ["mm/slab.c"], "feature_id": 12},
      {"reference_type": "code", "references": []},
      {"reference_type": "wikipedia", "references": []},
      {"reference_type": "code", "references": []}
    ]
  },
  "page cache": {
    "canonical_name": "Page cache"
  },
  "kswapd": {
    "references": []
  }
}"#;

/// Mention metadata with a duplicated `foo` mention
pub const MENTION_METADATA: &str = r#"[
  {"mention": "foo", "feature_id": "F0", "commit_ids": ["c0"]},
  {"mention": "baz", "feature_id": 7, "commit_ids": ["c7", "c8"]},
  {"mention": "foo", "feature_id": "F1", "commit_ids": ["c1"]}
]"#;

/// Mention table; `bar` has no metadata
pub const MENTION_TABLE: &str = "\
mention_id,original_mention,overall_linkable
1,foo,True
2,bar,False
3,baz,True
";

/// Linking result with one entry lacking a url and one falling back to the entity
pub const LINKING_DOCUMENT: &str = r#"{
  "feature_id": 42,
  "linking": [
    {"mention": "RCU", "linked_entity": "Read-copy-update", "wikipedia_url": "https://en.wikipedia.org/wiki/Read-copy-update"},
    {"mention": "kfence", "linked_entity": "", "wikipedia_url": ""},
    {"mention": "", "linked_entity": "Slab allocation", "wikipedia_url": "https://en.wikipedia.org/wiki/Slab_allocation"}
  ]
}"#;

/// Feature sheet with forward-filled feature rows
pub const FEATURE_TABLE: &str = "\
feature_id,h1,h2,feature_description,version,mention
101,Memory management,Slab,Introduce kfence,5.12,kfence
,,,,,sampling allocator
102,Networking,,No mentions here,5.12,
103,Tracing,BPF,BPF ring buffer,5.8,ring buffer
";

/// Scratch directory holding fixture files
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the scratch dir
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap()
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a JSON fixture, panicking on malformed test data
pub fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

//! LKG Cache
//!
//! Maintenance jobs for the entity cache (identifier → entity record):
//! - **Sanitize**: drop `"code"` references with no nested references
//! - **Census**: count populated and empty entries
//!
//! # Example
//!
//! ```rust,ignore
//! use lkg_cache::sanitize;
//! use lkg_core::DocumentLayer;
//!
//! let report = sanitize(&DocumentLayer::new(), Path::new("fusion_cache.json"), None)?;
//! println!("{}", report.generate_text());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod census;
pub mod document;
pub mod sanitize;

pub use census::{census, CacheCensus};
pub use document::{CacheDocument, ReferenceView, CODE_REFERENCE};
pub use sanitize::{sanitize, sanitize_document, SanitizeReport, SanitizeStats};

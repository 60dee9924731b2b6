//! LKG Core
//!
//! Shared plumbing for the knowledge-graph data tools: the boundary between
//! files on disk and the in-memory documents the tools transform.
//!
//! # Architecture
//!
//! ```text
//! File → DocumentLayer::read → Format::decode → document
//!                                                  ↓ (tool transform)
//! File ← rename ← temp file ← Format::encode ← document
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lkg_core::prelude::*;
//!
//! let layer = DocumentLayer::new();
//! let table = layer.read(&TableFormat::csv(), Path::new("entity_links.csv"))?;
//! layer.write(&TableFormat::csv(), &table, Path::new("entity_links.csv"))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod formats;
pub mod layer;

pub use config::ToolkitConfig;
pub use error::{
    ConfigError, IoError, NetworkError, ParseError, SchemaError, ToolError, ToolResult,
};
pub use formats::{ColumnSelector, DocumentFormat, JsonFormat, Table, TableFormat};
pub use layer::{write_atomic, DocumentLayer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for toolkit crates
    pub use crate::error::{ParseError, SchemaError, ToolError, ToolResult};
    pub use crate::formats::{ColumnSelector, DocumentFormat, JsonFormat, Table, TableFormat};
    pub use crate::layer::DocumentLayer;
    pub use std::path::Path;
}

//! LKG Inspect
//!
//! Small read-mostly helpers around the linking pipeline:
//! - **JSON cells**: check that a table column holds parseable JSON
//! - **Links**: pull `{concept, wikipedia_url}` pairs out of a linking result

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod json_cells;
pub mod links;

pub use json_cells::{check_cell, check_json_cells, check_table, CellCheck, CellOutcome, CellReport};
pub use links::{extract_links, select_links, ConceptLink, LinkReport, LinkingDocument, LinkingEntry};

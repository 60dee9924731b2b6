//! LKG Toolkit
//!
//! Command-line front end over the toolkit crates:
//!
//! ```text
//! lkg sanitize         --input fusion_cache.json
//! lkg cache-stats      --input link_cache.json
//! lkg reconcile        --table entity_links.csv --mentions mention_metadata.json
//! lkg features         --table features.csv --show-mentions
//! lkg check-json-cells --table benchmark.csv --column 6
//! lkg extract-links    --input kg_results.json --output links.json
//! lkg probe
//! ```
//!
//! Exit codes: 0 success, 2 parse, 3 schema, 4 I/O, 5 config.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::build_cli;
pub use commands::{resolve_config, run};
pub use logging::{init_tracing, Verbosity};

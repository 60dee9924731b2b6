//! LKG Reconcile
//!
//! Table-side jobs keyed on mentions:
//! - **Reconcile**: join a mention table to mention metadata and record
//!   `feature_id`/`commit_ids` per row
//! - **Features**: group the mentions of a forward-filled feature sheet
//!
//! # Example
//!
//! ```rust,ignore
//! use lkg_reconcile::{reconcile, ReconcileOptions};
//! use lkg_core::DocumentLayer;
//!
//! let report = reconcile(
//!     &DocumentLayer::new(),
//!     Path::new("entity_links.csv"),
//!     Path::new("mention_metadata.json"),
//!     &ReconcileOptions::default(),
//! )?;
//! println!("{}", report.generate_text());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod features;
pub mod mentions;
pub mod reconcile;

pub use features::{collect_feature_mentions, feature_mentions, features_text, FeatureMentions};
pub use mentions::{render_commit_ids, Identifier, MentionIndex, MentionMeta, MentionRecord};
pub use reconcile::{
    reconcile, reconcile_table, sample_rows, JoinStats, ReconcileOptions, ReconcileReport,
    SampleRow,
};

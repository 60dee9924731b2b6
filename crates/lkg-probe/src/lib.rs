//! LKG Probe
//!
//! Checks that the Wikipedia endpoints used by entity linking are reachable
//! and suggests client timeouts from the observed latency.
//!
//! # Example
//!
//! ```rust,ignore
//! use lkg_probe::{probe, ProbeConfig};
//!
//! let report = probe(ProbeConfig::default()).await?;
//! println!("{}", report.generate_text());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod report;

pub use client::{classify, probe, ProbeConfig, Prober};
pub use report::{ProbeOutcome, ProbeReport, ProbeResult, Recommendation, Verdict};

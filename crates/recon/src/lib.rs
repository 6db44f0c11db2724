//! `gedcompare-recon`: Cross-tree matching engine.
//!
//! Pure engine crate: receives two parsed family trees and an anchor, walks
//! both in lockstep and returns scored pairs plus a discrepancy report.
//! No CLI or IO dependencies.

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;

pub use cancel::CancellationToken;
pub use config::CompareConfig;
pub use engine::{compare, resolve_anchors, run, CompareOptions, Traversal};
pub use error::CompareError;
pub use graph::PersonGraph;
pub use model::{CompareResult, PairReport, PersonFields, ReportLine, RunStatistics, StopReason};
pub use normalize::normalize_date;
pub use report::render_text;

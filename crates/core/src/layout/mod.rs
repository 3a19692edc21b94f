//! Per-recognizer layout analysis.
//!
//! Turns one recognizer's raw detection items into ordered text lines and
//! holds the tunable parameters shared with the cross-engine merge.

pub mod cluster;
pub mod line;
pub mod params;

pub use cluster::cluster_items;
pub use line::EngineLine;
pub use params::{ConfidenceRange, MergeParams, default_confidence_ranges};

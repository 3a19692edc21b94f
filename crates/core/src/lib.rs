//! rover-core — multi-recognizer OCR output reconciliation.
//!
//! Several independent OCR recognizers read the same e-book page image and
//! each produces its own text fragments, boxes and confidences, with its
//! own failure modes. This crate reconciles those outputs into one
//! consensus transcript (ROVER: Recognizer Output Voting Error Reduction):
//! items cluster into per-engine lines, lines align across engines into
//! physical page lines, and each physical line is decided by majority vote
//! with single-source fallback, reporting per-line provenance and gap
//! statistics.
//!
//! Recognizer invocation, image preprocessing and document I/O live in the
//! surrounding pipeline; this crate is a pure, deterministic computation
//! over already-collected [`recognizer::EngineResult`] values.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod merge;
pub mod recognizer;

pub use error::{Result, RoverError};
pub use geometry::BBox;
pub use layout::cluster::cluster_items;
pub use layout::line::EngineLine;
pub use layout::params::{ConfidenceRange, MergeParams, default_confidence_ranges};
pub use merge::align::{AlignedLine, align_engine_lines};
pub use merge::charvote::{CharCandidate, CharVote, vote_characters};
pub use merge::confidence::ConfidenceNormalizer;
pub use merge::rover::{RoverResult, merge_page};
pub use merge::vote::{VotedLine, comparison_key, vote_line};
pub use recognizer::{DetectionItem, EngineId, EngineResult, Recognizer};

//! Cross-engine reconciliation: align lines across recognizers, vote per
//! physical line, assemble the merged document.

pub mod align;
pub mod charvote;
pub mod confidence;
pub mod rover;
pub mod vote;

pub use align::{AlignedLine, align_engine_lines};
pub use charvote::{CharCandidate, CharVote, vote_characters};
pub use confidence::ConfidenceNormalizer;
pub use rover::{RoverResult, merge_page};
pub use vote::{VotedLine, comparison_key, vote_line};

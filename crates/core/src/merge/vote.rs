//! Per-line voting.
//!
//! Given the aligned candidates for one physical line, selects the
//! consensus text and records which recognizers contributed. Exact-text
//! majority voting is robust to one engine's idiosyncratic errors, but a
//! line only one engine detected is never dropped: under-detection is
//! worse than over-trusting a single source for rare lines.

use indexmap::IndexMap;
use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

use crate::merge::align::AlignedLine;
use crate::merge::confidence::ConfidenceNormalizer;
use crate::recognizer::EngineId;

/// Voting outcome for one physical line.
#[derive(Debug, Clone, PartialEq)]
pub struct VotedLine {
    /// The winning text, exactly as the winning engine produced it.
    pub text: String,
    /// Engine whose original text was emitted.
    pub winner: EngineId,
    /// All engines whose candidates agreed with the winner.
    pub engines: Vec<EngineId>,
    /// Representative vertical position, for ordering.
    pub y_center: f64,
}

/// Comparison key for textual equivalence.
///
/// NFKC folds full-width/half-width forms together; leading, trailing and
/// repeated whitespace variants collapse to single spaces. The emitted
/// text is never touched, only the key.
pub fn comparison_key(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    folded.split_whitespace().join(" ")
}

struct Candidate {
    engine: EngineId,
    text: String,
    confidence: f64,
}

/// Votes on one aligned line.
///
/// Candidates group by [`comparison_key`]; the largest group wins, ties
/// broken by summed normalized confidence, then by earliest candidate
/// order. When the winning group reaches `min_agreement` the emitted text
/// is the original text of the group's highest-confidence member;
/// otherwise the single highest-confidence candidate is used as fallback
/// (counted as a filled gap by the orchestrator).
pub fn vote_line(
    aligned: &AlignedLine,
    min_agreement: usize,
    normalizer: &ConfidenceNormalizer,
) -> VotedLine {
    let candidates: Vec<Candidate> = aligned
        .lines()
        .values()
        .map(|line| Candidate {
            engine: line.engine().clone(),
            text: line.text(),
            confidence: normalizer.normalize(line.engine(), line.confidence()),
        })
        .collect();
    debug_assert!(!candidates.is_empty());

    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (idx, cand) in candidates.iter().enumerate() {
        groups.entry(comparison_key(&cand.text)).or_default().push(idx);
    }

    // Largest group wins; summed confidence then insertion order break
    // ties. Strict comparisons keep the earliest group on full ties.
    let mut majority: &[usize] = &[];
    let mut majority_conf = f64::NEG_INFINITY;
    for members in groups.values() {
        let conf: f64 = members.iter().map(|&i| candidates[i].confidence).sum();
        if members.len() > majority.len()
            || (members.len() == majority.len() && conf > majority_conf)
        {
            majority = members;
            majority_conf = conf;
        }
    }

    let (winner_idx, engines) = if majority.len() >= min_agreement {
        let best = majority
            .iter()
            .copied()
            .reduce(|best, i| {
                if candidates[i].confidence > candidates[best].confidence {
                    i
                } else {
                    best
                }
            })
            .unwrap_or(0);
        let engines = majority
            .iter()
            .map(|&i| candidates[i].engine.clone())
            .collect();
        (best, engines)
    } else {
        // Gap: no consensus, fall back to the most reliable single source.
        let best = (0..candidates.len())
            .reduce(|best, i| {
                if candidates[i].confidence > candidates[best].confidence {
                    i
                } else {
                    best
                }
            })
            .unwrap_or(0);
        (best, vec![candidates[best].engine.clone()])
    };

    VotedLine {
        text: candidates[winner_idx].text.clone(),
        winner: candidates[winner_idx].engine.clone(),
        engines,
        y_center: aligned.y_center(),
    }
}

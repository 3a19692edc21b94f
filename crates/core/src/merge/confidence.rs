//! Confidence normalization.
//!
//! Recognizers report confidence on incompatible scales: some sit near 1.0
//! for everything, others spread over a wide low-to-high range. Voting
//! compares engines, so raw scores are rescaled onto a common [0, 1]
//! reliability measure using each engine's configured operating range.

use rustc_hash::FxHashMap;

use crate::layout::params::ConfidenceRange;
use crate::recognizer::EngineId;

/// A configured range narrower than this is treated as collapsed.
const MIN_RANGE_WIDTH: f64 = 1e-6;

/// Maps raw per-engine confidences onto [0, 1].
#[derive(Debug, Clone)]
pub struct ConfidenceNormalizer {
    ranges: FxHashMap<EngineId, ConfidenceRange>,
}

impl ConfidenceNormalizer {
    pub fn new(ranges: FxHashMap<EngineId, ConfidenceRange>) -> Self {
        Self { ranges }
    }

    /// Rescales `raw` against the engine's observed range, clamped to
    /// [0, 1].
    ///
    /// A collapsed range (the engine always reports near its maximum) pins
    /// the result to 1.0 instead of dividing by near-zero width. Engines
    /// without a configured range pass through on the identity range.
    pub fn normalize(&self, engine: &EngineId, raw: f64) -> f64 {
        let range = self
            .ranges
            .get(engine)
            .copied()
            .unwrap_or(ConfidenceRange::FULL);
        let width = range.max - range.min;
        if width < MIN_RANGE_WIDTH {
            return 1.0;
        }
        ((raw - range.min) / width).clamp(0.0, 1.0)
    }
}

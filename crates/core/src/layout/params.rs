//! Merge parameters.
//!
//! Contains the MergeParams struct controlling clustering, alignment and
//! voting behavior.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoverError};
use crate::recognizer::EngineId;

/// Empirically observed operating range of one recognizer's native
/// confidence scale, used to rescale raw confidences onto [0, 1].
///
/// Ranges are configuration, not something computed online: per-page
/// statistics are too noisy to estimate them reliably.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRange {
    pub min: f64,
    pub max: f64,
}

impl ConfidenceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Identity range: raw confidences pass through clamped.
    pub const FULL: Self = Self::new(0.0, 1.0);
}

/// Default observed confidence ranges for commonly deployed recognizers.
///
/// Measured over a corpus of e-book page scans. Engines that always report
/// near their maximum (paddle) end up with a narrow range so their scores
/// spread out; engines missing from this table fall back to
/// [`ConfidenceRange::FULL`].
pub fn default_confidence_ranges() -> &'static FxHashMap<EngineId, ConfidenceRange> {
    static RANGES: Lazy<FxHashMap<EngineId, ConfidenceRange>> = Lazy::new(|| {
        let mut m = FxHashMap::default();
        m.insert(EngineId::new("tesseract"), ConfidenceRange::new(0.30, 0.95));
        m.insert(EngineId::new("paddle"), ConfidenceRange::new(0.60, 0.99));
        m.insert(EngineId::new("easyocr"), ConfidenceRange::new(0.20, 0.90));
        m
    });
    &RANGES
}

/// Parameters for merging multiple recognizers' page output.
///
/// Tolerances are in pixels of the page image; they must be tuned per
/// page resolution rather than fixed globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeParams {
    /// Maximum distance between an item's vertical center and a line's
    /// running mean center for the item to join that line.
    pub cluster_y_tolerance: f64,

    /// Maximum vertical distance between two engines' lines for them to be
    /// treated as the same physical page line. May differ from the
    /// clustering tolerance: cross-engine baselines and box padding
    /// conventions jitter more than items within one engine.
    pub align_y_tolerance: f64,

    /// How many engines must produce textually equivalent output before a
    /// line is accepted without single-source fallback.
    pub min_agreement: usize,

    /// Preferred engine whose line ordering anchors alignment. Must name a
    /// supplied engine when set.
    pub primary_engine: Option<EngineId>,

    /// Observed confidence range per engine, for normalization.
    pub confidence_ranges: FxHashMap<EngineId, ConfidenceRange>,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            cluster_y_tolerance: 12.0,
            align_y_tolerance: 20.0,
            min_agreement: 2,
            primary_engine: None,
            confidence_ranges: default_confidence_ranges().clone(),
        }
    }
}

impl MergeParams {
    /// Validates the configuration.
    ///
    /// Configuration errors are programmer errors and are rejected rather
    /// than silently corrected. Whether `primary_engine` names a supplied
    /// engine is checked at merge invocation, where the engine set is known.
    pub fn validate(&self) -> Result<()> {
        if self.min_agreement < 1 {
            return Err(RoverError::InvalidMinAgreement(self.min_agreement));
        }
        for (name, value) in [
            ("cluster_y_tolerance", self.cluster_y_tolerance),
            ("align_y_tolerance", self.align_y_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RoverError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }
}

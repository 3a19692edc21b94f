//! Recognizer output contract.
//!
//! Every OCR backend is a separate integration with its own native API and
//! confidence semantics. The reconciliation engine never sees those types;
//! it consumes only [`EngineResult`] values produced through the
//! [`Recognizer`] capability interface, one adapter per backend.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::geometry::BBox;
use crate::layout::cluster::cluster_items;

/// Identifier of one OCR recognizer (e.g. `"tesseract"`, `"paddle"`).
pub type EngineId = SmolStr;

/// One recognizer's raw output unit: a text fragment with its bounding box
/// and the confidence on the recognizer's *native* scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionItem {
    pub text: String,
    pub bbox: BBox,
    pub confidence: f64,
}

impl DetectionItem {
    pub fn new(text: impl Into<String>, bbox: BBox, confidence: f64) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence,
        }
    }

    /// Items the clusterer drops: inverted boxes or text that is empty
    /// after trimming. Zero-area boxes with real text are kept.
    pub fn is_malformed(&self) -> bool {
        self.bbox.is_degenerate() || self.text.trim().is_empty()
    }
}

/// One recognizer's whole-page outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub engine: EngineId,
    pub items: Vec<DetectionItem>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EngineResult {
    /// A successful page result.
    pub fn ok(engine: impl Into<EngineId>, items: Vec<DetectionItem>) -> Self {
        Self {
            engine: engine.into(),
            items,
            success: true,
            error: None,
        }
    }

    /// A failed page result. The merge excludes it without aborting.
    pub fn failed(engine: impl Into<EngineId>, error: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            items: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Whether this result can participate in a merge.
    pub fn is_usable(&self) -> bool {
        self.success && !self.items.is_empty()
    }

    /// Full-page text as this engine alone saw it: items clustered into
    /// lines with `y_tolerance`, lines joined by newlines.
    pub fn text(&self, y_tolerance: f64) -> String {
        let lines = cluster_items(&self.engine, &self.items, y_tolerance);
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text());
        }
        out
    }
}

/// Capability interface implemented by one adapter per OCR backend:
/// produce a page's detection items, or report failure.
///
/// `P` is whatever page handle the surrounding pipeline passes to its
/// recognizers (an image path, decoded pixels, ...). The reconciliation
/// engine itself only ever consumes the returned [`EngineResult`].
pub trait Recognizer<P> {
    /// Stable identifier used for provenance and configuration lookup.
    fn id(&self) -> EngineId;

    /// Recognize one page. Failures are reported in-band via
    /// [`EngineResult::failed`], never panicked or propagated.
    fn recognize(&self, page: &P) -> EngineResult;
}

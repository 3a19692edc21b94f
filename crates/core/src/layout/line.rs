//! Engine line type: one recognizer's detection items grouped into a
//! physical text line.

use itertools::Itertools;

use crate::recognizer::{DetectionItem, EngineId};

/// Detection items from one recognizer forming a single text line.
///
/// Read-only after construction: the clusterer orders the items
/// left-to-right and precomputes the line's vertical center and mean
/// confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineLine {
    engine: EngineId,
    items: Vec<DetectionItem>,
    y_center: f64,
    confidence: f64,
}

impl EngineLine {
    /// Builds a line from clustered items, ordering them by ascending
    /// horizontal position.
    ///
    /// Callers must pass at least one item; the clusterer never closes an
    /// empty line.
    pub(crate) fn from_items(engine: EngineId, mut items: Vec<DetectionItem>) -> Self {
        debug_assert!(!items.is_empty());
        items.sort_by(|a, b| {
            (a.bbox.x1, a.bbox.y1, a.bbox.x2).cmp(&(b.bbox.x1, b.bbox.y1, b.bbox.x2))
        });
        let n = items.len() as f64;
        let y_center = items.iter().map(|i| i.bbox.center_y()).sum::<f64>() / n;
        let confidence = items.iter().map(|i| i.confidence).sum::<f64>() / n;
        Self {
            engine,
            items,
            y_center,
            confidence,
        }
    }

    pub fn engine(&self) -> &EngineId {
        &self.engine
    }

    /// Items in left-to-right order.
    pub fn items(&self) -> &[DetectionItem] {
        &self.items
    }

    /// Mean vertical center of the line's items.
    pub fn y_center(&self) -> f64 {
        self.y_center
    }

    /// Mean of the items' native-scale confidences.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Concatenation of item texts in left-to-right order.
    pub fn text(&self) -> String {
        self.items.iter().map(|i| i.text.as_str()).join("")
    }
}

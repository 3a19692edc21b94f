//! Item-to-line clustering.
//!
//! Groups a single recognizer's detection items into horizontal text lines
//! by vertical proximity: one top-to-bottom sweep over items sorted by
//! vertical center, O(n log n) for the sort, O(n) for assignment.

use ordered_float::OrderedFloat;

use crate::layout::line::EngineLine;
use crate::recognizer::{DetectionItem, EngineId};

/// Accumulator for the line currently being grown by the sweep.
struct OpenLine {
    items: Vec<DetectionItem>,
    center_sum: f64,
}

impl OpenLine {
    fn start(item: DetectionItem) -> Self {
        let center_sum = item.bbox.center_y();
        Self {
            items: vec![item],
            center_sum,
        }
    }

    fn mean_center(&self) -> f64 {
        self.center_sum / self.items.len() as f64
    }

    fn push(&mut self, item: DetectionItem) {
        self.center_sum += item.bbox.center_y();
        self.items.push(item);
    }

    fn close(self, engine: &EngineId) -> EngineLine {
        EngineLine::from_items(engine.clone(), self.items)
    }
}

/// Groups one recognizer's detection items into text lines, sorted
/// top-to-bottom by line center.
///
/// Each item joins the open line when its vertical center lies within
/// `y_tolerance` of that line's running mean center, else a new line
/// starts. Malformed items (inverted box, blank text) are skipped rather
/// than raised: reconciliation has to be maximally tolerant of per-item
/// noise. A single item is its own line.
///
/// The sort key is total over all item fields, so groupings and the
/// horizontal order within each line are identical regardless of input
/// item order.
pub fn cluster_items(
    engine: &EngineId,
    items: &[DetectionItem],
    y_tolerance: f64,
) -> Vec<EngineLine> {
    let mut sorted: Vec<&DetectionItem> = items.iter().filter(|i| !i.is_malformed()).collect();
    sorted.sort_by(|a, b| {
        (
            OrderedFloat(a.bbox.center_y()),
            a.bbox.x1,
            a.bbox.y1,
            a.bbox.x2,
            a.bbox.y2,
            a.text.as_str(),
        )
            .cmp(&(
                OrderedFloat(b.bbox.center_y()),
                b.bbox.x1,
                b.bbox.y1,
                b.bbox.x2,
                b.bbox.y2,
                b.text.as_str(),
            ))
    });

    // Fold over sorted items: the open line is the only mutable state and
    // it never escapes a single call.
    let (mut lines, open) = sorted.into_iter().fold(
        (Vec::new(), None::<OpenLine>),
        |(mut lines, open), item| match open {
            Some(mut line)
                if (item.bbox.center_y() - line.mean_center()).abs() <= y_tolerance =>
            {
                line.push(item.clone());
                (lines, Some(line))
            }
            Some(line) => {
                lines.push(line.close(engine));
                (lines, Some(OpenLine::start(item.clone())))
            }
            None => (lines, Some(OpenLine::start(item.clone()))),
        },
    );
    if let Some(line) = open {
        lines.push(line.close(engine));
    }

    lines.sort_by_key(|l| OrderedFloat(l.y_center()));
    lines
}

//! Cross-engine line alignment.
//!
//! Matches clustered lines from different recognizers that represent the
//! same physical page line. Tolerates the vertical jitter between engines
//! (different baselines, different box-padding conventions) while keeping
//! physical reading order.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::trace;

use crate::layout::line::EngineLine;
use crate::recognizer::EngineId;

/// One physical page line as seen (or not seen) by each recognizer.
///
/// Holds at most one line per engine, in the order engines were processed.
#[derive(Debug, Clone)]
pub struct AlignedLine {
    lines: IndexMap<EngineId, EngineLine>,
    y_center: f64,
}

impl AlignedLine {
    fn new(line: EngineLine) -> Self {
        let y_center = line.y_center();
        let mut lines = IndexMap::new();
        lines.insert(line.engine().clone(), line);
        Self { lines, y_center }
    }

    /// Adds a member line and re-averages the group's center, so later
    /// matches benefit from the refined position.
    fn add(&mut self, line: EngineLine) {
        debug_assert!(!self.lines.contains_key(line.engine()));
        self.lines.insert(line.engine().clone(), line);
        self.y_center =
            self.lines.values().map(EngineLine::y_center).sum::<f64>() / self.lines.len() as f64;
    }

    fn contains_engine(&self, engine: &EngineId) -> bool {
        self.lines.contains_key(engine)
    }

    /// Member lines keyed by engine, in engine processing order.
    pub fn lines(&self) -> &IndexMap<EngineId, EngineLine> {
        &self.lines
    }

    /// Representative vertical position of the physical line.
    pub fn y_center(&self) -> f64 {
        self.y_center
    }
}

/// Aligns per-engine line sequences into physical page lines.
///
/// The first sequence is the reference ordering (the orchestrator puts the
/// primary engine first). Each subsequent line joins the existing group
/// with the smallest vertical distance within `y_tolerance` that does not
/// already hold a line from its engine; ties prefer the earliest-created
/// group to keep ordering stable; no match creates a new group. Output is
/// sorted by group center, creation order breaking ties.
pub fn align_engine_lines(engine_lines: Vec<Vec<EngineLine>>, y_tolerance: f64) -> Vec<AlignedLine> {
    let mut groups: Vec<AlignedLine> = Vec::new();

    for lines in engine_lines {
        for line in lines {
            let mut best: Option<(usize, f64)> = None;
            for (idx, group) in groups.iter().enumerate() {
                if group.contains_engine(line.engine()) {
                    continue;
                }
                let dist = (line.y_center() - group.y_center()).abs();
                if dist > y_tolerance {
                    continue;
                }
                // Strict less keeps the earliest group on equal distance.
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((idx, dist));
                }
            }
            match best {
                Some((idx, dist)) => {
                    trace!(
                        engine = %line.engine(),
                        y = line.y_center(),
                        group = idx,
                        dist,
                        "aligned line to existing group"
                    );
                    groups[idx].add(line);
                }
                None => {
                    trace!(engine = %line.engine(), y = line.y_center(), "new aligned group");
                    groups.push(AlignedLine::new(line));
                }
            }
        }
    }

    // Stable: groups created at the same center keep creation order.
    groups.sort_by_key(|g| OrderedFloat(g.y_center()));
    groups
}

//! Merge orchestrator.
//!
//! Drives clustering, alignment and voting across all recognizers for one
//! page and assembles the merged document plus its statistics. The merge
//! is a pure, synchronous computation over already-collected recognizer
//! outputs: identical inputs and parameters always yield identical output,
//! which is what makes per-line provenance auditable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, RoverError};
use crate::layout::cluster::cluster_items;
use crate::layout::line::EngineLine;
use crate::layout::params::MergeParams;
use crate::merge::align::align_engine_lines;
use crate::merge::confidence::ConfidenceNormalizer;
use crate::merge::vote::vote_line;
use crate::recognizer::{EngineId, EngineResult};

/// The merged page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverResult {
    /// Voted line texts in physical reading order.
    pub lines: Vec<String>,
    /// Lines joined by single newlines.
    pub text: String,
    /// Physical lines that lacked consensus and were filled from the best
    /// available single source.
    pub gaps_filled: usize,
    /// Per engine, how many lines it contributed the winning text for.
    pub engine_contributions: IndexMap<EngineId, usize>,
}

impl RoverResult {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            text: String::new(),
            gaps_filled: 0,
            engine_contributions: IndexMap::new(),
        }
    }
}

/// Merges the recognizers' page results into one consensus document.
///
/// Engines with `success == false` or no items are excluded without
/// aborting: the merge degrades gracefully down to a single engine, and
/// to an empty document when none succeeded. Inputs are never mutated.
///
/// Engines are processed in a deterministic order: the primary engine (if
/// configured and usable) anchors the alignment ordering, the rest follow
/// lexicographically.
///
/// # Errors
/// `min_agreement < 1`, a non-finite or negative tolerance, or a
/// `primary_engine` naming no supplied engine are configuration errors
/// and fail eagerly.
pub fn merge_page(results: &[EngineResult], params: &MergeParams) -> Result<RoverResult> {
    params.validate()?;
    if let Some(primary) = &params.primary_engine {
        if !results.iter().any(|r| r.engine == *primary) {
            return Err(RoverError::UnknownPrimaryEngine(primary.clone()));
        }
    }

    let mut usable: Vec<&EngineResult> = Vec::new();
    for result in results {
        if result.is_usable() {
            usable.push(result);
        } else {
            debug!(
                engine = %result.engine,
                error = result.error.as_deref().unwrap_or("no items"),
                "engine excluded from merge"
            );
        }
    }

    usable.sort_by(|a, b| {
        let a_primary = Some(&a.engine) == params.primary_engine.as_ref();
        let b_primary = Some(&b.engine) == params.primary_engine.as_ref();
        b_primary.cmp(&a_primary).then_with(|| a.engine.cmp(&b.engine))
    });
    if let Some(primary) = &params.primary_engine {
        if !usable.iter().any(|r| r.engine == *primary) {
            warn!(engine = %primary, "primary engine produced no usable output");
        }
    }

    let engine_lines: Vec<Vec<EngineLine>> = usable
        .iter()
        .map(|r| cluster_items(&r.engine, &r.items, params.cluster_y_tolerance))
        .filter(|lines| !lines.is_empty())
        .collect();
    let participating = engine_lines.len();
    if participating == 0 {
        return Ok(RoverResult::empty());
    }

    let aligned = align_engine_lines(engine_lines, params.align_y_tolerance);
    let normalizer = ConfidenceNormalizer::new(params.confidence_ranges.clone());

    // How many agreeing engines a line needs before it is not a gap. A
    // single participating engine can never be in disagreement with
    // itself, so lone merges report no gaps.
    let consensus_need = params.min_agreement.max(2).min(participating);

    let mut lines = Vec::with_capacity(aligned.len());
    let mut gaps_filled = 0usize;
    let mut engine_contributions: IndexMap<EngineId, usize> = IndexMap::new();

    for group in &aligned {
        let voted = vote_line(group, params.min_agreement, &normalizer);
        if voted.engines.len() < consensus_need {
            gaps_filled += 1;
        }
        *engine_contributions.entry(voted.winner.clone()).or_insert(0) += 1;
        lines.push(voted.text);
    }

    let text = lines.join("\n");
    debug!(
        engines = participating,
        lines = lines.len(),
        gaps_filled,
        "page merged"
    );

    Ok(RoverResult {
        lines,
        text,
        gaps_filled,
        engine_contributions,
    })
}

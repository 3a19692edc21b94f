//! Character-level alignment and weighted voting.
//!
//! Finer-grained reconciliation inside a single physical line, for when
//! recognizers agree on the line but disagree on individual characters
//! (one glyph misread). Candidates align onto a spine sequence and each
//! spine column is decided by confidence-weighted vote; a candidate with
//! no character at a column votes for absence, and a winning absence
//! emits nothing. Character insertions relative to the spine are
//! discarded.

use ordered_float::OrderedFloat;

use crate::recognizer::EngineId;

/// Weight of an absence vote relative to the candidate's mean confidence.
const ABSENCE_FACTOR: f64 = 0.5;

/// One engine's reading of a line, character by character, with
/// per-character normalized confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct CharCandidate {
    pub engine: EngineId,
    pub chars: Vec<(char, f64)>,
}

impl CharCandidate {
    pub fn new(engine: impl Into<EngineId>, chars: Vec<(char, f64)>) -> Self {
        Self {
            engine: engine.into(),
            chars,
        }
    }

    fn total_confidence(&self) -> f64 {
        self.chars.iter().map(|&(_, c)| c).sum()
    }

    fn mean_confidence(&self) -> f64 {
        if self.chars.is_empty() {
            0.0
        } else {
            self.total_confidence() / self.chars.len() as f64
        }
    }
}

/// Reconciled character sequence with its average column confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct CharVote {
    pub text: String,
    pub confidence: f64,
}

/// Aligns `cand` onto `spine` with Needleman-Wunsch (match +2, mismatch
/// -1, gap -1) and returns, per spine column, the candidate character
/// aligned there, if any.
fn align_to_spine(spine: &[(char, f64)], cand: &[(char, f64)]) -> Vec<Option<(char, f64)>> {
    const MATCH: i32 = 2;
    const MISMATCH: i32 = -1;
    const GAP: i32 = -1;

    let m = spine.len();
    let n = cand.len();
    let mut score = vec![vec![0i32; n + 1]; m + 1];
    for (i, row) in score.iter_mut().enumerate() {
        row[0] = GAP * i as i32;
    }
    for j in 0..=n {
        score[0][j] = GAP * j as i32;
    }
    for i in 1..=m {
        for j in 1..=n {
            let sub = if spine[i - 1].0 == cand[j - 1].0 {
                MATCH
            } else {
                MISMATCH
            };
            score[i][j] = (score[i - 1][j - 1] + sub)
                .max(score[i - 1][j] + GAP)
                .max(score[i][j - 1] + GAP);
        }
    }

    // Traceback, preferring substitution over gaps for determinism.
    let mut columns = vec![None; m];
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        let sub = if spine[i - 1].0 == cand[j - 1].0 {
            MATCH
        } else {
            MISMATCH
        };
        if score[i][j] == score[i - 1][j - 1] + sub {
            columns[i - 1] = Some(cand[j - 1]);
            i -= 1;
            j -= 1;
        } else if score[i][j] == score[i - 1][j] + GAP {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    columns
}

/// Reconciles per-engine character sequences for one physical line.
///
/// The spine is the candidate with the highest summed confidence (ties:
/// longest, then first supplied). Per column, each aligned character votes
/// with its confidence and absent candidates vote for emitting nothing,
/// weighted by [`ABSENCE_FACTOR`] times their mean confidence; ties break
/// toward the spine's character, then toward the smallest character. The
/// result confidence is the mean winning vote share over emitted columns,
/// 0.0 for an empty result.
pub fn vote_characters(candidates: &[CharCandidate]) -> CharVote {
    let Some(spine_idx) = (0..candidates.len()).max_by_key(|&i| {
        (
            OrderedFloat(candidates[i].total_confidence()),
            candidates[i].chars.len(),
            std::cmp::Reverse(i),
        )
    }) else {
        return CharVote {
            text: String::new(),
            confidence: 0.0,
        };
    };
    let spine = &candidates[spine_idx].chars;
    if spine.is_empty() {
        return CharVote {
            text: String::new(),
            confidence: 0.0,
        };
    }

    let alignments: Vec<Vec<Option<(char, f64)>>> = candidates
        .iter()
        .enumerate()
        .map(|(i, cand)| {
            if i == spine_idx {
                spine.iter().map(|&c| Some(c)).collect()
            } else {
                align_to_spine(spine, &cand.chars)
            }
        })
        .collect();

    let mut text = String::new();
    let mut share_sum = 0.0;
    let mut emitted = 0usize;

    for col in 0..spine.len() {
        // BTreeMap keeps char iteration deterministic for the tie-break.
        let mut weights: std::collections::BTreeMap<char, f64> = std::collections::BTreeMap::new();
        let mut absence = 0.0;
        for (cand, alignment) in candidates.iter().zip(&alignments) {
            match alignment[col] {
                Some((ch, conf)) => *weights.entry(ch).or_insert(0.0) += conf,
                None => absence += ABSENCE_FACTOR * cand.mean_confidence(),
            }
        }

        let spine_char = spine[col].0;
        let mut winner: Option<(char, f64)> = None;
        for (&ch, &w) in &weights {
            let better = match winner {
                None => true,
                Some((best_ch, best_w)) => {
                    w > best_w
                        || (w == best_w && ch == spine_char && best_ch != spine_char)
                }
            };
            if better {
                winner = Some((ch, w));
            }
        }

        let (ch, w) = winner.unwrap_or((spine_char, 0.0));
        if absence > w {
            continue;
        }
        let total: f64 = weights.values().sum::<f64>() + absence;
        text.push(ch);
        share_sum += if total > 0.0 { w / total } else { 0.0 };
        emitted += 1;
    }

    CharVote {
        confidence: if emitted == 0 {
            0.0
        } else {
            share_sum / emitted as f64
        },
        text,
    }
}

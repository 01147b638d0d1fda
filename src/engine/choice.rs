//! Candidate pools and randomized choice
//!
//! Scored moves are shaped by a novelty penalty, narrowed to a near-best
//! pool and picked with a softmax over the pool.

use crate::board::{BoardLayout, EdgeId};

use super::context::DecisionRng;

/// Share of the novelty penalty applied to edges next to a recent move
const ADJACENT_SHARE: f64 = 0.55;

/// Lowest temperature used by the softmax
const MIN_TEMPERATURE: f64 = 0.08;

/// A move and its (shaped) score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub edge: EdgeId,
    pub score: f64,
}

impl Candidate {
    pub fn new(edge: EdgeId, score: f64) -> Self {
        Self { edge, score }
    }
}

/// Best score first, then lowest edge id.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.edge.cmp(&b.edge)));
}

/// Penalize replaying or crowding the AI's recent edges, then sort.
///
/// A recent edge weighs `(i + 1) / len` by its position `i` in the history
/// (newest = 1). Replaying it costs the full `penalty` times that weight;
/// touching it (shared node or zone) costs a fraction.
pub fn apply_novelty(board: &BoardLayout, candidates: &mut [Candidate], recent: &[EdgeId], penalty: f64) {
    if penalty > 0.0 && !recent.is_empty() {
        let len = recent.len() as f64;
        for candidate in candidates.iter_mut() {
            for (i, &past) in recent.iter().enumerate() {
                let recency = (i + 1) as f64 / len;
                if past == candidate.edge {
                    candidate.score -= recency * penalty;
                } else if board.contains_edge(past)
                    && board.adjacent_edges(past).binary_search(&candidate.edge).is_ok()
                {
                    candidate.score -= recency * penalty * ADJACENT_SHARE;
                }
            }
        }
    }
    sort_candidates(candidates);
}

/// Leading candidates within `delta` of the best, at most `limit` (at least one).
///
/// `candidates` must be sorted with [`sort_candidates`].
pub fn near_best(candidates: &[Candidate], delta: f64, limit: usize) -> Vec<Candidate> {
    let Some(best) = candidates.first() else {
        return Vec::new();
    };
    let floor = best.score - delta.max(0.0);
    candidates
        .iter()
        .take(limit.max(1))
        .take_while(|c| c.score >= floor)
        .copied()
        .collect()
}

/// Softmax pick over `candidates` at `temperature`.
///
/// Falls back to the first candidate if the weights degenerate.
pub fn weighted_choice(candidates: &[Candidate], temperature: f64, rng: &mut DecisionRng) -> Option<EdgeId> {
    let first = candidates.first()?;
    if candidates.len() == 1 {
        return Some(first.edge);
    }

    let t = temperature.max(MIN_TEMPERATURE);
    let max = candidates.iter().map(|c| c.score).fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = candidates.iter().map(|c| ((c.score - max) / t).exp()).collect();
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Some(first.edge);
    }

    let mut roll = rng.unit() * total;
    for (candidate, weight) in candidates.iter().zip(&weights) {
        if roll < *weight {
            return Some(candidate.edge);
        }
        roll -= weight;
    }
    candidates.last().map(|c| c.edge)
}

//! Move ordering for alpha-beta
//!
//! Priority, highest first: the remembered best move, captures, safe moves,
//! then the hard-tier static score. Ties fall back to ascending edge id so
//! ordering (and therefore search) is deterministic.

use std::cmp::Reverse;

use crate::board::{BoardLayout, EdgeId, GameState};
use crate::eval::policy::HARD;
use crate::eval::{move_metrics, static_move_score};

/// Sort key of one move; larger sorts first.
type OrderKey = (bool, bool, bool, i64);

#[inline]
fn order_key(board: &BoardLayout, state: &GameState, edge: EdgeId, preferred: Option<EdgeId>) -> OrderKey {
    let metrics = move_metrics(board, state, edge);
    let score = static_move_score(board, state, edge, &HARD.weights);
    (
        preferred == Some(edge),
        metrics.captures > 0,
        metrics.safe,
        score.round() as i64,
    )
}

/// Legal moves of `state`, best candidates first.
pub fn ordered_moves(board: &BoardLayout, state: &GameState, preferred: Option<EdgeId>) -> Vec<EdgeId> {
    let mut keyed: Vec<(OrderKey, EdgeId)> = state
        .legal_moves(board)
        .map(|edge| (order_key(board, state, edge, preferred), edge))
        .collect();
    keyed.sort_by_key(|&(key, edge)| (Reverse(key), edge));
    keyed.into_iter().map(|(_, edge)| edge).collect()
}

/// Legal moves that capture at least one zone, in [`ordered_moves`] order.
pub fn capture_moves(board: &BoardLayout, state: &GameState) -> Vec<EdgeId> {
    let mut moves: Vec<(i64, EdgeId)> = state
        .legal_moves(board)
        .filter_map(|edge| {
            let captures = move_metrics(board, state, edge).captures;
            (captures > 0).then(|| {
                let score = static_move_score(board, state, edge, &HARD.weights);
                (score.round() as i64, edge)
            })
        })
        .collect();
    moves.sort_by_key(|&(score, edge)| (Reverse(score), edge));
    moves.into_iter().map(|(_, edge)| edge).collect()
}

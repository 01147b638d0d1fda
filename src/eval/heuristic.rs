//! Full-state evaluation for search leaves
//!
//! Scores a position from one fixed player's perspective:
//! - Score differential (dominant term)
//! - Open thirds, good for whoever moves next
//! - Zones at two edges (unstable), penalized
//! - Quiet zones, small bonus
//! - Safe moves left, again good for the side to move

use crate::board::{BoardLayout, GameState, Player};

use super::tactics::is_safe;

/// Weights of the leaf evaluation terms
pub struct EvalWeights;

impl EvalWeights {
    /// Per zone of score lead
    pub const SCORE: i32 = 120;
    /// Per open third, signed by the side to move
    pub const OPEN_THIRD: i32 = 27;
    /// Per zone with exactly two edges
    pub const UNSTABLE: i32 = 10;
    /// Per open zone with at most one edge
    pub const LOW_RISK: i32 = 2;
    /// Per safe move, signed by the side to move
    pub const SAFE_MOVE: i32 = 4;
    /// Per zone of score lead once the game is over
    pub const TERMINAL: i32 = 10_000;
}

/// Evaluate `state` for `perspective`.
///
/// Positive values favour `perspective`. Finished games return
/// [`terminal_score`], which dominates every non-terminal value.
///
/// # Example
///
/// ```
/// use enclose::board::{BoardPreset, GameState, Player};
/// use enclose::eval::evaluate;
///
/// let board = BoardPreset::Mini.layout();
/// let state = GameState::new();
///
/// // Every move is safe on an empty board: the side to move is better off
/// assert!(evaluate(&board, &state, Player::X) > 0);
/// assert!(evaluate(&board, &state, Player::O) < 0);
/// ```
#[must_use]
pub fn evaluate(board: &BoardLayout, state: &GameState, perspective: Player) -> i32 {
    if state.is_over(board) {
        return terminal_score(state, perspective);
    }

    let opponent = perspective.opponent();
    let lead = state.score(perspective) as i32 - state.score(opponent) as i32;
    let turn_sign = if state.current_player() == perspective { 1 } else { -1 };

    let mut open_thirds = 0;
    let mut unstable = 0;
    let mut low_risk = 0;
    for zone in 0..board.zone_count() {
        if state.is_owned(zone) {
            continue;
        }
        match state.zone_edge_count(board, zone) {
            3 => open_thirds += 1,
            2 => unstable += 1,
            _ => low_risk += 1,
        }
    }

    let safe_moves = state
        .legal_moves(board)
        .filter(|&edge| is_safe(board, state, edge))
        .count() as i32;

    lead * EvalWeights::SCORE + open_thirds * EvalWeights::OPEN_THIRD * turn_sign
        - unstable * EvalWeights::UNSTABLE
        + low_risk * EvalWeights::LOW_RISK
        + safe_moves * EvalWeights::SAFE_MOVE * turn_sign
}

/// Final score differential scaled far beyond any heuristic value.
#[inline]
#[must_use]
pub fn terminal_score(state: &GameState, perspective: Player) -> i32 {
    let lead = state.score(perspective) as i32 - state.score(perspective.opponent()) as i32;
    lead * EvalWeights::TERMINAL
}

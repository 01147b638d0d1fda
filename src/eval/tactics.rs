//! Per-edge tactical classification
//!
//! Every heuristic term is local: an edge only affects the (one or two)
//! zones it belongs to. A zone at 3 drawn edges is capturable by whoever
//! moves next, so raising a zone from 2 to 3 hands a capture away.

use crate::board::{BoardLayout, EdgeId, GameState, IdSet};
use crate::rules::draw_edge;

use super::policy::TacticalWeights;

/// Effect of drawing one edge on the zones it touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveMetrics {
    /// Zones at 3 edges that this move completes
    pub captures: usize,
    /// Zones raised from 2 to 3 edges
    pub creates_third: usize,
    /// Zones raised from 1 to 2 edges
    pub creates_second: usize,
    /// No touched open zone currently has exactly 2 edges
    pub safe: bool,
}

/// Classify `edge` against the current state.
///
/// Owned zones are ignored: they are complete and can no longer change.
///
/// # Example
///
/// ```
/// use enclose::board::{BoardPreset, GameState};
/// use enclose::eval::move_metrics;
/// use enclose::rules::apply_move;
///
/// let board = BoardPreset::Mini.layout();
/// let mut state = GameState::new();
/// for edge in [0, 1] {
///     state = apply_move(&board, &state, edge).state;
/// }
///
/// // Zone 0 now has two sides drawn: a third one gives it away
/// let metrics = move_metrics(&board, &state, 3);
/// assert_eq!(metrics.creates_third, 1);
/// assert!(!metrics.safe);
/// ```
pub fn move_metrics(board: &BoardLayout, state: &GameState, edge: EdgeId) -> MoveMetrics {
    let mut metrics = MoveMetrics {
        safe: true,
        ..MoveMetrics::default()
    };
    for &zone in board.zones_of(edge) {
        if state.is_owned(zone) {
            continue;
        }
        match state.zone_edge_count(board, zone) {
            3 => metrics.captures += 1,
            2 => {
                metrics.creates_third += 1;
                metrics.safe = false;
            }
            1 => metrics.creates_second += 1,
            _ => {}
        }
    }
    metrics
}

/// True iff drawing `edge` opens no zone to a capture.
#[inline]
pub fn is_safe(board: &BoardLayout, state: &GameState, edge: EdgeId) -> bool {
    board
        .zones_of(edge)
        .iter()
        .all(|&zone| state.is_owned(zone) || state.zone_edge_count(board, zone) != 2)
}

/// Positional bias in `[0, 1]`, higher near the board center.
#[inline]
pub fn center_weight(board: &BoardLayout, edge: EdgeId) -> f64 {
    board.center_weight(edge)
}

/// Undrawn edges that open no zone.
pub fn safe_edges(board: &BoardLayout, state: &GameState) -> IdSet {
    state
        .legal_moves(board)
        .filter(|&edge| is_safe(board, state, edge))
        .collect()
}

/// Captures, open thirds and safe replies left to the opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplyPressure {
    /// Sum of zones every reply would capture
    pub immediate_captures: usize,
    /// Sum of open thirds every reply would create
    pub open_thirds: usize,
    /// Replies that open nothing
    pub safe_replies: usize,
}

/// Scan every reply available after `edge` is drawn.
///
/// If the move captured, the replies are the mover's own follow-ups; the
/// same counts are reported either way.
pub fn reply_pressure(board: &BoardLayout, state: &GameState, edge: EdgeId) -> ReplyPressure {
    let mut next = *state;
    draw_edge(board, &mut next, edge);

    let mut pressure = ReplyPressure::default();
    for reply in next.legal_moves(board) {
        let metrics = move_metrics(board, &next, reply);
        pressure.immediate_captures += metrics.captures;
        pressure.open_thirds += metrics.creates_third;
        if metrics.safe {
            pressure.safe_replies += 1;
        }
    }
    pressure
}

/// Light heuristic score of one move: captures, openings, safety and center.
pub fn static_move_score(
    board: &BoardLayout,
    state: &GameState,
    edge: EdgeId,
    weights: &TacticalWeights,
) -> f64 {
    let metrics = move_metrics(board, state, edge);
    let mut score = metrics.captures as f64 * weights.capture_reward
        - metrics.creates_third as f64 * weights.third_penalty
        + metrics.creates_second as f64 * weights.second_bonus
        + center_weight(board, edge) * weights.center_bonus;
    if metrics.safe {
        score += weights.safety_bonus;
    }
    score
}

/// [`static_move_score`] plus one ply of opponent pressure.
///
/// Only the pressure weights that are non-zero trigger the reply scan.
pub fn pressure_move_score(
    board: &BoardLayout,
    state: &GameState,
    edge: EdgeId,
    weights: &TacticalWeights,
) -> f64 {
    let base = static_move_score(board, state, edge, weights);
    if weights.immediate_capture_penalty == 0.0
        && weights.open_third_penalty == 0.0
        && weights.safe_reply_bonus == 0.0
    {
        return base;
    }
    let pressure = reply_pressure(board, state, edge);
    base - pressure.immediate_captures as f64 * weights.immediate_capture_penalty
        - pressure.open_thirds as f64 * weights.open_third_penalty
        + pressure.safe_replies as f64 * weights.safe_reply_bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;
    use crate::eval::policy::{EASY, HARD, MEDIUM};
    use crate::rules::apply_move;

    fn play_all(board: &BoardLayout, edges: &[EdgeId]) -> GameState {
        edges
            .iter()
            .fold(GameState::new(), |state, &edge| apply_move(board, &state, edge).state)
    }

    #[test]
    fn test_empty_board_all_safe() {
        let board = BoardPreset::Standard.layout();
        let state = GameState::new();
        assert_eq!(safe_edges(&board, &state).len(), board.edge_count());
        for edge in 0..board.edge_count() {
            let metrics = move_metrics(&board, &state, edge);
            assert_eq!(metrics.captures, 0);
            assert_eq!(metrics.creates_third, 0);
            assert_eq!(metrics.creates_second, 0);
            assert!(metrics.safe);
        }
    }

    #[test]
    fn test_metrics_progression() {
        let board = BoardPreset::Mini.layout();
        // Zone 0 = [0,1,2,3]
        let one = play_all(&board, &[0]);
        assert_eq!(move_metrics(&board, &one, 1).creates_second, 1);

        let two = play_all(&board, &[0, 1]);
        let metrics = move_metrics(&board, &two, 3);
        assert_eq!(metrics.creates_third, 1);
        assert!(!metrics.safe);
        assert!(!is_safe(&board, &two, 3));

        let three = play_all(&board, &[0, 1, 3]);
        let metrics = move_metrics(&board, &three, 2);
        assert_eq!(metrics.captures, 1);
        // Edge 2 also touches zone 2, still empty
        assert!(metrics.safe);
    }

    #[test]
    fn test_safe_edges_excludes_openers() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1]);
        let safe = safe_edges(&board, &state);
        assert!(!safe.contains(2));
        assert!(!safe.contains(3));
        assert!(!safe.contains(0));
        assert!(safe.contains(10));
    }

    #[test]
    fn test_capture_outscores_quiet_move() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1, 3]);
        for weights in [&EASY.weights, &MEDIUM.weights, &HARD.weights] {
            let capture = static_move_score(&board, &state, 2, weights);
            let quiet = static_move_score(&board, &state, 20, weights);
            assert!(capture > quiet);
        }
    }

    #[test]
    fn test_opener_scores_below_safe_move() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1]);
        let opener = pressure_move_score(&board, &state, 3, &MEDIUM.weights);
        let quiet = pressure_move_score(&board, &state, 20, &MEDIUM.weights);
        assert!(quiet > opener);
    }

    #[test]
    fn test_reply_pressure_counts_gift() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1]);
        // Drawing 3 leaves edge 2 to complete zone 0
        let pressure = reply_pressure(&board, &state, 3);
        assert_eq!(pressure.immediate_captures, 1);

        let quiet = reply_pressure(&board, &state, 20);
        assert_eq!(quiet.immediate_captures, 0);
    }
}

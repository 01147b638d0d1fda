//! Move application and zone capture
//!
//! Drawing an edge captures every unowned zone it touches whose edges are now
//! all drawn. Capturing at least one zone keeps the turn; otherwise the turn
//! passes. The same transition drives real play and AI look-ahead.

use crate::board::{BoardLayout, EdgeId, GameState, IdSet, Player};

/// Zones completed by a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// Player who drew the edge
    pub mover: Player,
    /// Zones captured by the move (at most the zones incident to the edge)
    pub zones: IdSet,
}

impl Capture {
    /// Number of zones captured
    #[inline]
    pub fn count(&self) -> usize {
        self.zones.len()
    }

    /// True if the mover keeps the turn
    #[inline]
    pub fn any(&self) -> bool {
        !self.zones.is_empty()
    }
}

/// Result of [`apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// State after the move (unchanged if not played)
    pub state: GameState,
    /// False if the edge was unknown or already drawn
    pub played: bool,
    /// Zones captured by the move
    pub captures: usize,
}

impl MoveOutcome {
    /// True if the move captured at least one zone
    #[inline]
    pub fn captured(&self) -> bool {
        self.captures > 0
    }
}

/// Check that `edge` exists and is still undrawn.
#[inline]
pub fn is_legal(board: &BoardLayout, state: &GameState, edge: EdgeId) -> bool {
    board.contains_edge(edge) && !state.is_occupied(edge)
}

/// Draw `edge` in place and resolve captures.
///
/// Precondition: the edge is legal. Used directly by search on private copies.
#[inline]
pub fn draw_edge(board: &BoardLayout, state: &mut GameState, edge: EdgeId) -> Capture {
    debug_assert!(is_legal(board, state, edge));

    let mover = state.current_player();
    state.occupy(edge);

    let mut zones = IdSet::new();
    for &zone in board.zones_of(edge) {
        if !state.is_owned(zone) && state.occupied().is_superset(board.zone_mask(zone)) {
            state.claim(zone, mover);
            zones.insert(zone);
        }
    }

    if zones.is_empty() {
        state.pass_turn();
    }

    Capture { mover, zones }
}

/// Apply a move, returning the next state.
///
/// An illegal edge is a no-op reported as `played == false`.
///
/// # Example
///
/// ```
/// use enclose::board::{BoardPreset, GameState, Player};
/// use enclose::rules::apply_move;
///
/// let board = BoardPreset::Mini.layout();
/// let state = GameState::new();
///
/// let outcome = apply_move(&board, &state, 0);
/// assert!(outcome.played);
/// assert!(!outcome.captured());
/// assert_eq!(outcome.state.current_player(), Player::O);
///
/// let again = apply_move(&board, &outcome.state, 0);
/// assert!(!again.played);
/// assert_eq!(again.state, outcome.state);
/// ```
#[must_use]
pub fn apply_move(board: &BoardLayout, state: &GameState, edge: EdgeId) -> MoveOutcome {
    if !is_legal(board, state, edge) {
        return MoveOutcome {
            state: *state,
            played: false,
            captures: 0,
        };
    }

    let mut next = *state;
    let capture = draw_edge(board, &mut next, edge);
    MoveOutcome {
        state: next,
        played: true,
        captures: capture.count(),
    }
}

/// Count zones that `edge` would complete, without playing it.
#[inline]
pub fn count_captures(board: &BoardLayout, state: &GameState, edge: EdgeId) -> usize {
    board
        .zones_of(edge)
        .iter()
        .filter(|&&zone| !state.is_owned(zone) && state.zone_edge_count(board, zone) + 1 == board.zone_mask(zone).len())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;

    fn play_all(board: &BoardLayout, edges: &[EdgeId]) -> GameState {
        edges.iter().fold(GameState::new(), |state, &edge| {
            let outcome = apply_move(board, &state, edge);
            assert!(outcome.played, "edge {edge} rejected");
            outcome.state
        })
    }

    #[test]
    fn test_non_capture_passes_turn() {
        let board = BoardPreset::Mini.layout();
        let outcome = apply_move(&board, &GameState::new(), 10);
        assert!(outcome.played);
        assert_eq!(outcome.captures, 0);
        assert_eq!(outcome.state.current_player(), Player::O);
        assert!(outcome.state.is_occupied(10));
    }

    #[test]
    fn test_rejects_unknown_edge() {
        let board = BoardPreset::Mini.layout();
        let state = GameState::new();
        let outcome = apply_move(&board, &state, board.edge_count());
        assert!(!outcome.played);
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn test_rejects_occupied_edge_idempotently() {
        let board = BoardPreset::Mini.layout();
        let first = apply_move(&board, &GameState::new(), 4);
        let second = apply_move(&board, &first.state, 4);
        let third = apply_move(&board, &second.state, 4);
        assert!(!second.played && !third.played);
        assert_eq!(second.state, first.state);
        assert_eq!(third.state, first.state);
    }

    #[test]
    fn test_capture_keeps_turn() {
        let board = BoardPreset::Mini.layout();
        // X:0 O:1 X:3, then O completes zone 0 with edge 2
        let state = play_all(&board, &[0, 1, 3]);
        assert_eq!(state.current_player(), Player::O);

        let outcome = apply_move(&board, &state, 2);
        assert!(outcome.captured());
        assert_eq!(outcome.captures, 1);
        assert_eq!(outcome.state.owner(0), Some(Player::O));
        assert_eq!(outcome.state.current_player(), Player::O);
    }

    #[test]
    fn test_shared_edge_captures_two_zones() {
        let board = BoardPreset::Mini.layout();
        // Zone 0 = [0,1,2,3], zone 2 = [2,8,9,5]; edge 2 is shared.
        let state = play_all(&board, &[0, 1, 3, 8, 9, 5]);
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(count_captures(&board, &state, 2), 2);

        let outcome = apply_move(&board, &state, 2);
        assert_eq!(outcome.captures, 2);
        assert_eq!(outcome.state.score(Player::X), 2);
        assert_eq!(outcome.state.score(Player::O), 0);
        assert_eq!(outcome.state.current_player(), Player::X);
    }

    #[test]
    fn test_draw_edge_reports_captured_zones() {
        let board = BoardPreset::Mini.layout();
        let mut state = play_all(&board, &[0, 1, 3]);
        let capture = draw_edge(&board, &mut state, 2);
        assert_eq!(capture.mover, Player::O);
        assert_eq!(capture.zones.iter().collect::<Vec<_>>(), vec![0]);
        assert!(capture.any());
    }

    #[test]
    fn test_owners_match_capture_events_over_full_games() {
        use rand::rngs::SmallRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        for preset in BoardPreset::ALL {
            let board = preset.layout();
            for seed in 0..6 {
                let mut order: Vec<EdgeId> = (0..board.edge_count()).collect();
                order.shuffle(&mut SmallRng::seed_from_u64(seed));

                let mut state = GameState::new();
                let mut captured = 0;
                for edge in order {
                    let mover = state.current_player();
                    let outcome = apply_move(&board, &state, edge);
                    assert!(outcome.played);
                    captured += outcome.captures;
                    state = outcome.state;

                    assert_eq!(state.owned_count(), captured, "{} seed {seed}", preset.name());
                    let expected_turn = if outcome.captured() { mover } else { mover.opponent() };
                    assert_eq!(state.current_player(), expected_turn);
                }
                assert!(state.is_over(&board));
                assert_eq!(captured, board.zone_count());
                assert_eq!(state.score(Player::X) + state.score(Player::O), board.zone_count());
            }
        }
    }

    #[test]
    fn test_owner_never_changes() {
        let board = BoardPreset::Mini.layout();
        let mut state = play_all(&board, &[0, 1, 3, 2]);
        assert_eq!(state.owner(0), Some(Player::O));

        for edge in 0..board.edge_count() {
            state = apply_move(&board, &state, edge).state;
            assert_eq!(state.owner(0), Some(Player::O));
        }
        assert!(state.is_over(&board));
    }
}

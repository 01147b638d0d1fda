//! Scores, end of game and winner

use serde::{Deserialize, Serialize};

use crate::board::{BoardLayout, EdgeId, GameState, IdSet, Player};

/// Zones owned by each player. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub x: usize,
    pub o: usize,
}

impl Score {
    #[inline]
    pub fn of(&self, player: Player) -> usize {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.x + self.o
    }
}

/// Final result of a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

#[inline]
pub fn scores(state: &GameState) -> Score {
    Score {
        x: state.score(Player::X),
        o: state.score(Player::O),
    }
}

/// True iff every zone has an owner
#[inline]
pub fn is_game_over(board: &BoardLayout, state: &GameState) -> bool {
    state.is_over(board)
}

/// Result of the match, or `None` while zones remain open
pub fn winner(board: &BoardLayout, state: &GameState) -> Option<Outcome> {
    if !is_game_over(board, state) {
        return None;
    }
    let score = scores(state);
    Some(match score.x.cmp(&score.o) {
        std::cmp::Ordering::Greater => Outcome::Win(Player::X),
        std::cmp::Ordering::Less => Outcome::Win(Player::O),
        std::cmp::Ordering::Equal => Outcome::Draw,
    })
}

/// Undrawn edges that would complete an open zone (a zone one edge short).
///
/// Ascending, without duplicates. Used for hints and by the easy tier.
pub fn near_capture_edges(board: &BoardLayout, state: &GameState) -> Vec<EdgeId> {
    let mut hinted = IdSet::new();
    for zone in 0..board.zone_count() {
        if state.is_owned(zone) {
            continue;
        }
        let mask = board.zone_mask(zone);
        if state.occupied().overlap(mask) + 1 == mask.len() {
            hinted = hinted | mask.difference(state.occupied());
        }
    }
    hinted.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;
    use crate::rules::apply_move;

    #[test]
    fn test_scores_start_at_zero() {
        let state = GameState::new();
        assert_eq!(scores(&state), Score { x: 0, o: 0 });
        assert!(winner(&BoardPreset::Mini.layout(), &state).is_none());
    }

    #[test]
    fn test_zone_zero_example() {
        let board = BoardPreset::Mini.layout();
        let filler = board.zone(12).edge_ids.clone();
        let mut state = GameState::new();

        // X draws zone 0's edges in order; O answers on the bottom zone.
        for (i, &edge) in board.zone(0).edge_ids.clone().iter().enumerate() {
            let outcome = apply_move(&board, &state, edge);
            assert!(outcome.played);
            assert_eq!(outcome.captured(), i == 3);
            state = outcome.state;
            if i < 3 {
                state = apply_move(&board, &state, filler[i]).state;
            }
        }

        assert_eq!(state.owner(0), Some(Player::X));
        assert_eq!(scores(&state), Score { x: 1, o: 0 });

        for edge in 0..board.edge_count() {
            state = apply_move(&board, &state, edge).state;
        }
        assert!(is_game_over(&board, &state));
        assert_eq!(scores(&state).total(), 13);
        assert!(winner(&board, &state).is_some());
    }

    #[test]
    fn test_game_over_iff_all_edges_drawn() {
        for preset in BoardPreset::ALL {
            let board = preset.layout();
            let mut state = GameState::new();
            for edge in 0..board.edge_count() {
                let all_drawn = state.occupied_count() == board.edge_count();
                assert_eq!(is_game_over(&board, &state), all_drawn);
                state = apply_move(&board, &state, edge).state;
            }
            assert!(is_game_over(&board, &state));
            assert_eq!(state.occupied_count(), board.edge_count());
            assert_eq!(scores(&state).total(), board.zone_count());
        }
    }

    #[test]
    fn test_near_capture_edges() {
        let board = BoardPreset::Mini.layout();
        let mut state = GameState::new();
        for edge in [0, 1, 3] {
            state = apply_move(&board, &state, edge).state;
        }
        assert_eq!(near_capture_edges(&board, &state), vec![2]);
    }

    #[test]
    fn test_winner_after_full_game() {
        let board = BoardPreset::Mini.layout();
        let mut state = GameState::new();
        for edge in 0..board.edge_count() {
            state = apply_move(&board, &state, edge).state;
        }
        let score = scores(&state);
        let expected = match score.x.cmp(&score.o) {
            std::cmp::Ordering::Greater => Outcome::Win(Player::X),
            std::cmp::Ordering::Less => Outcome::Win(Player::O),
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        assert_eq!(winner(&board, &state), Some(expected));
        assert_eq!(score.of(Player::X) + score.of(Player::O), 13);
    }
}

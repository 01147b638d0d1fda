//! Exact endgame solver
//!
//! With few edges left the game tree is small enough to solve outright.
//! Leaves are finished games scored by the final zone differential, so no
//! heuristic error can creep in. The solver keeps its own table: its scores
//! are exact values on a different scale from the heuristic search.

use log::debug;

use crate::board::{BoardLayout, EdgeId, GameState, IdSet, Player};
use crate::rules::draw_edge;

use super::alphabeta::{restrict, INF};
use super::ordering::ordered_moves;
use super::{EntryType, TTStats, TranspositionTable, ZobristTable};

/// Result of solving a position to the end.
#[derive(Debug, Clone, PartialEq)]
pub struct EndgameResult {
    /// Optimal move; the lowest edge id among equally good ones
    pub best_move: Option<EdgeId>,
    /// Final zone differential for the side to move under best play
    pub score: i32,
    /// Nodes visited
    pub nodes: u64,
    /// Exact value of every root move that ties or beats the running best
    pub root_scores: Vec<(EdgeId, i32)>,
}

/// Exhaustive alpha-beta over the remaining edges.
///
/// # Example
///
/// ```
/// use enclose::board::{BoardPreset, GameState};
/// use enclose::rules::apply_move;
/// use enclose::search::EndgameSolver;
///
/// let board = BoardPreset::Mini.layout();
/// let mut state = GameState::new();
/// for edge in 0..board.edge_count() - 1 {
///     state = apply_move(&board, &state, edge).state;
/// }
///
/// let mut solver = EndgameSolver::new(1);
/// let result = solver.solve(&board, &state);
/// assert_eq!(result.best_move, Some(board.edge_count() - 1));
/// ```
pub struct EndgameSolver {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    nodes: u64,
    board_key: Option<u64>,
}

impl EndgameSolver {
    #[must_use]
    pub fn new(tt_size_mb: usize) -> Self {
        Self {
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(tt_size_mb),
            nodes: 0,
            board_key: None,
        }
    }

    /// Solve `state` for the player to move.
    pub fn solve(&mut self, board: &BoardLayout, state: &GameState) -> EndgameResult {
        self.solve_root(board, state, None)
    }

    /// Best of the moves in `allowed`, each valued exactly.
    ///
    /// Every legal move is considered when `allowed` holds none of them.
    pub fn solve_among(&mut self, board: &BoardLayout, state: &GameState, allowed: IdSet) -> EndgameResult {
        self.solve_root(board, state, Some(allowed))
    }

    fn solve_root(&mut self, board: &BoardLayout, state: &GameState, allowed: Option<IdSet>) -> EndgameResult {
        self.nodes = 0;
        let key = board.fingerprint();
        if self.board_key != Some(key) {
            self.tt.clear();
            self.board_key = Some(key);
        }
        let perspective = state.current_player();
        let hash = self.zobrist.hash(state, perspective);

        let mut moves = restrict(state.legal_moves(board).collect(), allowed);
        if moves.is_empty() {
            return EndgameResult {
                best_move: None,
                score: final_lead(state, perspective),
                nodes: 0,
                root_scores: Vec::new(),
            };
        }
        // Ascending ids, so strict improvement keeps the lowest among ties
        moves.sort_unstable();

        let mut best_move = moves[0];
        let mut best_score = -INF;
        let mut root_scores = Vec::new();

        for edge in moves {
            let mut next = *state;
            let capture = draw_edge(board, &mut next, edge);
            let child_hash = self.zobrist.update_move(hash, edge, &capture);

            // best - 1 keeps equal scores exact
            let alpha = if best_score == -INF { -INF } else { best_score - 1 };
            let score = self.minimax(board, &next, child_hash, alpha, INF, perspective);

            if score >= best_score {
                root_scores.push((edge, score));
            }
            if score > best_score {
                best_score = score;
                best_move = edge;
            }
        }

        debug!(
            "endgame solved: edge {best_move} lead {best_score} nodes {}",
            self.nodes
        );

        EndgameResult {
            best_move: Some(best_move),
            score: best_score,
            nodes: self.nodes,
            root_scores,
        }
    }

    /// Clear the endgame table. Called when a new match starts.
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    fn minimax(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        hash: u64,
        mut alpha: i32,
        mut beta: i32,
        perspective: Player,
    ) -> i32 {
        self.nodes += 1;
        if state.is_over(board) {
            return final_lead(state, perspective);
        }

        // Every entry is searched to the end, depth only guards collisions
        let depth = state.remaining_count(board) as u16;
        let (alpha0, beta0) = (alpha, beta);
        let entry = self.tt.probe(hash);
        if let Some(entry) = entry {
            if let Some(score) = entry.cutoff(depth, &mut alpha, &mut beta) {
                return score;
            }
        }

        let maximizing = state.current_player() == perspective;
        let mut best_score = if maximizing { -INF } else { INF };
        let mut best_move = None;

        for edge in ordered_moves(board, state, entry.and_then(|e| e.best_move)) {
            let mut next = *state;
            let capture = draw_edge(board, &mut next, edge);
            let child_hash = self.zobrist.update_move(hash, edge, &capture);
            let score = self.minimax(board, &next, child_hash, alpha, beta, perspective);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(edge);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(edge);
                }
                beta = beta.min(best_score);
            }
            if alpha >= beta {
                break;
            }
        }

        let entry_type = EntryType::from_window(best_score, alpha0, beta0);
        self.tt.store(hash, depth, best_score, entry_type, best_move);
        best_score
    }
}

#[inline]
fn final_lead(state: &GameState, perspective: Player) -> i32 {
    state.score(perspective) as i32 - state.score(perspective.opponent()) as i32
}

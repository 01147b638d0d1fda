//! Alpha-Beta search with iterative deepening and transposition table
//!
//! Minimax from the root mover's fixed perspective. The leaf evaluation is
//! not antisymmetric (turn-signed terms), so the maximizing side is decided
//! per node by whose turn it is rather than by negating scores.
//!
//! # Features
//!
//! - Iterative deepening; a timed-out depth is discarded, never trusted
//! - Capturing moves keep the turn and do not consume a ply
//! - Transposition table shared across iterations and decisions
//! - Capture-only extension at the horizon so chains are not cut mid-way
//!
//! # Example
//!
//! ```
//! use enclose::board::{BoardPreset, GameState};
//! use enclose::rules::apply_move;
//! use enclose::search::Searcher;
//!
//! let board = BoardPreset::Mini.layout();
//! let mut state = GameState::new();
//! for edge in [0, 1, 3] {
//!     state = apply_move(&board, &state, edge).state;
//! }
//!
//! let mut searcher = Searcher::new(4);
//! let result = searcher.search(&board, &state, 3);
//! assert_eq!(result.best_move, Some(2)); // completes zone 0
//! ```

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::{BoardLayout, EdgeId, GameState, IdSet, Player};
use crate::eval::{evaluate, terminal_score};
use crate::rules::draw_edge;

use super::ordering::{capture_moves, ordered_moves};
use super::{EntryType, TTStats, TranspositionTable, ZobristTable};

/// Infinity score for alpha-beta bounds
pub(crate) const INF: i32 = i32::MAX / 2;

/// Nodes between two deadline checks
const TIME_CHECK_INTERVAL: u64 = 64;

/// Default number of capture-only plies searched past the horizon
pub const DEFAULT_CAPTURE_PLIES: u16 = 4;

/// Keep the moves in `allowed`, unless that would leave none.
pub(crate) fn restrict(moves: Vec<EdgeId>, allowed: Option<IdSet>) -> Vec<EdgeId> {
    match allowed {
        Some(set) if moves.iter().any(|&e| set.contains(e)) => {
            moves.into_iter().filter(|&e| set.contains(e)).collect()
        }
        _ => moves,
    }
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total alpha-beta cutoffs
    pub beta_cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that returned a usable score
    pub tt_score_hits: u64,
    /// TT probes that provided a best move for ordering
    pub tt_move_hits: u64,
    /// Nodes visited in the capture extension
    pub extension_nodes: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate in percent
    pub fn tt_score_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_score_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Bounds of one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    /// Deepest iteration to run
    pub max_depth: u16,
    /// Soft wall-clock budget; `None` searches every depth to completion
    pub time_budget: Option<Duration>,
    /// Root moves within this distance of the best are scored exactly
    pub root_margin: i32,
    /// Capture-only plies granted past the horizon
    pub capture_plies: u16,
    /// Root moves the search may answer with; `None` or a set with no
    /// legal move allows every move
    pub root_moves: Option<IdSet>,
}

impl SearchLimits {
    /// Untimed search to `max_depth`.
    pub fn depth(max_depth: u16) -> Self {
        Self {
            max_depth,
            time_budget: None,
            root_margin: 0,
            capture_plies: DEFAULT_CAPTURE_PLIES,
            root_moves: None,
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` only if no legal move exists
    pub best_move: Option<EdgeId>,
    /// Evaluation score of the best move, for the side to move
    pub score: i32,
    /// Deepest fully completed iteration (0 = static fallback)
    pub depth: u16,
    /// Total nodes searched
    pub nodes: u64,
    /// Score of every root move in the last completed iteration.
    ///
    /// Exact within `root_margin` of `score`; upper bounds below it.
    pub root_scores: Vec<(EdgeId, i32)>,
    /// True if the deadline interrupted the search
    pub timed_out: bool,
    /// Search diagnostics
    pub stats: SearchStats,
}

/// Iterative-deepening alpha-beta searcher.
pub struct Searcher {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    nodes: u64,
    capture_plies: u16,
    deadline: Option<Instant>,
    stopped: bool,
    stats: SearchStats,
    /// Fingerprint of the board the table was filled on
    board_key: Option<u64>,
}

impl Searcher {
    /// Create a new searcher with the specified transposition table size.
    ///
    /// # Example
    ///
    /// ```
    /// use enclose::search::Searcher;
    ///
    /// let searcher = Searcher::new(8); // 8 MB table
    /// assert_eq!(searcher.tt_stats().used, 0);
    /// ```
    #[must_use]
    pub fn new(tt_size_mb: usize) -> Self {
        Self {
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(tt_size_mb),
            nodes: 0,
            capture_plies: DEFAULT_CAPTURE_PLIES,
            deadline: None,
            stopped: false,
            stats: SearchStats::default(),
            board_key: None,
        }
    }

    /// Untimed search to `max_depth`. Deterministic.
    #[must_use]
    pub fn search(&mut self, board: &BoardLayout, state: &GameState, max_depth: u16) -> SearchResult {
        self.search_with(board, state, SearchLimits::depth(max_depth))
    }

    /// Iterative deepening under `limits`.
    ///
    /// Always returns a legal move when one exists: if no iteration
    /// completes in time, the statically best-ordered move is used. The
    /// table is cleared first when `board` differs from the previous one.
    #[must_use]
    pub fn search_with(&mut self, board: &BoardLayout, state: &GameState, limits: SearchLimits) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;
        self.stats = SearchStats::default();
        self.stopped = false;
        self.capture_plies = limits.capture_plies;
        self.deadline = limits.time_budget.map(|budget| start + budget);
        self.use_board(board);

        let perspective = state.current_player();
        let remaining = state.remaining_count(board);
        let moves = restrict(ordered_moves(board, state, None), limits.root_moves);
        let Some(&fallback) = moves.first() else {
            return SearchResult {
                best_move: None,
                score: terminal_score(state, perspective),
                depth: 0,
                nodes: 0,
                root_scores: Vec::new(),
                timed_out: false,
                stats: SearchStats::default(),
            };
        };

        let static_score = evaluate(board, state, perspective);
        let mut best = SearchResult {
            best_move: Some(fallback),
            score: static_score,
            depth: 0,
            nodes: 0,
            root_scores: vec![(fallback, static_score)],
            timed_out: false,
            stats: SearchStats::default(),
        };

        for depth in 1..=limits.max_depth.max(1) {
            let Some((best_move, score, root_scores)) =
                self.search_root(board, state, depth, perspective, &limits, best.best_move)
            else {
                break;
            };

            best.best_move = Some(best_move);
            best.score = score;
            best.depth = depth;
            best.root_scores = root_scores;
            trace!("depth {depth}: edge {best_move} score {score} nodes {}", self.nodes);

            // Captures keep depth, so this depth already reached every terminal
            if usize::from(depth) >= remaining {
                break;
            }
            if self.out_of_time() {
                break;
            }
        }

        best.nodes = self.nodes;
        best.timed_out = self.stopped;
        best.stats = self.stats.clone();
        best
    }

    /// Get statistics about the transposition table.
    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// Clear the transposition table.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Positions are keyed without the board, so a new board starts a new table.
    fn use_board(&mut self, board: &BoardLayout) {
        let key = board.fingerprint();
        if self.board_key != Some(key) {
            if self.board_key.is_some() {
                debug!("board changed, clearing search table");
            }
            self.tt.clear();
            self.board_key = Some(key);
        }
    }

    #[inline]
    fn out_of_time(&mut self) -> bool {
        if !self.stopped {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                }
            }
        }
        self.stopped
    }

    #[inline]
    fn visit(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            self.out_of_time()
        } else {
            self.stopped
        }
    }

    /// One full root pass. `None` if the deadline interrupted it.
    fn search_root(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        depth: u16,
        perspective: Player,
        limits: &SearchLimits,
        previous_best: Option<EdgeId>,
    ) -> Option<(EdgeId, i32, Vec<(EdgeId, i32)>)> {
        let hash = self.zobrist.hash(state, perspective);
        let preferred = self.tt.get_best_move(hash).or(previous_best);
        let moves = restrict(ordered_moves(board, state, preferred), limits.root_moves);
        let margin = limits.root_margin;

        let mut best_move = *moves.first()?;
        let mut best_score = -INF;
        let mut root_scores = Vec::with_capacity(moves.len());

        for edge in moves {
            let mut next = *state;
            let capture = draw_edge(board, &mut next, edge);
            let child_hash = self.zobrist.update_move(hash, edge, &capture);
            let child_depth = if capture.any() { depth } else { depth - 1 };

            // Scores within the margin of the best stay exact
            let alpha = if best_score == -INF {
                -INF
            } else {
                best_score.saturating_sub(margin.max(0) + 1)
            };
            let score = self.minimax(board, &next, child_hash, child_depth, alpha, INF, perspective);
            if self.stopped {
                return None;
            }

            root_scores.push((edge, score));
            if score > best_score {
                best_score = score;
                best_move = edge;
            }
        }

        // A restricted root is not the value of the position
        if limits.root_moves.is_none() {
            self.tt.store(hash, depth, best_score, EntryType::Exact, Some(best_move));
        }
        Some((best_move, best_score, root_scores))
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        hash: u64,
        depth: u16,
        mut alpha: i32,
        mut beta: i32,
        perspective: Player,
    ) -> i32 {
        if self.visit() {
            return evaluate(board, state, perspective);
        }
        if state.is_over(board) {
            return terminal_score(state, perspective);
        }
        if depth == 0 {
            return self.extend_captures(board, state, alpha, beta, perspective, self.capture_plies);
        }

        let (alpha0, beta0) = (alpha, beta);
        self.stats.tt_probes += 1;
        let entry = self.tt.probe(hash);
        if let Some(entry) = entry {
            if let Some(score) = entry.cutoff(depth, &mut alpha, &mut beta) {
                self.stats.tt_score_hits += 1;
                return score;
            }
        }
        let preferred = entry.and_then(|e| e.best_move);
        if preferred.is_some() {
            self.stats.tt_move_hits += 1;
        }

        let maximizing = state.current_player() == perspective;
        let mut best_score = if maximizing { -INF } else { INF };
        let mut best_move = None;

        for (i, edge) in ordered_moves(board, state, preferred).into_iter().enumerate() {
            let mut next = *state;
            let capture = draw_edge(board, &mut next, edge);
            let child_hash = self.zobrist.update_move(hash, edge, &capture);
            let child_depth = if capture.any() { depth } else { depth - 1 };

            let score = self.minimax(board, &next, child_hash, child_depth, alpha, beta, perspective);
            if self.stopped {
                return score;
            }

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
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        let entry_type = EntryType::from_window(best_score, alpha0, beta0);
        self.tt.store(hash, depth, best_score, entry_type, best_move);
        best_score
    }

    /// Capture-only search past the horizon.
    ///
    /// The side to move may stop (stand pat) or keep taking zones; every
    /// capture keeps the turn, so a whole chain is resolved here.
    fn extend_captures(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        mut alpha: i32,
        mut beta: i32,
        perspective: Player,
        plies: u16,
    ) -> i32 {
        self.stats.extension_nodes += 1;
        if state.is_over(board) {
            return terminal_score(state, perspective);
        }

        let stand_pat = evaluate(board, state, perspective);
        if plies == 0 {
            return stand_pat;
        }
        let captures = capture_moves(board, state);
        if captures.is_empty() {
            return stand_pat;
        }

        let maximizing = state.current_player() == perspective;
        let mut best_score = stand_pat;
        if maximizing {
            if best_score >= beta {
                return best_score;
            }
            alpha = alpha.max(best_score);
        } else {
            if best_score <= alpha {
                return best_score;
            }
            beta = beta.min(best_score);
        }

        for edge in captures {
            let mut next = *state;
            draw_edge(board, &mut next, edge);
            let score = self.extend_captures(board, &next, alpha, beta, perspective, plies - 1);

            if maximizing {
                best_score = best_score.max(score);
                alpha = alpha.max(best_score);
            } else {
                best_score = best_score.min(score);
                beta = beta.min(best_score);
            }
            if alpha >= beta {
                break;
            }
        }

        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;
    use crate::eval::is_safe;
    use crate::rules::apply_move;

    fn play_all(board: &BoardLayout, edges: &[EdgeId]) -> GameState {
        edges.iter().fold(GameState::new(), |state, &edge| {
            let outcome = apply_move(board, &state, edge);
            assert!(outcome.played, "edge {edge} rejected");
            outcome.state
        })
    }

    #[test]
    fn test_search_empty_board() {
        let mut searcher = Searcher::new(4);
        let board = BoardPreset::Mini.layout();
        let result = searcher.search(&board, &GameState::new(), 2);
        assert!(result.best_move.is_some());
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_search_takes_free_capture() {
        let mut searcher = Searcher::new(4);
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1, 3]);
        let result = searcher.search(&board, &state, 4);
        assert_eq!(result.best_move, Some(2));
    }

    #[test]
    fn test_search_avoids_opening_zone() {
        let mut searcher = Searcher::new(4);
        let board = BoardPreset::Mini.layout();
        // Zone 4 (13,14,15,16) and zone 12 (30,33,34,35) at two edges
        let state = play_all(&board, &[13, 14, 33, 34]);
        let result = searcher.search(&board, &state, 3);
        let best = result.best_move.unwrap();
        assert!(is_safe(&board, &state, best), "played unsafe edge {best}");
    }

    #[test]
    fn test_search_terminal_state() {
        let mut searcher = Searcher::new(1);
        let board = BoardPreset::Mini.layout();
        let mut state = GameState::new();
        for edge in 0..board.edge_count() {
            state = apply_move(&board, &state, edge).state;
        }
        let result = searcher.search(&board, &state, 3);
        assert!(result.best_move.is_none());
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn test_search_is_deterministic() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[4, 10, 20]);
        let a = Searcher::new(2).search(&board, &state, 3);
        let b = Searcher::new(2).search(&board, &state, 3);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
        assert_eq!(a.root_scores, b.root_scores);
    }

    #[test]
    fn test_zero_budget_still_returns_move() {
        let mut searcher = Searcher::new(1);
        let board = BoardPreset::Large.layout();
        let limits = SearchLimits {
            max_depth: 30,
            time_budget: Some(Duration::ZERO),
            root_margin: 0,
            capture_plies: 4,
            root_moves: None,
        };
        let result = searcher.search_with(&board, &GameState::new(), limits);
        assert!(result.best_move.is_some());
        assert!(result.timed_out);
    }

    #[test]
    fn test_root_margin_keeps_ties_exact() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[4, 10, 20]);
        let mut searcher = Searcher::new(2);
        let limits = SearchLimits {
            root_margin: 3,
            ..SearchLimits::depth(2)
        };
        let result = searcher.search_with(&board, &state, limits);
        assert_eq!(result.root_scores.len(), board.edge_count() - 3);
        let max = result.root_scores.iter().map(|&(_, s)| s).max().unwrap();
        assert_eq!(max, result.score);
    }

    #[test]
    fn test_root_moves_limit_the_answer() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[13, 14, 33, 34]);
        let allowed: IdSet = [5, 20].into_iter().collect();
        let limits = SearchLimits {
            root_moves: Some(allowed),
            ..SearchLimits::depth(3)
        };

        let result = Searcher::new(1).search_with(&board, &state, limits);
        assert!(allowed.contains(result.best_move.unwrap()));
        assert_eq!(result.root_scores.len(), 2);

        // Also holds for the fallback of an iteration that never completes
        let rushed = SearchLimits {
            time_budget: Some(Duration::ZERO),
            ..limits
        };
        let result = Searcher::new(1).search_with(&board, &state, rushed);
        assert!(allowed.contains(result.best_move.unwrap()));

        let taken: IdSet = [13, 14].into_iter().collect();
        let limits = SearchLimits {
            root_moves: Some(taken),
            ..SearchLimits::depth(2)
        };
        let result = Searcher::new(1).search_with(&board, &state, limits);
        assert_eq!(result.root_scores.len(), board.edge_count() - 4);
    }

    #[test]
    fn test_new_board_clears_table() {
        let mini = BoardPreset::Mini.layout();
        let standard = BoardPreset::Standard.layout();
        let mut searcher = Searcher::new(1);
        let _ = searcher.search(&mini, &play_all(&mini, &[0, 5, 9]), 3);
        assert!(searcher.tt_stats().used > 0);

        let mut full = GameState::new();
        for edge in 0..standard.edge_count() {
            full = apply_move(&standard, &full, edge).state;
        }
        let _ = searcher.search(&standard, &full, 3);
        assert_eq!(searcher.tt_stats().used, 0);

        let state = play_all(&standard, &[0, 5, 9]);
        let reused = searcher.search(&standard, &state, 3);
        let fresh = Searcher::new(1).search(&standard, &state, 3);
        assert_eq!(reused.best_move, fresh.best_move);
        assert_eq!(reused.root_scores, fresh.root_scores);
    }

    #[test]
    fn test_tt_filled_and_cleared() {
        let mut searcher = Searcher::new(1);
        let board = BoardPreset::Mini.layout();
        let _ = searcher.search(&board, &GameState::new(), 2);
        assert!(searcher.tt_stats().used > 0);
        searcher.clear_tt();
        assert_eq!(searcher.tt_stats().used, 0);
    }

    #[test]
    fn test_capture_extension_sees_chain() {
        let board = BoardPreset::Mini.layout();
        // Edge 2 completes zone 0 and leaves zone 2 one short: a two-zone chain
        let state = play_all(&board, &[0, 1, 3, 8, 9]);
        let mut searcher = Searcher::new(1);
        let result = searcher.search(&board, &state, 1);
        assert_eq!(result.best_move, Some(2));
        assert!(result.score > 0);
        assert!(result.stats.extension_nodes > 0);
    }
}

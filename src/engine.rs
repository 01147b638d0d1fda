//! Main AI Engine integrating evaluation, policies and search
//!
//! One decision is dispatched once by difficulty tier:
//!
//! 1. **Easy**: occasional random safe move, free captures unless the miss
//!    roll fires, otherwise a noisy light heuristic and a wide softmax pool
//! 2. **Medium**: every move scored with one ply of opponent pressure,
//!    narrowed to a near-best pool, with occasional exploration
//! 3. **Hard**: exact endgame solver when few edges remain, otherwise
//!    iterative-deepening alpha-beta; near-tied root moves may be varied
//!    outside the endgame phase
//!
//! Every random draw comes from the decision's seeded generator.
//!
//! # Example
//!
//! ```
//! use enclose::board::{BoardPreset, GameState};
//! use enclose::engine::{AIEngine, DecisionContext, SearchType};
//! use enclose::eval::AiLevel;
//! use enclose::rules::apply_move;
//!
//! let board = BoardPreset::Mini.layout();
//! let mut state = GameState::new();
//! for edge in [0, 1, 3] {
//!     state = apply_move(&board, &state, edge).state;
//! }
//!
//! let mut engine = AIEngine::new();
//! let result = engine.choose_move_with_stats(&board, &state, AiLevel::Hard, &DecisionContext::new(1));
//! assert_eq!(result.best_move, Some(2));
//! assert_ne!(result.search_type, SearchType::Terminal);
//! ```

pub mod choice;
pub mod context;

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::board::{BoardLayout, EdgeId, GameState, IdSet};
use crate::config::EngineConfig;
use crate::eval::{
    is_safe, move_metrics, pressure_move_score, search_profile, static_move_score, AiLevel,
    DifficultyPolicy, Phase,
};
use crate::rules::count_captures;
use crate::search::{EndgameSolver, SearchLimits, Searcher, TTStats};

pub use choice::{apply_novelty, near_best, sort_candidates, weighted_choice, Candidate};
pub use context::{splitmix64, DecisionContext, DecisionRng, RECENT_MOVES};

/// Extra temperature of a medium-tier exploratory pick
const EXPLORE_HEAT: f64 = 0.16;

/// How the chosen move was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Took an immediate capture
    Capture,
    /// Softmax over the near-best heuristic pool
    Heuristic,
    /// Deliberate pick just below the best
    Exploratory,
    /// Easy-tier random safe move
    Mistake,
    /// Iterative-deepening alpha-beta
    AlphaBeta,
    /// Exact solve of the remaining edges
    ExactEndgame,
    /// No search iteration finished; statically best move
    Fallback,
    /// No legal move left
    Terminal,
}

/// Result of a decision with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Chosen move, `None` only when the game is over
    pub best_move: Option<EdgeId>,
    /// Score of the chosen move on its tier's scale.
    ///
    /// Heuristic points (rounded) for easy/medium, search score for hard,
    /// final zone lead for the exact endgame.
    pub score: i32,
    /// Path that produced the move
    pub search_type: SearchType,
    /// Tier that made the decision
    pub level: AiLevel,
    /// Completed search depth (0 outside alpha-beta)
    pub depth: u16,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn heuristic(level: AiLevel, edge: Option<EdgeId>, score: f64, search_type: SearchType) -> Self {
        Self {
            best_move: edge,
            score: score.round() as i32,
            search_type,
            level,
            depth: 0,
            time_ms: 0,
            nodes: 0,
        }
    }
}

/// Main AI engine.
///
/// Owns the search tables so they persist between decisions of a match.
/// Call [`AIEngine::clear_cache`] when a new match starts.
pub struct AIEngine {
    searcher: Searcher,
    endgame: EndgameSolver,
    config: EngineConfig,
}

impl AIEngine {
    /// Create a new AI engine with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an AI engine with custom configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use enclose::{AIEngine, EngineConfig};
    ///
    /// let engine = AIEngine::with_config(EngineConfig { tt_size_mb: 2, ..EngineConfig::default() });
    /// assert_eq!(engine.config().tt_size_mb, 2);
    /// ```
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            searcher: Searcher::new(config.tt_size_mb),
            endgame: EndgameSolver::new(config.tt_size_mb),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Choose a move for the player to move, or `None` if the game is over.
    #[must_use]
    pub fn choose_move(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        level: AiLevel,
        ctx: &DecisionContext,
    ) -> Option<EdgeId> {
        self.choose_move_with_stats(board, state, level, ctx).best_move
    }

    /// Choose a move and report how it was found.
    #[must_use]
    pub fn choose_move_with_stats(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        level: AiLevel,
        ctx: &DecisionContext,
    ) -> MoveResult {
        let start = Instant::now();
        let moves: Vec<EdgeId> = state.legal_moves(board).collect();
        if moves.is_empty() {
            return MoveResult::heuristic(level, None, 0.0, SearchType::Terminal);
        }

        let phase = Phase::from_progress(moves.len(), board.edge_count());
        let mut rng = DecisionRng::for_decision(ctx, board, state, level);
        let policy = level.policy();

        let mut result = match level {
            AiLevel::Easy => choose_easy(board, state, &moves, policy, phase, ctx, &mut rng),
            AiLevel::Medium => choose_medium(board, state, &moves, policy, phase, ctx, &mut rng),
            AiLevel::Hard => self.choose_hard(board, state, &moves, phase, ctx, &mut rng),
        };
        result.level = level;
        result.time_ms = start.elapsed().as_millis() as u64;

        info!(
            "{} AI: edge {:?} via {:?} (score {}, depth {}, {} nodes, {}ms)",
            level.name(),
            result.best_move,
            result.search_type,
            result.score,
            result.depth,
            result.nodes,
            result.time_ms
        );
        result
    }

    /// Clear the transposition tables.
    pub fn clear_cache(&mut self) {
        self.searcher.clear_tt();
        self.endgame.clear();
    }

    /// Get statistics about the main transposition table.
    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.searcher.tt_stats()
    }

    fn choose_hard(
        &mut self,
        board: &BoardLayout,
        state: &GameState,
        moves: &[EdgeId],
        phase: Phase,
        ctx: &DecisionContext,
        rng: &mut DecisionRng,
    ) -> MoveResult {
        let remaining = moves.len();

        // While a safe move exists, only safe or capturing answers are allowed
        let any_safe = moves.iter().any(|&e| is_safe(board, state, e));
        let allowed: Option<IdSet> = any_safe.then(|| {
            moves
                .iter()
                .copied()
                .filter(|&e| safe_or_capturing(board, state, e))
                .collect()
        });

        if remaining <= self.config.exact_endgame_threshold {
            let solved = match allowed {
                Some(set) => self.endgame.solve_among(board, state, set),
                None => self.endgame.solve(board, state),
            };
            return MoveResult {
                best_move: solved.best_move,
                score: solved.score,
                search_type: SearchType::ExactEndgame,
                level: AiLevel::Hard,
                depth: remaining as u16,
                time_ms: 0,
                nodes: solved.nodes,
            };
        }

        let policy = AiLevel::Hard.policy();
        let profile = search_profile(remaining, phase);
        let max_depth = match self.config.depth_cap {
            Some(cap) => profile.depth_limit.min(cap),
            None => profile.depth_limit,
        };
        let budget_ms = (profile.time_budget_ms as f64 * self.config.time_scale).round() as u64;
        let delta = policy.candidate_delta.at(phase);
        let limits = SearchLimits {
            max_depth,
            time_budget: Some(Duration::from_millis(budget_ms)),
            root_margin: delta.round() as i32,
            capture_plies: self.config.capture_extension_plies,
            root_moves: allowed,
        };

        let searched = self.searcher.search_with(board, state, limits);
        debug!(
            "hard search: depth {}/{} in budget {budget_ms}ms, timed out {}, tt {}%",
            searched.depth,
            max_depth,
            searched.timed_out,
            self.searcher.tt_stats().usage_percent
        );

        let mut result = MoveResult {
            best_move: searched.best_move,
            score: searched.score,
            search_type: if searched.depth == 0 {
                SearchType::Fallback
            } else {
                SearchType::AlphaBeta
            },
            level: AiLevel::Hard,
            depth: searched.depth,
            time_ms: 0,
            nodes: searched.nodes,
        };

        // The endgame phase always plays the best line
        if phase == Phase::Endgame || searched.depth == 0 {
            return result;
        }

        let floor = searched.score as f64 - delta;
        let mut pool: Vec<Candidate> = searched
            .root_scores
            .iter()
            .filter(|&&(_, score)| score as f64 >= floor)
            .map(|&(edge, score)| Candidate::new(edge, score as f64))
            .collect();
        apply_novelty(board, &mut pool, ctx.recent(), policy.novelty_penalty);
        pool.truncate(policy.candidate_limit.at(phase).max(1));

        if pool.len() > 1 && rng.chance(policy.mistake_chance.at(phase)) {
            if let Some(edge) = weighted_choice(&pool, policy.temperature.at(phase), rng) {
                result.best_move = Some(edge);
                result.search_type = SearchType::Exploratory;
                if let Some(c) = pool.iter().find(|c| c.edge == edge) {
                    result.score = c.score.round() as i32;
                }
            }
        }
        result
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Choose a move with a fresh engine and default configuration.
///
/// Convenience for one-off decisions; a match should keep one
/// [`AIEngine`] so the search tables are reused.
#[must_use]
pub fn choose_move(
    board: &BoardLayout,
    state: &GameState,
    level: AiLevel,
    ctx: &DecisionContext,
) -> Option<EdgeId> {
    AIEngine::new().choose_move(board, state, level, ctx)
}

#[inline]
fn safe_or_capturing(board: &BoardLayout, state: &GameState, edge: EdgeId) -> bool {
    let metrics = move_metrics(board, state, edge);
    metrics.safe || metrics.captures > 0
}

fn choose_easy(
    board: &BoardLayout,
    state: &GameState,
    moves: &[EdgeId],
    policy: &DifficultyPolicy,
    phase: Phase,
    ctx: &DecisionContext,
    rng: &mut DecisionRng,
) -> MoveResult {
    let level = AiLevel::Easy;
    let safe: Vec<EdgeId> = moves.iter().copied().filter(|&e| is_safe(board, state, e)).collect();
    let pool: &[EdgeId] = if safe.is_empty() { moves } else { &safe };

    if rng.chance(policy.mistake_chance.at(phase)) {
        let edge = pool[rng.index(pool.len())];
        return MoveResult::heuristic(level, Some(edge), 0.0, SearchType::Mistake);
    }

    let best_capture = moves
        .iter()
        .map(|&e| (count_captures(board, state, e), e))
        .filter(|&(n, _)| n > 0)
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    if let Some((captures, edge)) = best_capture {
        if !rng.chance(policy.miss_capture_chance.at(phase)) {
            let score = captures as f64 * policy.weights.capture_reward;
            return MoveResult::heuristic(level, Some(edge), score, SearchType::Capture);
        }
    }

    let noise = policy.noise_amplitude.at(phase);
    let mut scored: Vec<Candidate> = pool
        .iter()
        .map(|&edge| {
            let score = static_move_score(board, state, edge, &policy.weights) + rng.noise(noise);
            Candidate::new(edge, score)
        })
        .collect();
    apply_novelty(board, &mut scored, ctx.recent(), policy.novelty_penalty);

    let temperature = policy.temperature.at(phase);
    let candidates = near_best(&scored, policy.candidate_delta.at(phase), policy.candidate_limit.at(phase));
    let edge = weighted_choice(&candidates, temperature, rng).unwrap_or(scored[0].edge);
    pick(level, &scored, edge, SearchType::Heuristic)
}

fn choose_medium(
    board: &BoardLayout,
    state: &GameState,
    moves: &[EdgeId],
    policy: &DifficultyPolicy,
    phase: Phase,
    ctx: &DecisionContext,
    rng: &mut DecisionRng,
) -> MoveResult {
    let level = AiLevel::Medium;
    let any_safe = moves.iter().any(|&e| is_safe(board, state, e));
    let noise = policy.noise_amplitude.at(phase);

    let mut scored: Vec<Candidate> = moves
        .iter()
        .copied()
        .filter(|&edge| !any_safe || safe_or_capturing(board, state, edge))
        .map(|edge| {
            let score = pressure_move_score(board, state, edge, &policy.weights) + rng.noise(noise);
            Candidate::new(edge, score)
        })
        .collect();
    apply_novelty(board, &mut scored, ctx.recent(), policy.novelty_penalty);

    let temperature = policy.temperature.at(phase);
    let limit = policy.candidate_limit.at(phase);
    if scored.len() > 1 && rng.chance(policy.mistake_chance.at(phase)) {
        let explore: Vec<Candidate> = scored.iter().skip(1).take((limit + 1).max(2)).copied().collect();
        if let Some(edge) = weighted_choice(&explore, temperature + EXPLORE_HEAT, rng) {
            return pick(level, &scored, edge, SearchType::Exploratory);
        }
    }

    let candidates = near_best(&scored, policy.candidate_delta.at(phase), limit);
    let edge = weighted_choice(&candidates, temperature, rng).unwrap_or(scored[0].edge);
    pick(level, &scored, edge, SearchType::Heuristic)
}

/// Result for `edge`, reporting its score from `scored`.
fn pick(level: AiLevel, scored: &[Candidate], edge: EdgeId, search_type: SearchType) -> MoveResult {
    let score = scored.iter().find(|c| c.edge == edge).map_or(0.0, |c| c.score);
    MoveResult::heuristic(level, Some(edge), score, search_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;
    use crate::rules::apply_move;

    fn play_all(board: &BoardLayout, edges: &[EdgeId]) -> GameState {
        edges.iter().fold(GameState::new(), |state, &edge| {
            let outcome = apply_move(board, &state, edge);
            assert!(outcome.played, "edge {edge} rejected");
            outcome.state
        })
    }

    fn quick_engine() -> AIEngine {
        AIEngine::with_config(EngineConfig {
            tt_size_mb: 2,
            time_scale: 0.5,
            ..EngineConfig::default()
        })
    }

    /// Zone 4 (13,14,15,16) and zone 12 (30,33,34,35) each at two edges
    fn risky_position(board: &BoardLayout) -> GameState {
        play_all(board, &[13, 14, 33, 34])
    }

    #[test]
    fn test_engine_creation() {
        let engine = AIEngine::new();
        assert_eq!(engine.config(), &EngineConfig::default());
        assert_eq!(engine.tt_stats().used, 0);
    }

    #[test]
    fn test_terminal_returns_none() {
        let board = BoardPreset::Mini.layout();
        let mut state = GameState::new();
        for edge in 0..board.edge_count() {
            state = apply_move(&board, &state, edge).state;
        }
        let mut engine = quick_engine();
        for level in AiLevel::ALL {
            let result = engine.choose_move_with_stats(&board, &state, level, &DecisionContext::new(1));
            assert_eq!(result.best_move, None);
            assert_eq!(result.search_type, SearchType::Terminal);
        }
    }

    #[test]
    fn test_hard_takes_only_capture() {
        let board = BoardPreset::Mini.layout();
        // Zone 0 has edges 0, 1, 3: only edge 2 completes anything
        let state = play_all(&board, &[0, 1, 3]);
        let mut engine = quick_engine();
        for seed in 0..4 {
            let edge = engine.choose_move(&board, &state, AiLevel::Hard, &DecisionContext::new(seed));
            assert_eq!(edge, Some(2));
        }
    }

    #[test]
    fn test_hard_and_medium_avoid_unsafe_moves() {
        let board = BoardPreset::Mini.layout();
        let state = risky_position(&board);
        let unsafe_edges: Vec<EdgeId> = state
            .legal_moves(&board)
            .filter(|&e| !is_safe(&board, &state, e))
            .collect();
        assert!(unsafe_edges.contains(&15) && unsafe_edges.contains(&35));

        let mut engine = quick_engine();
        for level in [AiLevel::Medium, AiLevel::Hard] {
            for seed in 0..8 {
                let edge = engine
                    .choose_move(&board, &state, level, &DecisionContext::new(seed))
                    .unwrap();
                assert!(!unsafe_edges.contains(&edge), "{level:?} seed {seed} played {edge}");
            }
        }
    }

    #[test]
    fn test_hard_search_answer_is_safe() {
        let board = BoardPreset::Mini.layout();
        // 22 edges left; only 8, 9, 11, 23, 25 and 28 are safe
        let state = play_all(&board, &[1, 3, 4, 6, 10, 13, 14, 19, 22, 24, 27, 29, 30, 33]);
        let safe: Vec<EdgeId> = state.legal_moves(&board).filter(|&e| is_safe(&board, &state, e)).collect();
        assert_eq!(safe, vec![8, 9, 11, 23, 25, 28]);

        let mut engine = quick_engine();
        for seed in 0..6 {
            let result = engine.choose_move_with_stats(&board, &state, AiLevel::Hard, &DecisionContext::new(seed));
            let edge = result.best_move.unwrap();
            assert!(safe.contains(&edge), "seed {seed} played {edge} via {:?}", result.search_type);
        }
    }

    #[test]
    fn test_exact_endgame_keeps_to_safe_moves() {
        let board = BoardPreset::Mini.layout();
        let keep = [1, 2, 4, 5, 7, 18, 23, 25, 27, 33, 34, 35];
        let edges: Vec<EdgeId> = (0..board.edge_count()).filter(|e| !keep.contains(e)).collect();
        let state = play_all(&board, &edges);

        // Unrestricted, the best line gives away zones with edge 27
        let solved = EndgameSolver::new(1).solve(&board, &state);
        assert_eq!(solved.best_move, Some(27));
        assert!(!safe_or_capturing(&board, &state, 27));

        let result = quick_engine().choose_move_with_stats(&board, &state, AiLevel::Hard, &DecisionContext::new(1));
        assert_eq!(result.search_type, SearchType::ExactEndgame);
        assert_eq!(result.best_move, Some(18));
    }

    /// Random playout through safe moves only, stopped at a random ply.
    fn random_safe_position(board: &BoardLayout, rng: &mut DecisionRng) -> GameState {
        let mut state = GameState::new();
        let plies = 4 + rng.index(board.edge_count() / 2);
        for _ in 0..plies {
            let safe: Vec<EdgeId> = state.legal_moves(board).filter(|&e| is_safe(board, &state, e)).collect();
            if safe.len() < 2 {
                break;
            }
            state = apply_move(board, &state, safe[rng.index(safe.len())]).state;
        }
        state
    }

    #[test]
    fn test_safe_move_rule_on_random_positions() {
        let mut engine = AIEngine::with_config(EngineConfig {
            tt_size_mb: 2,
            time_scale: 0.2,
            depth_cap: Some(3),
            ..EngineConfig::default()
        });
        let mut checked = 0;
        for preset in [BoardPreset::Mini, BoardPreset::Standard] {
            let board = preset.layout();
            let mut rng = DecisionRng::new(0x5AFE ^ board.edge_count() as u64);
            for seed in 0..12 {
                let state = random_safe_position(&board, &mut rng);
                if !state.legal_moves(&board).any(|e| is_safe(&board, &state, e)) {
                    continue;
                }
                for level in [AiLevel::Medium, AiLevel::Hard] {
                    let edge = engine
                        .choose_move(&board, &state, level, &DecisionContext::new(seed))
                        .unwrap();
                    assert!(
                        safe_or_capturing(&board, &state, edge),
                        "{} {level:?} seed {seed} played {edge}",
                        preset.name()
                    );
                    checked += 1;
                }
            }
        }
        assert!(checked >= 16);
    }

    #[test]
    fn test_same_context_same_move() {
        let board = BoardPreset::Standard.layout();
        let state = play_all(&board, &[3, 17, 40]);
        let mut ctx = DecisionContext::new(0xDEAD_BEEF);
        ctx.record(17);

        for level in [AiLevel::Easy, AiLevel::Medium] {
            let a = AIEngine::new().choose_move(&board, &state, level, &ctx);
            let b = AIEngine::new().choose_move(&board, &state, level, &ctx);
            assert_eq!(a, b, "{level:?}");
        }
    }

    #[test]
    fn test_exact_endgame_is_deterministic() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &(0..26).collect::<Vec<_>>());
        assert!(state.remaining_count(&board) <= 12);

        let mut engine = quick_engine();
        let first = engine.choose_move_with_stats(&board, &state, AiLevel::Hard, &DecisionContext::new(1));
        assert_eq!(first.search_type, SearchType::ExactEndgame);
        for seed in 2..5 {
            let again = engine.choose_move(&board, &state, AiLevel::Hard, &DecisionContext::new(seed));
            assert_eq!(again, first.best_move);
        }
    }

    #[test]
    fn test_every_level_returns_legal_move() {
        let board = BoardPreset::Mini.layout();
        let mut engine = quick_engine();
        let mut ctx = DecisionContext::new(7);
        for level in AiLevel::ALL {
            let mut state = GameState::new();
            while !state.is_over(&board) {
                let edge = engine.choose_move(&board, &state, level, &ctx).unwrap();
                let outcome = apply_move(&board, &state, edge);
                assert!(outcome.played, "{level:?} chose occupied edge {edge}");
                ctx.record(edge);
                state = outcome.state;
            }
            assert_eq!(state.owned_count(), board.zone_count());
        }
    }

    #[test]
    fn test_easy_prefers_capture_without_miss() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1, 3]);
        let mut captures = 0;
        for seed in 0..40 {
            let result = AIEngine::new().choose_move_with_stats(&board, &state, AiLevel::Easy, &DecisionContext::new(seed));
            if result.search_type == SearchType::Capture {
                assert_eq!(result.best_move, Some(2));
                captures += 1;
            }
        }
        // Mistake and miss rolls fire in under half of opening decisions
        assert!(captures > 10);
    }

    #[test]
    fn test_medium_never_misses_capture_on_its_best_line() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1, 3]);
        let mut best_line = 0;
        for seed in 0..30 {
            let result = AIEngine::new().choose_move_with_stats(&board, &state, AiLevel::Medium, &DecisionContext::new(seed));
            if result.search_type == SearchType::Heuristic {
                assert_eq!(result.best_move, Some(2), "seed {seed}");
                best_line += 1;
            }
        }
        // Exploration fires in about one opening decision in ten
        assert!(best_line > 15);
    }

    #[test]
    fn test_clear_cache() {
        let board = BoardPreset::Mini.layout();
        let mut engine = quick_engine();
        let _ = engine.choose_move(&board, &GameState::new(), AiLevel::Hard, &DecisionContext::new(3));
        assert!(engine.tt_stats().used > 0);
        engine.clear_cache();
        assert_eq!(engine.tt_stats().used, 0);
    }

    #[test]
    fn test_free_choose_move() {
        let board = BoardPreset::Mini.layout();
        let state = play_all(&board, &[0, 1, 3]);
        assert_eq!(choose_move(&board, &state, AiLevel::Hard, &DecisionContext::new(9)), Some(2));
    }
}

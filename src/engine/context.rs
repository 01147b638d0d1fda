//! Per-decision randomness
//!
//! Every random draw of a decision comes from one generator seeded by
//! mixing the session seed, the decision counter, the position and the
//! AI's recent moves. Replaying a session with the same seed and the same
//! moves reproduces the same choices.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{BoardLayout, EdgeId, GameState};
use crate::eval::AiLevel;

/// Number of the AI's own moves remembered for novelty and seeding
pub const RECENT_MOVES: usize = 10;

/// SplitMix64 finalizer: a fast invertible 64-bit mix.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// What the AI remembers between its decisions in one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionContext {
    pub session_seed: u64,
    /// Decisions taken so far
    pub decision_index: u64,
    /// The AI's own most recent edges, oldest first
    pub recent_moves: Vec<EdgeId>,
}

impl DecisionContext {
    pub fn new(session_seed: u64) -> Self {
        Self {
            session_seed,
            decision_index: 0,
            recent_moves: Vec::new(),
        }
    }

    /// Remember an AI move and advance the decision counter.
    pub fn record(&mut self, edge: EdgeId) {
        self.recent_moves.push(edge);
        if self.recent_moves.len() > RECENT_MOVES {
            let excess = self.recent_moves.len() - RECENT_MOVES;
            self.recent_moves.drain(..excess);
        }
        self.decision_index += 1;
    }

    /// The last [`RECENT_MOVES`] AI edges, oldest first
    pub fn recent(&self) -> &[EdgeId] {
        let len = self.recent_moves.len();
        &self.recent_moves[len.saturating_sub(RECENT_MOVES)..]
    }

    /// Seed of the next decision's generator.
    ///
    /// # Example
    ///
    /// ```
    /// use enclose::board::{BoardPreset, GameState};
    /// use enclose::engine::DecisionContext;
    /// use enclose::eval::AiLevel;
    ///
    /// let board = BoardPreset::Mini.layout();
    /// let state = GameState::new();
    /// let ctx = DecisionContext::new(42);
    ///
    /// let seed = ctx.decision_seed(&board, &state, AiLevel::Easy);
    /// assert_eq!(seed, ctx.decision_seed(&board, &state, AiLevel::Easy));
    /// assert_ne!(seed, ctx.decision_seed(&board, &state, AiLevel::Hard));
    /// ```
    pub fn decision_seed(&self, board: &BoardLayout, state: &GameState, level: AiLevel) -> u64 {
        let level_salt: u64 = match level {
            AiLevel::Easy => 0xA24B_AED4_963E_E407,
            AiLevel::Medium => 0x9FB2_1C65_1E98_DF25,
            AiLevel::Hard => 0xC13F_A9A9_02A6_328F,
        };

        let mut seed = self.session_seed
            ^ splitmix64(self.decision_index.wrapping_add(0x9E37_79B9_7F4A_7C15))
            ^ splitmix64((board.edge_count() as u64).wrapping_mul(0xD1B5_4A32_D192_ED03))
            ^ splitmix64((state.occupied_count() as u64).wrapping_mul(0x94D0_49BB_1331_11EB))
            ^ level_salt;
        for &edge in self.recent() {
            seed ^= splitmix64((edge as u64).wrapping_add(0xBF58_476D_1CE4_E5B9));
        }
        splitmix64(seed)
    }
}

/// Random source of a single decision.
pub struct DecisionRng {
    rng: SmallRng,
}

impl DecisionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator for the next decision in `ctx`.
    pub fn for_decision(ctx: &DecisionContext, board: &BoardLayout, state: &GameState, level: AiLevel) -> Self {
        Self::new(ctx.decision_seed(board, state, level))
    }

    /// Uniform in `[0, 1)`
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// True with probability `p`. Never draws when `p <= 0`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        p > 0.0 && self.unit() < p
    }

    /// Uniform noise in `[-amplitude, amplitude]`
    #[inline]
    pub fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            0.0
        } else {
            self.rng.random_range(-amplitude..=amplitude)
        }
    }

    /// Uniform index below `len`; `len` must be positive.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;

    #[test]
    fn test_splitmix_known_values() {
        // Reference outputs of SplitMix64 seeded with 0
        assert_eq!(splitmix64(0), 0xE220_A839_7B1D_CDAF);
        assert_ne!(splitmix64(1), splitmix64(2));
    }

    #[test]
    fn test_record_keeps_last_moves() {
        let mut ctx = DecisionContext::new(1);
        for edge in 0..15 {
            ctx.record(edge);
        }
        assert_eq!(ctx.decision_index, 15);
        assert_eq!(ctx.recent(), &[5, 6, 7, 8, 9, 10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_recent_tolerates_long_external_history() {
        let ctx = DecisionContext {
            session_seed: 3,
            decision_index: 20,
            recent_moves: (0..20).collect(),
        };
        assert_eq!(ctx.recent().len(), RECENT_MOVES);
        assert_eq!(ctx.recent()[0], 10);
    }

    #[test]
    fn test_seed_depends_on_every_input() {
        let board = BoardPreset::Mini.layout();
        let state = GameState::new();
        let ctx = DecisionContext::new(42);
        let base = ctx.decision_seed(&board, &state, AiLevel::Medium);

        assert_ne!(base, DecisionContext::new(43).decision_seed(&board, &state, AiLevel::Medium));

        let mut later = ctx.clone();
        later.record(7);
        assert_ne!(base, later.decision_seed(&board, &state, AiLevel::Medium));

        let other_board = BoardPreset::Standard.layout();
        assert_ne!(base, ctx.decision_seed(&other_board, &state, AiLevel::Medium));
    }

    #[test]
    fn test_rng_reproducible() {
        let mut a = DecisionRng::new(5);
        let mut b = DecisionRng::new(5);
        for _ in 0..10 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
        assert_eq!(a.index(7), b.index(7));
    }

    #[test]
    fn test_rng_ranges() {
        let mut rng = DecisionRng::new(9);
        for _ in 0..100 {
            let n = rng.noise(2.5);
            assert!((-2.5..=2.5).contains(&n));
            assert!(rng.index(3) < 3);
        }
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
        assert_eq!(rng.noise(0.0), 0.0);
    }

    #[test]
    fn test_context_json_camel_case() {
        let ctx: DecisionContext =
            serde_json::from_str(r#"{ "sessionSeed": 5, "decisionIndex": 2, "recentMoves": [1, 4] }"#).unwrap();
        assert_eq!(ctx.session_seed, 5);
        assert_eq!(ctx.recent(), &[1, 4]);
        let empty: DecisionContext = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DecisionContext::default());
    }
}

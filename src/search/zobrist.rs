//! Zobrist hashing for position identification
//!
//! A position is the drawn edges, the owner of every captured zone and the
//! side to move. The search also folds in the player it evaluates for, so
//! one table can serve searches run for either seat.
//!
//! # Example
//!
//! ```
//! use enclose::board::{BoardPreset, GameState, Player};
//! use enclose::rules::draw_edge;
//! use enclose::search::ZobristTable;
//!
//! let board = BoardPreset::Mini.layout();
//! let zt = ZobristTable::new();
//! let mut state = GameState::new();
//!
//! let hash1 = zt.hash(&state, Player::O);
//! let capture = draw_edge(&board, &mut state, 7);
//!
//! // Incremental update is equivalent to full recomputation
//! let hash2 = zt.update_move(hash1, 7, &capture);
//! assert_eq!(hash2, zt.hash(&state, Player::O));
//! ```

use crate::board::{EdgeId, GameState, Player, MAX_IDS};
use crate::rules::Capture;

/// Zobrist keys for edges, zone owners and turn.
pub struct ZobristTable {
    /// One key per drawn edge
    edges: [u64; MAX_IDS],
    /// One key per (owner, zone)
    owners: [[u64; MAX_IDS]; 2],
    /// XORed when X is to move
    x_to_move: u64,
    /// XORed when the search evaluates for X
    x_perspective: u64,
}

impl ZobristTable {
    /// Create a table with reproducible pseudo-random keys.
    #[must_use]
    pub fn new() -> Self {
        // Knuth's MMIX LCG, fixed seed
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            seed ^ (seed >> 29)
        };

        let mut edges = [0u64; MAX_IDS];
        let mut owners = [[0u64; MAX_IDS]; 2];
        for i in 0..MAX_IDS {
            edges[i] = next_rand();
            owners[0][i] = next_rand();
            owners[1][i] = next_rand();
        }

        Self {
            edges,
            owners,
            x_to_move: next_rand(),
            x_perspective: next_rand(),
        }
    }

    /// Full hash of `state` as seen by a search for `perspective`.
    #[must_use]
    pub fn hash(&self, state: &GameState, perspective: Player) -> u64 {
        let mut h = 0u64;

        for edge in state.occupied().iter() {
            h ^= self.edges[edge];
        }

        for player in Player::ALL {
            for zone in state.owned_by(player).iter() {
                h ^= self.owners[player.index()][zone];
            }
        }

        if state.current_player() == Player::X {
            h ^= self.x_to_move;
        }
        if perspective == Player::X {
            h ^= self.x_perspective;
        }

        h
    }

    /// Hash after drawing `edge` with the given capture result.
    ///
    /// The turn key toggles only when nothing was captured.
    #[inline]
    #[must_use]
    pub fn update_move(&self, hash: u64, edge: EdgeId, capture: &Capture) -> u64 {
        let mut h = hash ^ self.edges[edge];
        let owner = &self.owners[capture.mover.index()];
        for zone in capture.zones.iter() {
            h ^= owner[zone];
        }
        if !capture.any() {
            h ^= self.x_to_move;
        }
        h
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

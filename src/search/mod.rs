//! Search module for the Enclose AI
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Move ordering shared by both searches
//! - Alpha-Beta search with iterative deepening
//! - Exact endgame solver

pub mod alphabeta;
pub mod endgame;
pub mod ordering;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchLimits, SearchResult, SearchStats, Searcher, DEFAULT_CAPTURE_PLIES};
pub use endgame::{EndgameResult, EndgameSolver};
pub use ordering::{capture_moves, ordered_moves};
pub use tt::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;

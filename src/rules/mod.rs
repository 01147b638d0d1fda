//! Game rules for Enclose
//!
//! This module implements the rule set:
//! - Move legality and application
//! - Zone capture with turn retention (chain captures)
//! - Scores and end of game

pub mod capture;
pub mod score;

// Re-exports for convenient access
pub use capture::{apply_move, count_captures, draw_edge, is_legal, Capture, MoveOutcome};
pub use score::{is_game_over, near_capture_edges, scores, winner, Outcome, Score};

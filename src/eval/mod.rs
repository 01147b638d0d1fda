//! Evaluation for the Enclose AI
//!
//! - Per-edge tactics (captures, openings, safety)
//! - Full-state leaf evaluation
//! - Difficulty policy tables

pub mod heuristic;
pub mod policy;
pub mod tactics;

pub use heuristic::{evaluate, terminal_score, EvalWeights};
pub use policy::{
    search_profile, AiLevel, DifficultyPolicy, Phase, PhaseValue, SearchProfile, TacticalWeights,
};
pub use tactics::{
    center_weight, is_safe, move_metrics, pressure_move_score, reply_pressure, safe_edges,
    static_move_score, MoveMetrics, ReplyPressure,
};

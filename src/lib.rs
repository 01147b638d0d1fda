//! Enclose decision engine
//!
//! Enclose is a two-player edge-drawing game on a diamond of square zones:
//! - Players alternately draw one undrawn edge
//! - Drawing the last edge of a zone captures it, and the mover moves again
//! - The game ends when every edge is drawn; most zones wins
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board topology and compact bitset game state
//! - [`rules`]: Move application, captures, scores
//! - [`eval`]: Move tactics, position evaluation and difficulty tables
//! - [`search`]: Alpha-beta with capture extension and exact endgame solver
//! - [`engine`]: Per-tier decision orchestrator
//! - [`session`]: Live match with a background AI worker
//! - [`wire`]: JSON payloads for computing moves out of process
//!
//! # Quick Start
//!
//! ```
//! use enclose::board::{BoardPreset, GameState};
//! use enclose::engine::DecisionContext;
//! use enclose::eval::AiLevel;
//! use enclose::rules::apply_move;
//! use enclose::{AIEngine, EngineConfig};
//!
//! let board = BoardPreset::Mini.layout();
//! let mut engine = AIEngine::with_config(EngineConfig { tt_size_mb: 2, ..EngineConfig::default() });
//! let mut ctx = DecisionContext::new(42);
//!
//! let mut state = apply_move(&board, &GameState::new(), 17).state;
//!
//! // AI answers as O
//! if let Some(edge) = engine.choose_move(&board, &state, AiLevel::Medium, &ctx) {
//!     state = apply_move(&board, &state, edge).state;
//!     ctx.record(edge);
//!     println!("AI draws edge {edge}");
//! }
//! assert_eq!(state.occupied_count(), 2);
//! ```
//!
//! # Difficulty Tiers
//!
//! 1. Easy: noisy one-move heuristic, random slips, sometimes misses captures
//! 2. Medium: heuristic with one ply of opponent pressure
//! 3. Hard: iterative-deepening alpha-beta, exact solve of the last edges

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod session;
pub mod ui;
pub mod wire;

// Re-export commonly used types for convenience
pub use board::{BoardLayout, BoardPreset, EdgeId, GameState, Player};
pub use config::EngineConfig;
pub use engine::{choose_move, AIEngine, DecisionContext, MoveResult, SearchType};
pub use error::{Error, Result};
pub use eval::AiLevel;

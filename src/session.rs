//! Live match management
//!
//! [`MatchSession`] owns one match: the board, the current [`GameState`], the
//! optional AI seat and the AI's decision context. AI decisions run on a
//! background thread and come back over a channel tagged with the session's
//! generation; a result whose generation is no longer current is dropped.
//! An abandoned decision still hands its engine back, with cleared tables.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use enclose::board::BoardPreset;
//! use enclose::eval::AiLevel;
//! use enclose::session::MatchSession;
//! use enclose::EngineConfig;
//!
//! let mut session = MatchSession::new(BoardPreset::Mini, Some(AiLevel::Easy), EngineConfig::instant(3));
//! session.try_play(0).unwrap();
//! assert!(session.is_ai_turn());
//!
//! session.start_ai_thinking();
//! let reply = session.wait_for_ai(Duration::from_secs(10)).unwrap();
//! assert!(reply.best_move.is_some());
//! assert_eq!(session.move_count(), 2);
//! ```

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::board::{BoardLayout, BoardPreset, EdgeId, GameState, Player};
use crate::config::EngineConfig;
use crate::engine::{AIEngine, DecisionContext, MoveResult};
use crate::eval::AiLevel;
use crate::rules::{apply_move, is_legal, scores, winner, Outcome, Score};

/// Why a human move was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Game is over")]
    GameOver,
    #[error("AI is thinking")]
    AiThinking,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Edge {0} is already drawn or not on the board")]
    IllegalEdge(EdgeId),
}

/// Who the AI is and how strong it plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiSeat {
    pub level: AiLevel,
    pub player: Player,
}

/// Reply of the worker thread
struct AiReply {
    generation: u64,
    result: MoveResult,
    engine: AIEngine,
}

/// AI computation state
enum AiState {
    Idle,
    Thinking {
        generation: u64,
        receiver: Receiver<AiReply>,
        start_time: Instant,
    },
}

pub struct MatchSession {
    preset: BoardPreset,
    board: Arc<BoardLayout>,
    state: GameState,
    ai: Option<AiSeat>,
    last_move: Option<EdgeId>,
    last_capture: bool,
    move_count: usize,
    context: DecisionContext,
    generation: u64,
    ai_state: AiState,
    /// Absent while lent to the worker
    engine: Option<AIEngine>,
    /// Channel of an abandoned decision, kept to get its engine back
    returning: Option<Receiver<AiReply>>,
    config: EngineConfig,
    last_ai_result: Option<MoveResult>,
}

impl MatchSession {
    /// Start a match. With `Some(level)` the AI plays `O`.
    pub fn new(preset: BoardPreset, level: Option<AiLevel>, config: EngineConfig) -> Self {
        let context = DecisionContext::new(session_seed(&config));
        Self {
            preset,
            board: Arc::new(preset.layout()),
            state: GameState::new(),
            ai: level.map(|level| AiSeat { level, player: Player::O }),
            last_move: None,
            last_capture: false,
            move_count: 0,
            context,
            generation: 0,
            ai_state: AiState::Idle,
            engine: Some(AIEngine::with_config(config.clone())),
            returning: None,
            config,
            last_ai_result: None,
        }
    }

    pub fn preset(&self) -> BoardPreset {
        self.preset
    }

    pub fn board(&self) -> &BoardLayout {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ai_seat(&self) -> Option<AiSeat> {
        self.ai
    }

    pub fn last_move(&self) -> Option<EdgeId> {
        self.last_move
    }

    /// Whether the last move completed a zone
    pub fn last_move_captured(&self) -> bool {
        self.last_capture
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn context(&self) -> &DecisionContext {
        &self.context
    }

    /// Counter bumped by every change that invalidates pending AI work
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_ai_result(&self) -> Option<&MoveResult> {
        self.last_ai_result.as_ref()
    }

    pub fn score(&self) -> Score {
        scores(&self.state)
    }

    pub fn winner(&self) -> Option<Outcome> {
        winner(&self.board, &self.state)
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over(&self.board)
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.is_over() && self.ai.is_some_and(|seat| seat.player == self.state.current_player())
    }

    pub fn is_human_turn(&self) -> bool {
        !self.is_over() && !self.is_ai_turn()
    }

    /// Whether a decision for the current generation is in flight
    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { generation, .. } if generation == self.generation)
    }

    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking {
                generation,
                start_time,
                ..
            } if *generation == self.generation => Some(start_time.elapsed()),
            _ => None,
        }
    }

    /// Play a human move.
    pub fn try_play(&mut self, edge: EdgeId) -> Result<(), Rejection> {
        if self.is_over() {
            return Err(Rejection::GameOver);
        }
        if self.is_ai_thinking() {
            return Err(Rejection::AiThinking);
        }
        if !self.is_human_turn() {
            return Err(Rejection::NotYourTurn);
        }
        if !is_legal(&self.board, &self.state, edge) {
            return Err(Rejection::IllegalEdge(edge));
        }

        self.execute_move(edge);
        self.generation += 1;
        Ok(())
    }

    /// Apply a move for whoever is to move. Returns whether it was played.
    fn execute_move(&mut self, edge: EdgeId) -> bool {
        let outcome = apply_move(&self.board, &self.state, edge);
        if !outcome.played {
            return false;
        }
        self.state = outcome.state;
        self.last_move = Some(edge);
        self.last_capture = outcome.captured();
        self.move_count += 1;

        if self.is_over() {
            let score = self.score();
            info!("match over: x {} - o {} after {} moves", score.x, score.o, self.move_count);
        }
        true
    }

    /// Start a decision on a worker thread if the AI is to move and idle.
    pub fn start_ai_thinking(&mut self) {
        let Some(seat) = self.ai else {
            return;
        };
        if !self.is_ai_turn() || self.is_ai_thinking() {
            return;
        }
        self.abandon_decision();
        self.reclaim_engine();

        let board = Arc::clone(&self.board);
        let state = self.state;
        let context = self.context.clone();
        let generation = self.generation;
        let delay = Duration::from_millis(self.config.thinking_delay_ms);
        let mut engine = match self.engine.take() {
            Some(engine) => engine,
            None => AIEngine::with_config(self.config.clone()),
        };

        let (tx, rx) = channel();
        thread::spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            let result = engine.choose_move_with_stats(&board, &state, seat.level, &context);
            let _ = tx.send(AiReply {
                generation,
                result,
                engine,
            });
        });

        self.ai_state = AiState::Thinking {
            generation,
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Apply the AI's answer if it has arrived.
    ///
    /// Returns the applied result; stale answers are dropped.
    pub fn poll_ai(&mut self) -> Option<MoveResult> {
        self.reclaim_engine();
        let received = match &self.ai_state {
            AiState::Thinking { receiver, .. } => receiver.try_recv(),
            AiState::Idle => return None,
        };
        match received {
            Ok(reply) => self.accept(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("AI worker disconnected");
                self.ai_state = AiState::Idle;
                None
            }
        }
    }

    /// Block up to `timeout` for the AI's answer.
    pub fn wait_for_ai(&mut self, timeout: Duration) -> Option<MoveResult> {
        let received = match &self.ai_state {
            AiState::Thinking { receiver, .. } => receiver.recv_timeout(timeout),
            AiState::Idle => return None,
        };
        match received {
            Ok(reply) => self.accept(reply),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("AI worker disconnected");
                self.ai_state = AiState::Idle;
                None
            }
        }
    }

    fn accept(&mut self, reply: AiReply) -> Option<MoveResult> {
        self.ai_state = AiState::Idle;
        let stale = reply.generation != self.generation;
        self.restore_engine(reply.engine, stale);

        if stale || !self.is_ai_turn() {
            debug!(
                "discarding stale AI result (generation {} != {})",
                reply.generation, self.generation
            );
            return None;
        }

        let edge = reply.result.best_move?;
        if !self.execute_move(edge) {
            warn!("AI chose unplayable edge {edge}");
            return None;
        }
        self.context.record(edge);
        self.generation += 1;
        self.last_ai_result = Some(reply.result.clone());
        Some(reply.result)
    }

    /// Put back an engine returned by a worker. Tables searched for an
    /// outdated match are cleared.
    fn restore_engine(&mut self, mut engine: AIEngine, stale: bool) {
        if self.engine.is_some() {
            return;
        }
        if stale {
            engine.clear_cache();
        }
        self.engine = Some(engine);
    }

    /// Stop waiting for the current decision; its engine comes back later.
    fn abandon_decision(&mut self) {
        if let AiState::Thinking { receiver, .. } = std::mem::replace(&mut self.ai_state, AiState::Idle) {
            debug!("abandoning stale AI decision");
            self.returning = Some(receiver);
        }
    }

    /// Take back the engine of an abandoned decision if it has finished.
    fn reclaim_engine(&mut self) {
        let Some(receiver) = &self.returning else {
            return;
        };
        match receiver.try_recv() {
            Ok(reply) => {
                self.returning = None;
                self.restore_engine(reply.engine, true);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.returning = None,
        }
    }

    /// Start a new match on `preset`, cancelling pending AI work.
    pub fn reset(&mut self, preset: BoardPreset) {
        if preset != self.preset {
            self.board = Arc::new(preset.layout());
            self.preset = preset;
        }
        self.state = GameState::new();
        self.last_move = None;
        self.last_capture = false;
        self.move_count = 0;
        self.context = DecisionContext::new(session_seed(&self.config));
        self.last_ai_result = None;
        self.generation += 1;
        self.abandon_decision();
        if let Some(engine) = self.engine.as_mut() {
            engine.clear_cache();
        }
        info!("new {} match", preset.name());
    }

    /// Change the AI tier, or hand both sides to humans with `None`.
    pub fn set_ai_level(&mut self, level: Option<AiLevel>) {
        let player = self.ai.map_or(Player::O, |seat| seat.player);
        self.ai = level.map(|level| AiSeat { level, player });
        self.generation += 1;
        self.abandon_decision();
    }

    /// Seat the AI as `player`.
    pub fn set_ai_player(&mut self, player: Player) {
        if let Some(seat) = self.ai.as_mut() {
            seat.player = player;
            self.generation += 1;
            self.abandon_decision();
        }
    }
}

fn session_seed(config: &EngineConfig) -> u64 {
    config.session_seed.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(30);

    fn session(level: Option<AiLevel>) -> MatchSession {
        let config = EngineConfig {
            tt_size_mb: 1,
            time_scale: 0.25,
            ..EngineConfig::instant(17)
        };
        MatchSession::new(BoardPreset::Mini, level, config)
    }

    #[test]
    fn test_human_move_flips_turn() {
        let mut s = session(Some(AiLevel::Medium));
        let before = s.generation();
        s.try_play(5).unwrap();
        assert_eq!(s.state().current_player(), Player::O);
        assert_eq!(s.last_move(), Some(5));
        assert!(s.generation() > before);
        assert!(s.is_ai_turn());
    }

    #[test]
    fn test_rejections() {
        let mut s = session(Some(AiLevel::Easy));
        assert_eq!(s.try_play(99), Err(Rejection::IllegalEdge(99)));
        s.try_play(0).unwrap();
        assert_eq!(s.try_play(1), Err(Rejection::NotYourTurn));

        s.start_ai_thinking();
        assert!(s.is_ai_thinking());
        assert_eq!(s.try_play(1), Err(Rejection::AiThinking));
        s.wait_for_ai(WAIT).unwrap();

        assert_eq!(s.try_play(0), Err(Rejection::IllegalEdge(0)));
    }

    #[test]
    fn test_hotseat_plays_whole_game() {
        let mut s = session(None);
        for edge in 0..36 {
            s.try_play(edge).unwrap();
        }
        assert!(s.is_over());
        assert_eq!(s.score().total(), 13);
        assert!(s.winner().is_some());
        assert_eq!(s.try_play(0), Err(Rejection::GameOver));
    }

    #[test]
    fn test_capture_keeps_human_turn() {
        let mut s = session(None);
        for edge in [0, 1, 3] {
            s.try_play(edge).unwrap();
        }
        // O closes zone 0 and moves again
        s.try_play(2).unwrap();
        assert!(s.last_move_captured());
        assert_eq!(s.state().current_player(), Player::O);
        assert_eq!(s.score().o, 1);
    }

    #[test]
    fn test_ai_reply_is_applied_and_recorded() {
        let mut s = session(Some(AiLevel::Hard));
        for _ in 0..3 {
            let edge = s.state().legal_moves(s.board()).next().unwrap();
            s.try_play(edge).unwrap();
            // Captures keep the AI on move
            while s.is_ai_turn() {
                s.start_ai_thinking();
                if s.wait_for_ai(WAIT).is_none() {
                    break;
                }
            }
        }
        assert!(s.move_count() >= 6);
        assert!(!s.context().recent().is_empty());
        assert_eq!(s.context().decision_index as usize, s.context().recent_moves.len());
        assert!(s.last_ai_result().is_some());
    }

    #[test]
    fn test_stale_result_discarded_after_reset() {
        let mut s = session(Some(AiLevel::Easy));
        s.try_play(0).unwrap();
        s.start_ai_thinking();
        s.reset(BoardPreset::Mini);
        assert!(!s.is_ai_thinking());

        assert!(s.wait_for_ai(WAIT).is_none());
        assert_eq!(s.state().occupied_count(), 0);
        assert_eq!(s.move_count(), 0);
        assert_eq!(s.state().current_player(), Player::X);
    }

    #[test]
    fn test_reset_idles_and_gets_engine_back_cleared() {
        let mut s = session(Some(AiLevel::Hard));
        s.try_play(0).unwrap();
        s.start_ai_thinking();
        assert!(s.engine.is_none());

        s.reset(BoardPreset::Standard);
        assert!(matches!(s.ai_state, AiState::Idle));
        assert!(s.returning.is_some());

        let deadline = Instant::now() + WAIT;
        while s.engine.is_none() && Instant::now() < deadline {
            assert!(s.poll_ai().is_none());
            thread::sleep(Duration::from_millis(10));
        }
        let engine = s.engine.as_ref().expect("engine returned");
        assert_eq!(engine.tt_stats().used, 0);
        assert!(s.returning.is_none());
        assert_eq!(s.state().occupied_count(), 0);
        assert_eq!(s.board().edge_count(), 64);
    }

    #[test]
    fn test_disabling_ai_cancels_decision() {
        let mut s = session(Some(AiLevel::Easy));
        s.try_play(0).unwrap();
        s.start_ai_thinking();
        s.set_ai_level(None);

        assert!(s.wait_for_ai(WAIT).is_none());
        assert_eq!(s.move_count(), 1);
        // Humans now play both sides
        s.try_play(1).unwrap();
    }

    #[test]
    fn test_reset_changes_preset() {
        let mut s = session(None);
        s.try_play(3).unwrap();
        s.reset(BoardPreset::Large);
        assert_eq!(s.preset(), BoardPreset::Large);
        assert_eq!(s.board().zone_count(), 41);
        assert_eq!(s.state().occupied_count(), 0);
        assert_eq!(s.last_move(), None);
    }

    #[test]
    fn test_ai_can_open_as_x() {
        let mut s = session(Some(AiLevel::Medium));
        s.set_ai_player(Player::X);
        assert!(s.is_ai_turn());
        s.start_ai_thinking();
        let result = s.wait_for_ai(WAIT).unwrap();
        assert_eq!(result.level, AiLevel::Medium);
        assert_eq!(s.state().current_player(), Player::O);
    }
}

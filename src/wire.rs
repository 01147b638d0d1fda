//! Plain-data payloads for computing moves out of process
//!
//! A remote caller sends the board topology, the state and the tier as JSON;
//! everything is validated before the engine sees it.
//!
//! # Example
//!
//! ```
//! use enclose::board::{BoardPreset, GameState};
//! use enclose::wire::{handle_json, BoardPayload, MoveRequest, StatePayload};
//! use enclose::AIEngine;
//!
//! let board = BoardPreset::Mini.layout();
//! let request = MoveRequest {
//!     board: BoardPayload::from(&board),
//!     state: StatePayload::from_state(&board, &GameState::new()),
//!     level: enclose::eval::AiLevel::Easy,
//!     context: None,
//! };
//! let text = serde_json::to_string(&request).unwrap();
//!
//! let reply = handle_json(&text, &mut AIEngine::new()).unwrap();
//! assert!(reply.starts_with(r#"{"move":"#));
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{BoardLayout, Edge, EdgeId, GameState, Node, NodeId, Player, Zone, ZoneId};
use crate::engine::{AIEngine, DecisionContext};
use crate::error::{Error, Result};
use crate::eval::AiLevel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionPayload {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: NodeId,
    pub position: PositionPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePayload {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePayload {
    pub id: ZoneId,
    #[serde(default)]
    pub node_ids: Vec<NodeId>,
    pub edge_ids: Vec<EdgeId>,
    /// Informational only; ownership is read from the state
    #[serde(default)]
    pub owner: Option<Player>,
}

/// Board topology as plain data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPayload {
    pub nodes: Vec<NodePayload>,
    pub edges: Vec<EdgePayload>,
    pub zones: Vec<ZonePayload>,
}

impl BoardPayload {
    /// Validate and build the layout.
    pub fn to_layout(&self) -> Result<BoardLayout> {
        let nodes = self
            .nodes
            .iter()
            .map(|n| Node {
                id: n.id,
                x: n.position.x,
                y: n.position.y,
            })
            .collect();
        let edges = self.edges.iter().map(|e| Edge { id: e.id, a: e.a, b: e.b }).collect();
        let zones = self
            .zones
            .iter()
            .map(|z| Zone {
                id: z.id,
                node_ids: z.node_ids.clone(),
                edge_ids: z.edge_ids.clone(),
            })
            .collect();
        BoardLayout::from_parts(nodes, edges, zones)
    }
}

impl From<&BoardLayout> for BoardPayload {
    fn from(board: &BoardLayout) -> Self {
        Self {
            nodes: board
                .nodes()
                .iter()
                .map(|n| NodePayload {
                    id: n.id,
                    position: PositionPayload { x: n.x, y: n.y },
                })
                .collect(),
            edges: board
                .edges()
                .iter()
                .map(|e| EdgePayload { id: e.id, a: e.a, b: e.b })
                .collect(),
            zones: board
                .zones()
                .iter()
                .map(|z| ZonePayload {
                    id: z.id,
                    node_ids: z.node_ids.clone(),
                    edge_ids: z.edge_ids.clone(),
                    owner: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneOwnerPayload {
    pub id: ZoneId,
    pub owner: Option<Player>,
}

/// Match state as plain data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePayload {
    pub current_player: Player,
    pub occupied_edges: Vec<EdgeId>,
    pub zones: Vec<ZoneOwnerPayload>,
}

impl StatePayload {
    pub fn from_state(board: &BoardLayout, state: &GameState) -> Self {
        Self {
            current_player: state.current_player(),
            occupied_edges: state.occupied().iter().collect(),
            zones: (0..board.zone_count())
                .map(|id| ZoneOwnerPayload {
                    id,
                    owner: state.owner(id),
                })
                .collect(),
        }
    }

    /// Validate against `board` and build the state.
    pub fn to_state(&self, board: &BoardLayout) -> Result<GameState> {
        if let Some((index, zone)) = self.zones.iter().enumerate().find(|(i, z)| z.id != *i) {
            return Err(Error::ZoneIdMismatch { index, id: zone.id });
        }
        let owners: Vec<Option<Player>> = self.zones.iter().map(|z| z.owner).collect();
        GameState::from_parts(board, self.current_player, &self.occupied_edges, &owners)
    }
}

/// A request for one AI decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub board: BoardPayload,
    pub state: StatePayload,
    pub level: AiLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<DecisionContext>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub edge: Option<EdgeId>,
}

impl MoveRequest {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check every reference and rebuild the engine inputs.
    ///
    /// A missing context means a fresh one with seed 0.
    pub fn validate(&self) -> Result<(BoardLayout, GameState, AiLevel, DecisionContext)> {
        let board = self.board.to_layout()?;
        let state = self.state.to_state(&board)?;
        let context = self.context.clone().unwrap_or_default();
        Ok((board, state, self.level, context))
    }

    /// Validate and run one decision on `engine`.
    pub fn respond(&self, engine: &mut AIEngine) -> Result<MoveResponse> {
        let (board, state, level, context) = self.validate()?;
        let edge = engine.choose_move(&board, &state, level, &context);
        debug!(
            "wire request: {} edges, {} occupied, {} -> {:?}",
            board.edge_count(),
            state.occupied_count(),
            level.name(),
            edge
        );
        Ok(MoveResponse { edge })
    }
}

/// Parse a JSON [`MoveRequest`] and answer with a JSON [`MoveResponse`].
pub fn handle_json(text: &str, engine: &mut AIEngine) -> Result<String> {
    let response = MoveRequest::from_json(text)?.respond(engine)?;
    Ok(serde_json::to_string(&response)?)
}

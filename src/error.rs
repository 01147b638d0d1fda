//! Error types
//!
//! Only external input (serialized boards and states, engine configuration)
//! can fail. Illegal moves are reported through [`MoveOutcome::played`] and an
//! exhausted search budget only makes the chosen move shallower.
//!
//! [`MoveOutcome::played`]: crate::rules::MoveOutcome

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} at index {index} has id {id}; ids must be dense and ordered")]
    NonDenseId {
        kind: &'static str,
        index: usize,
        id: usize,
    },

    #[error("board has more than {max} {kind}")]
    TooLarge { kind: &'static str, max: usize },

    #[error("edge {edge} references node {node} but the board has {nodes} nodes")]
    EdgeNodeOutOfRange { edge: usize, node: usize, nodes: usize },

    #[error("edge {edge} joins node {node} to itself")]
    DegenerateEdge { edge: usize, node: usize },

    #[error("zone {zone} has no edges")]
    EmptyZone { zone: usize },

    #[error("zone {zone} references edge {edge} but the board has {edges} edges")]
    ZoneEdgeOutOfRange { zone: usize, edge: usize, edges: usize },

    #[error("zone {zone} references node {node} but the board has {nodes} nodes")]
    ZoneNodeOutOfRange { zone: usize, node: usize, nodes: usize },

    #[error("edge {edge} belongs to {zones} zones; at most two zones can share an edge")]
    CrowdedEdge { edge: usize, zones: usize },

    #[error("edge {edge} borders no zone")]
    OrphanEdge { edge: usize },

    #[error("state has {state} zones but the board has {board}")]
    ZoneCountMismatch { state: usize, board: usize },

    #[error("state zone at index {index} has id {id}")]
    ZoneIdMismatch { index: usize, id: usize },

    #[error("occupied edge {edge} is out of range ({edges} edges)")]
    OccupiedEdgeOutOfRange { edge: usize, edges: usize },

    #[error("zone {zone} is owned but not fully enclosed")]
    OwnedZoneOpen { zone: usize },

    #[error("zone {zone} is fully enclosed but has no owner")]
    ClosedZoneUnowned { zone: usize },

    #[error("invalid engine configuration: {0}")]
    Config(String),
}

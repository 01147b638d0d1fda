//! Board representation for Enclose
//!
//! A board is an immutable planar graph ([`BoardLayout`]) of nodes, edges and
//! square zones, plus a compact per-match [`GameState`] recording which edges
//! are drawn and who owns each zone.

pub mod idset;
pub mod layout;
pub mod state;


use serde::{Deserialize, Serialize};

// Re-exports
pub use idset::{IdSet, IdSetIter, MAX_IDS};
pub use layout::{BoardLayout, Edge, Node, Zone};
pub use state::GameState;

/// Dense node id, assigned in construction order
pub type NodeId = usize;
/// Dense edge id, assigned in construction order
pub type EdgeId = usize;
/// Dense zone id, assigned in construction order
pub type ZoneId = usize;

/// The two players. `X` always opens the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    X,
    O,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::X, Player::O];

    /// Get the other player
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Index into per-player tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::X => 0,
            Player::O => 1,
        }
    }

    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'x',
            Player::O => 'o',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Named row templates for the diamond boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardPreset {
    /// 13 zones
    Mini,
    /// 25 zones
    #[default]
    Standard,
    /// 41 zones
    Large,
}

impl BoardPreset {
    pub const ALL: [BoardPreset; 3] = [BoardPreset::Mini, BoardPreset::Standard, BoardPreset::Large];

    /// Row widths, top to bottom
    pub fn rows(self) -> &'static [usize] {
        match self {
            BoardPreset::Mini => &[1, 3, 5, 3, 1],
            BoardPreset::Standard => &[1, 3, 5, 7, 5, 3, 1],
            BoardPreset::Large => &[1, 3, 5, 7, 9, 7, 5, 3, 1],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BoardPreset::Mini => "Mini",
            BoardPreset::Standard => "Standard",
            BoardPreset::Large => "Large",
        }
    }

    /// Build the layout for this preset
    #[must_use]
    pub fn layout(self) -> BoardLayout {
        BoardLayout::from_rows(self.rows())
    }
}

//! Per-match game state

use crate::error::{Error, Result};

use super::{BoardLayout, EdgeId, IdSet, IdSetIter, Player, ZoneId};

/// Mutable per-match record, stored as bitsets so that it is `Copy`.
///
/// Search clones it freely; the live match replaces it wholesale after each
/// move. Ownership is kept as one zone set per player, which makes the score
/// a popcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    current: Player,
    occupied: IdSet,
    owned: [IdSet; 2],
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state: nothing drawn, nothing owned, `X` to move
    pub const fn new() -> Self {
        Self {
            current: Player::X,
            occupied: IdSet::new(),
            owned: [IdSet::new(), IdSet::new()],
        }
    }

    /// Rebuild a state from external data.
    ///
    /// `owners` must have one entry per zone of `board`; an owned zone must
    /// have all of its edges drawn, and a zone with all edges drawn must
    /// have an owner.
    pub fn from_parts(
        board: &BoardLayout,
        current: Player,
        occupied: &[EdgeId],
        owners: &[Option<Player>],
    ) -> Result<Self> {
        if owners.len() != board.zone_count() {
            return Err(Error::ZoneCountMismatch {
                state: owners.len(),
                board: board.zone_count(),
            });
        }

        let mut state = Self {
            current,
            ..Self::new()
        };

        for &edge in occupied {
            if !board.contains_edge(edge) {
                return Err(Error::OccupiedEdgeOutOfRange {
                    edge,
                    edges: board.edge_count(),
                });
            }
            state.occupied.insert(edge);
        }

        for (zone, owner) in owners.iter().enumerate() {
            let closed = state.occupied.is_superset(board.zone_mask(zone));
            match owner {
                Some(player) if closed => state.owned[player.index()].insert(zone),
                Some(_) => return Err(Error::OwnedZoneOpen { zone }),
                None if closed => return Err(Error::ClosedZoneUnowned { zone }),
                None => {}
            }
        }

        Ok(state)
    }

    /// Player to move
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current
    }

    #[inline]
    pub fn occupied(&self) -> &IdSet {
        &self.occupied
    }

    #[inline]
    pub fn is_occupied(&self, edge: EdgeId) -> bool {
        self.occupied.contains(edge)
    }

    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Undrawn edges of `board`
    #[inline]
    pub fn available(&self, board: &BoardLayout) -> IdSet {
        board.all_edges().difference(&self.occupied)
    }

    /// Undrawn edge ids in ascending order
    #[inline]
    pub fn legal_moves(&self, board: &BoardLayout) -> IdSetIter {
        self.available(board).iter()
    }

    #[inline]
    pub fn remaining_count(&self, board: &BoardLayout) -> usize {
        board.edge_count() - self.occupied.overlap(board.all_edges())
    }

    /// Owner of a zone, if captured
    #[inline]
    pub fn owner(&self, zone: ZoneId) -> Option<Player> {
        if self.owned[0].contains(zone) {
            Some(Player::X)
        } else if self.owned[1].contains(zone) {
            Some(Player::O)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_owned(&self, zone: ZoneId) -> bool {
        self.owned[0].contains(zone) || self.owned[1].contains(zone)
    }

    /// Zones owned by `player`
    #[inline]
    pub fn owned_by(&self, player: Player) -> &IdSet {
        &self.owned[player.index()]
    }

    /// Number of zones owned by `player`
    #[inline]
    pub fn score(&self, player: Player) -> usize {
        self.owned[player.index()].len()
    }

    #[inline]
    pub fn owned_count(&self) -> usize {
        self.owned[0].len() + self.owned[1].len()
    }

    /// Drawn edges of a zone
    #[inline]
    pub fn zone_edge_count(&self, board: &BoardLayout, zone: ZoneId) -> usize {
        self.occupied.overlap(board.zone_mask(zone))
    }

    /// True once every zone has an owner
    #[inline]
    pub fn is_over(&self, board: &BoardLayout) -> bool {
        self.owned_count() == board.zone_count()
    }

    #[inline]
    pub(crate) fn occupy(&mut self, edge: EdgeId) {
        self.occupied.insert(edge);
    }

    #[inline]
    pub(crate) fn claim(&mut self, zone: ZoneId, player: Player) {
        self.owned[player.index()].insert(zone);
    }

    #[inline]
    pub(crate) fn pass_turn(&mut self) {
        self.current = self.current.opponent();
    }
}

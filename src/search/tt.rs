//! Transposition Table for caching search results
//!
//! Results are indexed by Zobrist hash so a position reached along different
//! move orders, or again in a later decision, is not searched twice.
//!
//! # Example
//!
//! ```
//! use enclose::search::{EntryType, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new(1); // 1 MB
//!
//! let hash = 0x1234_5678_9ABC_DEF0;
//! tt.store(hash, 5, 100, EntryType::Exact, Some(12));
//!
//! let entry = tt.probe(hash).unwrap();
//! assert_eq!(entry.best_move, Some(12));
//!
//! let (mut alpha, mut beta) = (-1000, 1000);
//! assert_eq!(entry.cutoff(5, &mut alpha, &mut beta), Some(100));
//! ```

use crate::board::EdgeId;

/// Entry type for score interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (alpha fail-low)
    UpperBound,
}

impl EntryType {
    /// Classify a score by the window it was searched with.
    #[inline]
    pub fn from_window(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            EntryType::UpperBound
        } else if score >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        }
    }
}

/// Transposition table entry
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    /// Zobrist hash of the position
    pub hash: u64,
    /// Remaining depth the entry was searched to
    pub depth: u16,
    /// Evaluation score
    pub score: i32,
    /// Type of score (exact, lower bound, upper bound)
    pub entry_type: EntryType,
    /// Best move found for this position
    pub best_move: Option<EdgeId>,
}

impl TTEntry {
    /// Use the entry against a search window.
    ///
    /// Entries shallower than `depth` are ignored. Bounds narrow the window;
    /// returns the score when it is exact or the window has closed.
    #[inline]
    pub fn cutoff(&self, depth: u16, alpha: &mut i32, beta: &mut i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        match self.entry_type {
            EntryType::Exact => return Some(self.score),
            EntryType::LowerBound => *alpha = (*alpha).max(self.score),
            EntryType::UpperBound => *beta = (*beta).min(self.score),
        }
        if *alpha >= *beta {
            Some(self.score)
        } else {
            None
        }
    }
}

/// Transposition table for caching search results.
///
/// Direct-mapped: each hash maps to exactly one slot. Collisions are
/// resolved by a depth-preferred replacement policy.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    size: usize,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let size = (size_mb * 1024 * 1024) / entry_size;

        // Ensure at least some entries
        let size = size.max(1024);

        Self {
            entries: vec![None; size],
            size,
        }
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize
    }

    /// Entry stored for exactly this hash, if any.
    #[inline]
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.entries[self.slot(hash)].filter(|e| e.hash == hash)
    }

    /// Best move remembered for this position, for move ordering.
    #[inline]
    #[must_use]
    pub fn get_best_move(&self, hash: u64) -> Option<EdgeId> {
        self.probe(hash).and_then(|e| e.best_move)
    }

    /// Store a position in the table.
    ///
    /// An entry is replaced if the slot is empty, holds the same position,
    /// or the new search is at least as deep.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u16,
        score: i32,
        entry_type: EntryType,
        best_move: Option<EdgeId>,
    ) {
        let idx = self.slot(hash);

        let should_replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.hash == hash || e.depth <= depth,
        };

        if should_replace {
            self.entries[idx] = Some(TTEntry {
                hash,
                depth,
                score,
                entry_type,
                best_move,
            });
        }
    }

    /// Clear all entries. Called when a new match starts.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.iter().filter(|e| e.is_some()).count();
        TTStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy)]
pub struct TTStats {
    /// Total number of slots in the table
    pub size: usize,
    /// Number of slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}

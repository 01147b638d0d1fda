//! Fixed-width bitset over dense ids (edges or zones)

use std::ops::{BitAnd, BitOr};

/// Capacity of an [`IdSet`]: boards may have at most this many edges and zones.
pub const MAX_IDS: usize = 256;

const WORDS: usize = MAX_IDS / 64;

/// Set of dense ids stored as 4 x u64 (256 bits).
///
/// Used for occupied edges, zone ownership and per-zone edge masks, so that
/// "how many edges of this zone are drawn" is a popcount of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IdSet {
    bits: [u64; WORDS],
}

impl IdSet {
    /// Create empty set
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Set containing every id in `0..len`
    pub fn prefix(len: usize) -> Self {
        debug_assert!(len <= MAX_IDS);
        let mut set = Self::new();
        for (word, bits) in set.bits.iter_mut().enumerate() {
            let lo = word * 64;
            if len >= lo + 64 {
                *bits = u64::MAX;
            } else if len > lo {
                *bits = (1u64 << (len - lo)) - 1;
            }
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, id: usize) {
        debug_assert!(id < MAX_IDS);
        self.bits[id / 64] |= 1u64 << (id % 64);
    }

    #[inline]
    pub fn remove(&mut self, id: usize) {
        if id < MAX_IDS {
            self.bits[id / 64] &= !(1u64 << (id % 64));
        }
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        id < MAX_IDS && (self.bits[id / 64] >> (id % 64)) & 1 == 1
    }

    /// Count set bits (popcount)
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Number of ids present in both sets
    #[inline]
    pub fn overlap(&self, other: &IdSet) -> usize {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// True if every id of `other` is in `self`
    #[inline]
    pub fn is_superset(&self, other: &IdSet) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(a, b)| a & b == *b)
    }

    /// Ids in `self` but not in `other`
    #[inline]
    pub fn difference(&self, other: &IdSet) -> IdSet {
        let mut out = *self;
        for (word, bits) in out.bits.iter_mut().enumerate() {
            *bits &= !other.bits[word];
        }
        out
    }

    /// Iterate over set ids in ascending order
    pub fn iter(&self) -> IdSetIter {
        IdSetIter {
            bits: self.bits,
            word_idx: 0,
            current_word: self.bits[0],
        }
    }

    /// Raw words, for hashing
    #[inline]
    pub fn words(&self) -> &[u64; WORDS] {
        &self.bits
    }
}

impl BitAnd for IdSet {
    type Output = IdSet;

    fn bitand(mut self, rhs: IdSet) -> IdSet {
        for (word, bits) in self.bits.iter_mut().enumerate() {
            *bits &= rhs.bits[word];
        }
        self
    }
}

impl BitOr for IdSet {
    type Output = IdSet;

    fn bitor(mut self, rhs: IdSet) -> IdSet {
        for (word, bits) in self.bits.iter_mut().enumerate() {
            *bits |= rhs.bits[word];
        }
        self
    }
}

impl FromIterator<usize> for IdSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = usize;
    type IntoIter = IdSetIter;

    fn into_iter(self) -> IdSetIter {
        self.iter()
    }
}

/// Iterator over set ids of an [`IdSet`]
pub struct IdSetIter {
    bits: [u64; WORDS],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for IdSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            self.word_idx += 1;
            if self.word_idx >= WORDS {
                return None;
            }
            self.current_word = self.bits[self.word_idx];
        }

        let bit = self.current_word.trailing_zeros() as usize;
        self.current_word &= self.current_word - 1;
        Some(self.word_idx * 64 + bit)
    }
}

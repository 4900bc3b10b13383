//! HAMT node types and bit-twiddling helpers.
//!
//! A node is one of three flavors:
//!
//! - [`Node::Sparse`] — bitmap-indexed, used while a node's population is
//!   small. Slots are packed; no wasted space.
//! - [`Node::Dense`] — fully array-indexed, used once a sparse node would
//!   otherwise hold more than [`DENSE_THRESHOLD`] entries. Trades memory
//!   for branch-free indexing.
//! - [`Node::Collision`] — a linear bucket for keys whose hashes are fully
//!   equal (not merely equal in their current 5-bit window).
//!
//! Nodes are write-once: an update never mutates an existing node, it
//! builds a new one and shares everything else via [`Arc`].

use std::fmt;
use std::sync::Arc;

/// Bits consumed per trie level (5 → 32-way branching).
pub const BITS: u32 = 5;

/// Branching factor, `2^BITS`.
pub const FANOUT: usize = 32;

/// Low-bit mask selecting one level's branch, `FANOUT - 1`.
pub const MASK: u32 = 31;

/// A sparse node with this many populated slots promotes to [`Node::Dense`].
pub const DENSE_THRESHOLD: usize = FANOUT / 2;

/// A dense node with at most this many populated slots demotes to
/// [`Node::Sparse`] on removal.
pub const SPARSE_THRESHOLD: usize = 8;

/// Extracts the 5-bit branch index at bit-offset `shift` of `hash`.
#[inline]
#[must_use]
pub const fn mask(hash: u64, shift: u32) -> u32 {
    ((hash >> shift) & MASK as u64) as u32
}

/// One-hot bitmap position for the branch selected by `mask(hash, shift)`.
#[inline]
#[must_use]
pub const fn bitpos(hash: u64, shift: u32) -> u32 {
    1 << mask(hash, shift)
}

/// Compact position of `bit` within a bitmap's packed slot array: the
/// number of populated bits below it.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

/// Population count of a bitmap.
#[inline]
#[must_use]
pub const fn popcount(bitmap: u32) -> u32 {
    bitmap.count_ones()
}

/// One packed slot of a [`Node::Sparse`] entries array.
///
/// Replaces the classic HAMT's "sub-node sentinel" convention — a reused
/// key slot that means either "direct leaf" or "descend further" — with an
/// explicit tagged union, per the design note against overloading one
/// sentinel for two distinct meanings.
pub enum Slot<K, V> {
    /// A direct key/value leaf occupying this slot.
    Leaf(K, V),
    /// This slot holds a child subtree instead of a leaf.
    Sub(Arc<Node<K, V>>),
}

impl<K: Clone, V: Clone> Clone for Slot<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(k, v) => Self::Leaf(k.clone(), v.clone()),
            Self::Sub(node) => Self::Sub(Arc::clone(node)),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Slot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(k, v) => f.debug_tuple("Leaf").field(k).field(v).finish(),
            Self::Sub(_) => f.debug_tuple("Sub").finish_non_exhaustive(),
        }
    }
}

/// A HAMT trie node.
pub enum Node<K, V> {
    /// Bitmap-indexed node: `entries.len() == popcount(bitmap)`.
    Sparse {
        /// One bit per populated branch, `0..FANOUT`.
        bitmap: u32,
        /// Packed slots, ordered by branch index.
        entries: Vec<Slot<K, V>>,
    },
    /// Array-indexed node with exactly [`FANOUT`] child slots.
    Dense {
        /// Number of non-empty slots, always in `(SPARSE_THRESHOLD, FANOUT]`
        /// for a node actually installed in the trie.
        count: usize,
        /// Every branch, empty or pointing at a child subtree.
        children: Box<[Option<Arc<Node<K, V>>>; FANOUT]>,
    },
    /// A bucket of keys that fully collide on hash.
    Collision {
        /// The hash shared by every key in `pairs`.
        hash: u64,
        /// At least two pairs, pairwise non-equal by key.
        pairs: Vec<(K, V)>,
    },
}

impl<K, V> Node<K, V> {
    /// Builds a single-entry sparse node holding `key`/`value` at the
    /// branch selected by `hash` at `shift`.
    #[must_use]
    pub fn single_leaf(hash: u64, key: K, value: V, shift: u32) -> Arc<Self> {
        Arc::new(Self::Sparse {
            bitmap: bitpos(hash, shift),
            entries: vec![Slot::Leaf(key, value)],
        })
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sparse { bitmap, entries } => f
                .debug_struct("Sparse")
                .field("bitmap", &format_args!("{bitmap:#034b}"))
                .field("entries", entries)
                .finish(),
            Self::Dense { count, .. } => {
                f.debug_struct("Dense").field("count", count).finish_non_exhaustive()
            }
            Self::Collision { hash, pairs } => {
                f.debug_struct("Collision").field("hash", hash).field("pairs", pairs).finish()
            }
        }
    }
}

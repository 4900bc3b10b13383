//! The persistent map facade.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;
use std::sync::{Arc, OnceLock};

use crate::hash::{self, hash_one};
use crate::iter::{Iter, Keys, Values};
use crate::node::Node;
use crate::ops::assoc::assoc_recursive;
use crate::ops::get::find_recursive;
use crate::ops::without::{WithoutResult, without_recursive};

/// A persistent, immutable associative map.
///
/// Backed by a Hash Array Mapped Trie with bitmap-indexed, array-indexed,
/// and hash-collision node variants. Every update (`with_pair`, `without`,
/// `merge`) returns a new, independently useful map that shares untouched
/// structure with every map it was derived from — none of them are
/// invalidated or mutated by the others' existence.
///
/// Two maps holding the same key/value pairs compare equal and hash
/// equal regardless of the order in which they were built.
pub struct ImmutableMap<K, V> {
    root: Option<Arc<Node<K, V>>>,
    size: usize,
    cached_hash: OnceLock<u64>,
}

impl<K, V> ImmutableMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, size: 0, cached_hash: OnceLock::new() }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns a lazy iterator over `(&K, &V)` pairs.
    ///
    /// Order follows the current trie shape and is not a stable API.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_ref())
    }

    /// Returns a lazy iterator over keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.root.as_ref())
    }

    /// Returns a lazy iterator over values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.root.as_ref())
    }

    /// Whether `self` and `other` share the identical root allocation —
    /// the Rust realization of "is the same object" for a no-op update.
    #[cfg(test)]
    pub(crate) fn shares_root_with(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// White-box access to the root node, for tests that assert on trie
    /// shape (sparse/dense/collision, bitmap contents) rather than only on
    /// the behavior the shape produces.
    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<&Arc<Node<K, V>>> {
        self.root.as_ref()
    }
}

impl<K, V> Clone for ImmutableMap<K, V> {
    fn clone(&self) -> Self {
        let cached_hash = OnceLock::new();
        if let Some(h) = self.cached_hash.get() {
            cached_hash.set(*h).expect("freshly constructed OnceLock must be empty");
        }
        Self { root: self.root.clone(), size: self.size, cached_hash }
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> ImmutableMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_ref()?;
        find_recursive(root, hash_one(key), key, 0)
    }

    /// Returns a clone of the value associated with `key`, or `default` if
    /// absent.
    #[must_use]
    pub fn get_or(&self, key: &K, default: V) -> V
    where
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Clone + PartialEq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Clone + PartialEq> ImmutableMap<K, V> {
    /// Returns a new map with `key` mapped to `value`.
    ///
    /// If `key` already mapped to a value equal to `value`, returns a map
    /// sharing the same root as `self` (no allocation below the facade).
    #[must_use]
    pub fn with_pair(&self, key: K, value: V) -> Self {
        let hash = hash_one(&key);
        let starting_root = self
            .root
            .clone()
            .unwrap_or_else(|| Arc::new(Node::Sparse { bitmap: 0, entries: Vec::new() }));

        let (new_root, added_leaf) = assoc_recursive(&starting_root, hash, key, value, 0);

        if let Some(old_root) = &self.root {
            if Arc::ptr_eq(&new_root, old_root) {
                return self.clone();
            }
        }

        Self {
            root: Some(new_root),
            size: if added_leaf { self.size + 1 } else { self.size },
            cached_hash: OnceLock::new(),
        }
    }

    /// Returns a new map with `key` removed, if present.
    ///
    /// If `key` is not in the map, returns a map sharing the same root as
    /// `self`.
    #[must_use]
    pub fn without(&self, key: &K) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };
        match without_recursive(root, hash_one(key), key, 0) {
            WithoutResult::Unchanged => self.clone(),
            WithoutResult::Absent => Self::new(),
            WithoutResult::Changed(new_root) => {
                Self { root: Some(new_root), size: self.size - 1, cached_hash: OnceLock::new() }
            }
        }
    }

    /// Returns a new map with every pair of `pairs` added, applying
    /// `with_pair` for each in turn. Does not mutate `self`.
    #[must_use]
    pub fn merge(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut result = self.clone();
        for (k, v) in pairs {
            result = result.with_pair(k, v);
        }
        result
    }

    /// Builds a map from an iterator of pairs, applying `with_pair`
    /// repeatedly starting from the empty map.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::new().merge(pairs)
    }
}

// ---------------------------------------------------------------------------
// Structural hash and equality
// ---------------------------------------------------------------------------

impl<K: Hash, V: Hash> ImmutableMap<K, V> {
    /// Returns the map's structural hash, computed lazily on first request
    /// and memoized thereafter.
    ///
    /// `hash = HASH_SEED + Σ hash(k) XOR hash(v)` over every pair. The
    /// formula is symmetric in insertion order, so two maps holding the
    /// same pairs hash identically regardless of how they were built.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        *self.cached_hash.get_or_init(|| {
            self.iter().fold(hash::HASH_SEED, |acc, (k, v)| {
                hash::fold_pair(acc, hash_one(k), hash_one(v))
            })
        })
    }
}

impl<K: Hash + Eq, V: Hash + PartialEq> PartialEq for ImmutableMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() || self.content_hash() != other.content_hash() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Eq for ImmutableMap<K, V> {}

impl<K: Hash, V: Hash> Hash for ImmutableMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content_hash().hash(state);
    }
}

// ---------------------------------------------------------------------------
// Other trait impls
// ---------------------------------------------------------------------------

impl<K, V> Default for ImmutableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ImmutableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for ImmutableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k:?}: {v:?}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for ImmutableMap<K, V> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K: Hash + Eq + Clone, V: Clone + PartialEq> FromIterator<(K, V)> for ImmutableMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K: Hash + Eq + Clone, V: Clone + PartialEq> Extend<(K, V)> for ImmutableMap<K, V> {
    /// Rebinds `self` to `self.merge(iter)`. Every node on every affected
    /// path is still a fresh, write-once allocation — this only grows the
    /// local binding in place, the same way pushing to a `Vec` backed by
    /// persistent structure elsewhere in the ecosystem (e.g. `im::HashMap`)
    /// does not violate the data structure's own immutability.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        *self = self.merge(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a ImmutableMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

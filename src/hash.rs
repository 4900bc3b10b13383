//! Map-level structural hash.
//!
//! `hash(m) = HASH_SEED + Σ hash(k) XOR hash(v)` over every pair in `m`.
//! The sum is order-independent: two maps built from the same pairs in
//! different insertion orders hash identically, regardless of how their
//! tries happen to be shaped.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seed for the map-level structural hash. `0x3039` (12345 decimal) has no
/// particular significance beyond being the value the original
/// implementation chose; it is preserved for compatibility.
pub const HASH_SEED: u64 = 0x3039;

/// Computes the 64-bit hash of a value using the standard hasher.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Folds one pair's contribution into a running structural hash total.
#[must_use]
pub fn fold_pair(running: u64, key_hash: u64, value_hash: u64) -> u64 {
    running.wrapping_add(key_hash ^ value_hash)
}

//! A persistent, immutable associative map.
//!
//! Backed by a Hash Array Mapped Trie with three node flavors — bitmap-
//! indexed ([`node::Node::Sparse`]), array-indexed
//! ([`node::Node::Dense`]), and hash-collision ([`node::Node::Collision`])
//! — with promotion and demotion between the first two as population
//! grows and shrinks. Every update returns a new map that shares
//! untouched structure with the map it was derived from; no operation
//! ever mutates an already-returned map, so a live reference is safe to
//! share across threads without locking.
//!
//! # Key properties
//!
//! - **Structural sharing**: writes rebuild only the nodes on the path
//!   from the root to the changed slot; siblings are shared via [`Arc`](std::sync::Arc).
//! - **O(1) amortized structural equality**: via a lazily computed,
//!   memoized map-level hash.
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`.
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod hash;
pub mod iter;
pub mod node;

mod map;
mod ops;

#[cfg(test)]
mod tests;

pub use map::ImmutableMap;

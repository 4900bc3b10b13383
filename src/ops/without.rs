//! Removal operation — COW path-copy delete with structural demotion.
//!
//! A node's `without` can report one of three outcomes, never a sentinel
//! "null": the key was absent ([`WithoutResult::Unchanged`]), the subtree
//! was this key's last pair and is now gone ([`WithoutResult::Absent`]), or
//! a rebuilt subtree replaces it ([`WithoutResult::Changed`]).

use std::hash::Hash;
use std::sync::Arc;

use crate::node::{self, FANOUT, Node, SPARSE_THRESHOLD, Slot};

/// Outcome of a recursive `without` on a subtree.
pub enum WithoutResult<K, V> {
    /// `key` was not present anywhere in this subtree.
    Unchanged,
    /// `key` was this subtree's last entry — it no longer exists.
    Absent,
    /// `key` was removed; the subtree was rebuilt.
    Changed(Arc<Node<K, V>>),
}

/// Removes `key` from the subtree rooted at `node`.
pub fn without_recursive<K, V>(node: &Node<K, V>, hash: u64, key: &K, shift: u32) -> WithoutResult<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    match node {
        Node::Sparse { bitmap, entries } => without_sparse(*bitmap, entries, hash, key, shift),
        Node::Dense { count, children } => without_dense(*count, children, hash, key, shift),
        Node::Collision { hash: node_hash, pairs } => without_collision(*node_hash, pairs, hash, key),
    }
}

fn without_sparse<K, V>(
    bitmap: u32,
    entries: &[Slot<K, V>],
    hash: u64,
    key: &K,
    shift: u32,
) -> WithoutResult<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    let bit = node::bitpos(hash, shift);
    if bitmap & bit == 0 {
        return WithoutResult::Unchanged;
    }
    let idx = node::index(bitmap, bit);
    match &entries[idx] {
        Slot::Sub(child) => match without_recursive(child, hash, key, shift + node::BITS) {
            WithoutResult::Unchanged => WithoutResult::Unchanged,
            WithoutResult::Changed(new_child) => {
                let mut new_entries = entries.to_vec();
                new_entries[idx] = Slot::Sub(new_child);
                WithoutResult::Changed(Arc::new(Node::Sparse { bitmap, entries: new_entries }))
            }
            WithoutResult::Absent => {
                if bitmap == bit {
                    WithoutResult::Absent
                } else {
                    let mut new_entries = entries.to_vec();
                    new_entries.remove(idx);
                    WithoutResult::Changed(Arc::new(Node::Sparse { bitmap: bitmap ^ bit, entries: new_entries }))
                }
            }
        },
        Slot::Leaf(existing_key, _) => {
            if existing_key != key {
                return WithoutResult::Unchanged;
            }
            if entries.len() == 1 {
                WithoutResult::Absent
            } else {
                let mut new_entries = entries.to_vec();
                new_entries.remove(idx);
                WithoutResult::Changed(Arc::new(Node::Sparse { bitmap: bitmap ^ bit, entries: new_entries }))
            }
        }
    }
}

fn without_dense<K, V>(
    count: usize,
    children: &[Option<Arc<Node<K, V>>>; FANOUT],
    hash: u64,
    key: &K,
    shift: u32,
) -> WithoutResult<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    let branch = node::mask(hash, shift) as usize;
    let Some(child) = &children[branch] else {
        return WithoutResult::Unchanged;
    };
    match without_recursive(child, hash, key, shift + node::BITS) {
        WithoutResult::Unchanged => WithoutResult::Unchanged,
        WithoutResult::Absent => {
            if count - 1 <= SPARSE_THRESHOLD {
                WithoutResult::Changed(pack(children, branch))
            } else {
                let mut new_children = children.clone();
                new_children[branch] = None;
                WithoutResult::Changed(Arc::new(Node::Dense { count: count - 1, children: Box::new(new_children) }))
            }
        }
        WithoutResult::Changed(new_child) => {
            let mut new_children = children.clone();
            new_children[branch] = Some(new_child);
            WithoutResult::Changed(Arc::new(Node::Dense { count, children: Box::new(new_children) }))
        }
    }
}

/// Repacks a dense node's remaining children, skipping `skip_branch`, into
/// a sparse node once population has dropped to [`SPARSE_THRESHOLD`].
fn pack<K, V>(children: &[Option<Arc<Node<K, V>>>; FANOUT], skip_branch: usize) -> Arc<Node<K, V>> {
    let mut bitmap = 0u32;
    let mut entries = Vec::new();
    for (branch, child) in children.iter().enumerate() {
        if branch == skip_branch {
            continue;
        }
        if let Some(child) = child {
            bitmap |= 1 << branch;
            entries.push(Slot::Sub(Arc::clone(child)));
        }
    }
    Arc::new(Node::Sparse { bitmap, entries })
}

fn without_collision<K, V>(node_hash: u64, pairs: &[(K, V)], hash: u64, key: &K) -> WithoutResult<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    if hash != node_hash {
        return WithoutResult::Unchanged;
    }
    let Some(idx) = pairs.iter().position(|(k, _)| k == key) else {
        return WithoutResult::Unchanged;
    };
    if pairs.len() == 1 {
        WithoutResult::Absent
    } else {
        let mut new_pairs = pairs.to_vec();
        new_pairs.remove(idx);
        WithoutResult::Changed(Arc::new(Node::Collision { hash: node_hash, pairs: new_pairs }))
    }
}

//! Insertion/update operation — COW path-copy assoc with sparse/dense promotion.
//!
//! Every function takes the subtree it operates on as an `Arc` (not a bare
//! reference) so that a genuine no-op — inserting a key already mapped to
//! an equal value — can return the very same `Arc` pointee it was given,
//! rather than an equal-but-freshly-allocated copy. This is what lets the
//! map facade detect "nothing changed" with a pointer comparison instead
//! of a deep one.

use std::hash::Hash;
use std::sync::Arc;

use crate::hash::hash_one;
use crate::node::{self, DENSE_THRESHOLD, FANOUT, Node, Slot};

/// Returns a new subtree with `key` mapped to `value`, and whether a new
/// leaf was added (`true`) as opposed to an existing value replaced
/// (`false`). If `key` already mapped to an equal `value`, the returned
/// `Arc` is the same pointee as `node_arc`.
pub fn assoc_recursive<K, V>(
    node_arc: &Arc<Node<K, V>>,
    hash: u64,
    key: K,
    value: V,
    shift: u32,
) -> (Arc<Node<K, V>>, bool)
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    match node_arc.as_ref() {
        Node::Sparse { bitmap, entries } => assoc_sparse(node_arc, *bitmap, entries, hash, key, value, shift),
        Node::Dense { count, children } => assoc_dense(node_arc, *count, children, hash, key, value, shift),
        Node::Collision { hash: node_hash, pairs } => {
            assoc_collision(node_arc, *node_hash, pairs, hash, key, value, shift)
        }
    }
}

fn assoc_sparse<K, V>(
    node_arc: &Arc<Node<K, V>>,
    bitmap: u32,
    entries: &[Slot<K, V>],
    hash: u64,
    key: K,
    value: V,
    shift: u32,
) -> (Arc<Node<K, V>>, bool)
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    let bit = node::bitpos(hash, shift);
    let idx = node::index(bitmap, bit);

    if bitmap & bit != 0 {
        match &entries[idx] {
            Slot::Sub(child) => {
                let (new_child, added) = assoc_recursive(child, hash, key, value, shift + node::BITS);
                if Arc::ptr_eq(&new_child, child) {
                    return (Arc::clone(node_arc), false);
                }
                let mut new_entries = entries.to_vec();
                new_entries[idx] = Slot::Sub(new_child);
                (Arc::new(Node::Sparse { bitmap, entries: new_entries }), added)
            }
            Slot::Leaf(existing_key, existing_value) => {
                if *existing_key == key {
                    if *existing_value == value {
                        return (Arc::clone(node_arc), false);
                    }
                    let mut new_entries = entries.to_vec();
                    new_entries[idx] = Slot::Leaf(key, value);
                    (Arc::new(Node::Sparse { bitmap, entries: new_entries }), false)
                } else {
                    let old_hash = hash_one(existing_key);
                    let sub = two_leaf_subtree(
                        shift + node::BITS,
                        old_hash,
                        existing_key.clone(),
                        existing_value.clone(),
                        hash,
                        key,
                        value,
                    );
                    let mut new_entries = entries.to_vec();
                    new_entries[idx] = Slot::Sub(sub);
                    (Arc::new(Node::Sparse { bitmap, entries: new_entries }), true)
                }
            }
        }
    } else {
        let count = node::popcount(bitmap) as usize;
        if count >= DENSE_THRESHOLD {
            (promote_to_dense(bitmap, entries, hash, key, value, shift), true)
        } else {
            let mut new_entries = Vec::with_capacity(entries.len() + 1);
            new_entries.extend_from_slice(&entries[..idx]);
            new_entries.push(Slot::Leaf(key, value));
            new_entries.extend_from_slice(&entries[idx..]);
            (Arc::new(Node::Sparse { bitmap: bitmap | bit, entries: new_entries }), true)
        }
    }
}

/// Expands a sparse node that has just exceeded [`DENSE_THRESHOLD`] into a
/// dense node, re-homing every existing slot at its own branch index.
fn promote_to_dense<K, V>(
    bitmap: u32,
    entries: &[Slot<K, V>],
    hash: u64,
    key: K,
    value: V,
    shift: u32,
) -> Arc<Node<K, V>>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    let mut children: Box<[Option<Arc<Node<K, V>>>; FANOUT]> = Box::new(std::array::from_fn(|_| None));
    let mut slot_idx = 0;
    for branch in 0..FANOUT as u32 {
        if bitmap & (1 << branch) != 0 {
            let child = match &entries[slot_idx] {
                Slot::Sub(child) => Arc::clone(child),
                Slot::Leaf(k, v) => {
                    Node::single_leaf(hash_one(k), k.clone(), v.clone(), shift + node::BITS)
                }
            };
            children[branch as usize] = Some(child);
            slot_idx += 1;
        }
    }
    let branch = node::mask(hash, shift) as usize;
    children[branch] = Some(Node::single_leaf(hash, key, value, shift + node::BITS));
    Arc::new(Node::Dense { count: node::popcount(bitmap) as usize + 1, children })
}

fn assoc_dense<K, V>(
    node_arc: &Arc<Node<K, V>>,
    count: usize,
    children: &[Option<Arc<Node<K, V>>>; FANOUT],
    hash: u64,
    key: K,
    value: V,
    shift: u32,
) -> (Arc<Node<K, V>>, bool)
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    let branch = node::mask(hash, shift) as usize;
    match &children[branch] {
        None => {
            let mut new_children = children.clone();
            new_children[branch] = Some(Node::single_leaf(hash, key, value, shift + node::BITS));
            (Arc::new(Node::Dense { count: count + 1, children: Box::new(new_children) }), true)
        }
        Some(child) => {
            let (new_child, added) = assoc_recursive(child, hash, key, value, shift + node::BITS);
            if Arc::ptr_eq(&new_child, child) {
                return (Arc::clone(node_arc), false);
            }
            let mut new_children = children.clone();
            new_children[branch] = Some(new_child);
            (Arc::new(Node::Dense { count, children: Box::new(new_children) }), added)
        }
    }
}

fn assoc_collision<K, V>(
    node_arc: &Arc<Node<K, V>>,
    node_hash: u64,
    pairs: &[(K, V)],
    hash: u64,
    key: K,
    value: V,
    shift: u32,
) -> (Arc<Node<K, V>>, bool)
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    if hash == node_hash {
        if let Some(i) = pairs.iter().position(|(k, _)| *k == key) {
            if pairs[i].1 == value {
                return (Arc::clone(node_arc), false);
            }
            let mut new_pairs = pairs.to_vec();
            new_pairs[i] = (key, value);
            (Arc::new(Node::Collision { hash: node_hash, pairs: new_pairs }), false)
        } else {
            let mut new_pairs = pairs.to_vec();
            new_pairs.push((key, value));
            (Arc::new(Node::Collision { hash: node_hash, pairs: new_pairs }), true)
        }
    } else {
        // This is the only path by which a CollisionNode gains a sibling of
        // differing hash: wrap it in a fresh sparse node and recurse.
        let wrapper = Arc::new(Node::Sparse {
            bitmap: node::bitpos(node_hash, shift),
            entries: vec![Slot::Sub(Arc::clone(node_arc))],
        });
        assoc_recursive(&wrapper, hash, key, value, shift)
    }
}

/// Builds a subtree holding two colliding leaves that diverged in some
/// parent's slot, starting resolution at `shift`.
pub fn two_leaf_subtree<K, V>(
    shift: u32,
    old_hash: u64,
    old_key: K,
    old_value: V,
    new_hash: u64,
    new_key: K,
    new_value: V,
) -> Arc<Node<K, V>>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    if old_hash == new_hash {
        return Arc::new(Node::Collision {
            hash: old_hash,
            pairs: vec![(old_key, old_value), (new_key, new_value)],
        });
    }
    let empty = Arc::new(Node::Sparse { bitmap: 0, entries: Vec::new() });
    let (with_old, _) = assoc_recursive(&empty, old_hash, old_key, old_value, shift);
    let (with_both, _) = assoc_recursive(&with_old, new_hash, new_key, new_value, shift);
    with_both
}

//! Lookup operation — traverses the trie to find a key.

use crate::node::{self, Node, Slot};

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns a reference to the value if found.
pub fn find_recursive<'a, K, V>(node: &'a Node<K, V>, hash: u64, key: &K, shift: u32) -> Option<&'a V>
where
    K: Eq,
{
    match node {
        Node::Sparse { bitmap, entries } => {
            let bit = node::bitpos(hash, shift);
            if bitmap & bit == 0 {
                return None;
            }
            match &entries[node::index(*bitmap, bit)] {
                Slot::Leaf(k, v) => (k == key).then_some(v),
                Slot::Sub(child) => find_recursive(child, hash, key, shift + node::BITS),
            }
        }
        Node::Dense { children, .. } => {
            let branch = node::mask(hash, shift) as usize;
            children[branch]
                .as_ref()
                .and_then(|child| find_recursive(child, hash, key, shift + node::BITS))
        }
        Node::Collision { hash: node_hash, pairs } => {
            if hash != *node_hash {
                return None;
            }
            pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
        }
    }
}

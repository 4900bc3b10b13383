//! Completeness tests: `with_pair`/`without` must not lose data.

use crate::ImmutableMap;

// ---------------------------------------------------------------------------
// with_pair must preserve prior pairs across updates
// ---------------------------------------------------------------------------

#[test]
fn with_pair_new_key() {
    let map = ImmutableMap::new().with_pair("key", 42);
    assert_eq!(map.get(&"key"), Some(&42));
    assert_eq!(map.len(), 1);
}

#[test]
fn with_pair_update_returns_new_value() {
    let map = ImmutableMap::new().with_pair("key", 1).with_pair("key", 2);
    assert_eq!(map.get(&"key"), Some(&2));
    assert_eq!(map.len(), 1, "updating a key must not change size");
}

#[test]
fn with_pair_update_chain() {
    let map = ImmutableMap::new().with_pair("k", 10).with_pair("k", 20).with_pair("k", 30);
    assert_eq!(map.get(&"k"), Some(&30));
    assert_eq!(map.len(), 1);
}

/// Property 3 ("idempotent insert"): re-inserting a key with the value it
/// already holds must not just compare equal, it must return a map sharing
/// the original's root — no new node is allocated anywhere on the path.
#[test]
fn with_pair_same_value_shares_root() {
    let map = ImmutableMap::new().with_pair("key", 42).with_pair("other", 7);
    let same = map.with_pair("key", 42);
    assert!(same.shares_root_with(&map), "re-asserting an unchanged (k, v) must not rebuild the trie");
    assert_eq!(same.len(), map.len());
}

// ---------------------------------------------------------------------------
// without must actually remove the targeted key and nothing else
// ---------------------------------------------------------------------------

#[test]
fn without_existing_removes_value() {
    let map = ImmutableMap::new().with_pair("a", 100);
    let removed = map.without(&"a");
    assert_eq!(removed.get(&"a"), None, "without should remove the key");
    assert!(removed.is_empty());
}

/// Property 6 ("missing remove"): removing an absent key must return a map
/// sharing the original's root, not merely one that compares equal.
#[test]
fn without_missing_is_noop() {
    let map = ImmutableMap::new().with_pair("a", 1);
    let removed = map.without(&"z");
    assert_eq!(removed.len(), 1, "removing a missing key should not change size");
    assert_eq!(removed.get(&"a"), Some(&1));
    assert!(removed.shares_root_with(&map), "without on a missing key must return the same root");
}

#[test]
fn without_correct_value_among_many() {
    let mut map = ImmutableMap::new();
    for i in 0..100 {
        map = map.with_pair(i, i * 10);
    }
    let map = map.without(&50);
    assert_eq!(map.get(&50), None);
    assert_eq!(map.len(), 99);
    for i in 0..100 {
        if i != 50 {
            assert_eq!(map.get(&i), Some(&(i * 10)));
        }
    }
}

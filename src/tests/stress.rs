use crate::ImmutableMap;

/// 1000 entries: insert all, verify all, remove all.
#[test]
fn thousand_entries() {
    let mut map = ImmutableMap::new();
    for i in 0_u64..1000 {
        map = map.with_pair(i, i * 3);
    }
    assert_eq!(map.len(), 1000);

    for i in 0_u64..1000 {
        assert_eq!(map.get(&i), Some(&(i * 3)), "missing key {i}");
    }

    for i in 0_u64..1000 {
        let before = map.len();
        map = map.without(&i);
        assert_eq!(map.len(), before - 1, "failed to remove key {i}");
    }
    assert!(map.is_empty());
    assert_eq!(map.content_hash(), crate::hash::HASH_SEED);
}

/// Deep trie: keys with shared hash prefixes force deeper nodes.
#[test]
fn deep_shared_prefixes() {
    // Sequential integers often share hash prefix bits, forcing deeper
    // trie nodes.
    let map = ImmutableMap::from_pairs((0_u64..500).map(|i| (i, i)));
    assert_eq!(map.len(), 500);
    for i in 0_u64..500 {
        assert_eq!(map.get(&i), Some(&i));
    }
}

/// Insert + overwrite + remove interleaved.
#[test]
fn interleaved_operations() {
    let mut map = ImmutableMap::new();
    for i in 0_u64..200 {
        map = map.with_pair(i, i);
    }
    // Overwrite even keys.
    for i in (0_u64..200).step_by(2) {
        map = map.with_pair(i, i + 1000);
    }
    // Remove odd keys.
    for i in (1_u64..200).step_by(2) {
        map = map.without(&i);
    }
    assert_eq!(map.len(), 100);
    for i in (0_u64..200).step_by(2) {
        assert_eq!(map.get(&i), Some(&(i + 1000)));
    }
}

/// Every intermediate version produced along the way remains valid and
/// distinct — structural sharing must never let a later write corrupt an
/// earlier snapshot.
#[test]
fn all_intermediate_versions_remain_valid() {
    let mut versions = Vec::new();
    let mut map = ImmutableMap::new();
    for i in 0_u64..300 {
        map = map.with_pair(i, i);
        versions.push(map.clone());
    }

    for (i, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), i + 1);
        for k in 0..=i as u64 {
            assert_eq!(version.get(&k), Some(&k));
        }
        assert_eq!(version.get(&(i as u64 + 1)), None);
    }
}

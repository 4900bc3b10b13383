use crate::ImmutableMap;

#[test]
fn default_is_empty() {
    let map: ImmutableMap<i32, i32> = ImmutableMap::default();
    assert!(map.is_empty());
    assert_eq!(map.content_hash(), crate::hash::HASH_SEED);
}

#[test]
fn debug_format_is_map_style() {
    let map = ImmutableMap::new().with_pair(1, "a");
    let dbg = format!("{map:?}");
    assert!(dbg.contains('1'));
    assert!(dbg.contains("\"a\""));
}

#[test]
fn display_format_matches_pairs() {
    let map = ImmutableMap::new().with_pair(1, "a");
    let shown = format!("{map}");
    assert!(shown.starts_with('{'));
    assert!(shown.ends_with('}'));
    assert!(shown.contains("1: \"a\""));
}

#[test]
fn from_iterator() {
    let map: ImmutableMap<i32, i32> = vec![(1, 10), (2, 20), (3, 30)].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(&10));
}

#[test]
fn extend_trait() {
    let mut map = ImmutableMap::new();
    map.extend(vec![(1, 10)]);
    map.extend(vec![(2, 20), (3, 30)]);
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(&10));
    assert_eq!(map.get(&2), Some(&20));
    assert_eq!(map.get(&3), Some(&30));
}

#[test]
fn extend_overwrite_existing_key() {
    let mut map = ImmutableMap::new().with_pair(1, "old");
    map.extend(vec![(1, "new"), (2, "b")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some(&"new"));
}

#[test]
fn into_iterator_for_reference() {
    let map = ImmutableMap::new().with_pair(1, 10).with_pair(2, 20);
    let mut seen: Vec<_> = (&map).into_iter().map(|(k, v)| (*k, *v)).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![(1, 10), (2, 20)]);
}

#[test]
fn index_existing() {
    let map = ImmutableMap::new().with_pair("key", 42);
    assert_eq!(map[&"key"], 42);
}

#[test]
#[should_panic(expected = "key not found")]
fn index_missing_panics() {
    let map: ImmutableMap<i32, i32> = ImmutableMap::new();
    let _ = map[&999];
}

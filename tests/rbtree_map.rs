use std::collections::BTreeMap;
use std::ops::Bound;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use topdown_rbtree::rbtree_map;
use topdown_rbtree::{Color, Error, Natural, NodeRef, RBTreeMap, Reversed, Violation};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys are drawn from a range small enough to cause frequent collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Longest path from `node` to an empty link, in nodes.
fn height<K, V>(node: Option<NodeRef<'_, K, V>>) -> usize {
    node.map_or(0, |node| 1 + height(node.left()).max(height(node.right())))
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Add(i64, i64),
    AddOrUpdate(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    Contains(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Add(k, v)),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::AddOrUpdate(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Contains),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeMap and BTreeMap, asserting
    /// identical results and a valid red-black tree at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Add(k, v) => {
                    let rb_result = rb_map.add(*k, *v);
                    let bt_result = if bt_map.contains_key(k) {
                        Err(Error::DuplicateKey)
                    } else {
                        bt_map.insert(*k, *v);
                        Ok(())
                    };
                    prop_assert_eq!(rb_result, bt_result, "add({}, {})", k, v);
                }
                MapOp::AddOrUpdate(k, v) => {
                    let rb_result = rb_map.add_or_update(*k, *v);
                    let bt_result = bt_map.insert(*k, *v);
                    prop_assert_eq!(rb_result, bt_result, "add_or_update({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    let rb_result = rb_map.remove(k);
                    let bt_result = bt_map.remove(k).is_some();
                    prop_assert_eq!(rb_result, bt_result, "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    let rb_result = rb_map.remove_entry(k);
                    let bt_result = bt_map.remove_entry(k);
                    prop_assert_eq!(rb_result, bt_result, "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    let rb_result = rb_map.get(k);
                    let bt_result = bt_map.get(k);
                    prop_assert_eq!(rb_result, bt_result, "get({})", k);
                }
                MapOp::Contains(k) => {
                    let rb_result = rb_map.contains(k);
                    let bt_result = bt_map.contains_key(k);
                    prop_assert_eq!(rb_result, bt_result, "contains({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                    prop_assert_eq!(rb_map.min().ok(), bt_map.keys().next(), "min");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(rb_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                    prop_assert_eq!(rb_map.max().ok(), bt_map.keys().next_back(), "max");
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb_map.pop_first(), bt_map.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(rb_map.pop_last(), bt_map.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.validate(), Ok(()), "invalid tree after {:?}", op);
        }

        let rb_entries: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_entries: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(rb_entries, bt_entries);
    }

    /// A tree of n entries is never taller than 2 * log2(n + 1).
    #[test]
    fn height_stays_logarithmic(keys in proptest::collection::vec(key_strategy(), 1..TEST_SIZE)) {
        let mut map = RBTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            map.add_or_update(*k, i);
        }
        let bound = 2.0 * ((map.len() + 1) as f64).log2();
        prop_assert!(height(map.root()) as f64 <= bound, "height {} for {} entries", height(map.root()), map.len());

        for k in keys.iter().step_by(2) {
            map.remove(k);
        }
        let bound = 2.0 * ((map.len() + 1) as f64).log2();
        prop_assert!(height(map.root()) as f64 <= bound, "height {} for {} entries", height(map.root()), map.len());
    }

    /// Rejected duplicates leave both the value and the tree shape untouched.
    #[test]
    fn rejected_add_changes_nothing(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let (key, value) = entries[pick.index(entries.len())];
        let shape_before: Vec<_> = map.level_order().map(|(&k, &v)| (k, v)).collect();

        prop_assert_eq!(map.add(key, value.wrapping_add(1)), Err(Error::DuplicateKey));

        let shape_after: Vec<_> = map.level_order().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(shape_before, shape_after);
    }

    /// Tests range queries match BTreeMap.
    #[test]
    fn range_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let rb_range: Vec<_> = rb_map.range(lo..=hi).map(|(&k, &v)| (k, v)).collect();
        let bt_range: Vec<_> = bt_map.range(lo..=hi).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_range, &bt_range, "range({}..={}) mismatch", lo, hi);

        let rb_range: Vec<_> = rb_map.range(lo..hi).map(|(&k, &v)| (k, v)).collect();
        let bt_range: Vec<_> = bt_map.range(lo..hi).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_range, &bt_range, "range({}..{}) mismatch", lo, hi);

        let rb_range: Vec<_> = rb_map.range(lo..).map(|(&k, &v)| (k, v)).collect();
        let bt_range: Vec<_> = bt_map.range(lo..).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_range, &bt_range, "range({}..) mismatch", lo);

        let rb_range: Vec<_> = rb_map.range(..=hi).map(|(&k, &v)| (k, v)).collect();
        let bt_range: Vec<_> = bt_map.range(..=hi).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_range, &bt_range, "range(..={}) mismatch", hi);

        let rb_range: Vec<_> = rb_map.range((Bound::Excluded(lo), Bound::Included(hi))).map(|(&k, &v)| (k, v)).collect();
        let bt_range: Vec<_> = bt_map.range((Bound::Excluded(lo), Bound::Included(hi))).map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_range, &bt_range, "range((Excluded({}), Included({}))) mismatch", lo, hi);
    }

    /// Whatever node find_range returns lies inside the range, and it returns one whenever the
    /// range holds a key.
    #[test]
    fn find_range_agrees_with_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let found = rb_map.find_range(lo..=hi).map(|node| *node.key());
        if lo <= hi {
            let expected_any = bt_map.range(lo..=hi).next().is_some();
            prop_assert_eq!(found.is_some(), expected_any);
        } else {
            prop_assert_eq!(found, None);
        }
        if let Some(key) = found {
            prop_assert!(lo <= key && key <= hi);
            prop_assert_eq!(bt_map.get(&key), rb_map.get(&key));
        }

        prop_assert_eq!(rb_map.find_range(..).is_some(), !bt_map.is_empty());
    }

    /// Every traversal visits each entry exactly once.
    #[test]
    fn traversals_cover_every_entry(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let in_order: Vec<_> = map.in_order().map(|(&k, &v)| (k, v)).collect();

        for walk in [
            map.pre_order().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(),
            map.post_order().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(),
            map.level_order().map(|(&k, &v)| (k, v)).collect::<Vec<_>>(),
        ] {
            let mut sorted = walk;
            sorted.sort_unstable();
            prop_assert_eq!(&sorted, &in_order);
        }

        prop_assert_eq!(map.pre_order().next().map(|(&k, _)| k), map.root().map(|node| *node.key()));
        prop_assert_eq!(map.level_order().next().map(|(&k, _)| k), map.root().map(|node| *node.key()));
        prop_assert_eq!(map.post_order().last().map(|(&k, _)| k), map.root().map(|node| *node.key()));
    }

    /// Tests that iteration from both ends matches BTreeMap.
    #[test]
    fn iter_size_and_double_ended(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(rb_map.iter().len(), bt_map.len());
        let rb_rev: Vec<_> = rb_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(rb_rev, bt_rev);

        let mut rb_iter = rb_map.keys();
        let mut bt_iter = bt_map.keys();
        loop {
            let rb_front = rb_iter.next();
            prop_assert_eq!(rb_front, bt_iter.next());
            let rb_back = rb_iter.next_back();
            prop_assert_eq!(rb_back, bt_iter.next_back());
            if rb_front.is_none() || rb_back.is_none() {
                break;
            }
        }

        let rb_values: Vec<_> = rb_map.values().copied().collect();
        let bt_values: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(rb_values, bt_values);
    }

    /// Tests owned iteration, cloning and equality.
    #[test]
    fn owned_iter_clone_and_eq(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let copy = rb_map.clone();
        prop_assert_eq!(&copy, &rb_map);
        prop_assert_eq!(copy.validate(), Ok(()));

        let owned: Vec<_> = rb_map.into_iter().collect();
        let expected: Vec<_> = bt_map.into_iter().collect();
        prop_assert_eq!(owned, expected);
    }

    /// Tests that equal maps produce equal hashes.
    #[test]
    fn hash_consistent_for_equal_maps(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let map1: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        // Same entries, different insertion order and therefore a different tree shape.
        let map2: RBTreeMap<i64, i64> = map1.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&map1, &map2);

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        map1.hash(&mut h1);
        map2.hash(&mut h2);
        prop_assert_eq!(h1.finish(), h2.finish(), "equal maps should have equal hashes");
    }
}

// ─── Custom comparators ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// A reversed comparator yields the BTreeMap order backwards.
    #[test]
    fn reversed_comparator_matches_reversed_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
    ) {
        let rb_map = RBTreeMap::from_iter_with_comparator(entries.iter().copied(), Reversed(Natural));
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(rb_map.validate(), Ok(()));
        let rb_entries: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_entries: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(rb_entries, bt_entries);
        prop_assert_eq!(rb_map.min().ok(), bt_map.keys().next_back());
    }

    /// A closure comparator drives placement, lookup and removal.
    #[test]
    fn closure_comparator_orders_by_its_projection(keys in proptest::collection::vec(key_strategy(), TEST_SIZE)) {
        let mut map = RBTreeMap::with_comparator(|a: &i64, b: &i64| a.rem_euclid(100).cmp(&b.rem_euclid(100)));
        for k in &keys {
            let _ = map.add(*k, ());
        }
        prop_assert!(map.len() <= 100);
        prop_assert_eq!(map.validate(), Ok(()));

        for k in &keys {
            // Any key with the same remainder finds the stored one.
            prop_assert!(map.contains(&(k.rem_euclid(100) + 500)));
        }
        for k in &keys {
            map.remove(k);
        }
        prop_assert!(map.is_empty());
        prop_assert_eq!(map.validate(), Ok(()));
    }
}

// ─── Documented scenario ─────────────────────────────────────────────────────

#[test]
fn add_six_remove_root_key() {
    let mut map = RBTreeMap::new();
    for (k, v) in [(10, "ten"), (20, "twenty"), (5, "five"), (15, "fifteen"), (25, "twenty-five"), (3, "three")] {
        map.add(k, v).unwrap();
    }
    assert_eq!(map.len(), 6);
    assert_eq!(map.min(), Ok(&3));
    assert_eq!(map.max(), Ok(&25));

    assert!(map.remove(&10));
    assert_eq!(map.len(), 5);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5, 15, 20, 25]);
    assert_eq!(map.validate(), Ok(()));

    assert!(!map.remove(&99));
    assert_eq!(map.len(), 5);
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn ascending_inserts_rotate_the_root() {
    let map = RBTreeMap::from([(1, ()), (2, ()), (3, ())]);
    let root = map.root().unwrap();
    assert_eq!((*root.key(), root.color()), (2, Color::Black));
    let (left, right) = (root.left().unwrap(), root.right().unwrap());
    assert_eq!((*left.key(), left.color()), (1, Color::Red));
    assert_eq!((*right.key(), right.color()), (3, Color::Red));
}

#[test]
fn find_node_exposes_the_tree_shape() {
    let map: RBTreeMap<i32, i32> = (1..=7).map(|k| (k, k * k)).collect();
    let node = map.find_node(&4).unwrap();
    assert_eq!(node.key_value(), (&4, &16));
    assert!(map.find_node(&8).is_none());

    let root = map.root().unwrap();
    assert!(!root.is_red());
    assert!(root.left().is_some_and(|left| left.key() < root.key()));
    assert!(root.right().is_some_and(|right| right.key() > root.key()));
}

// ─── Empty map behavior ──────────────────────────────────────────────────────

#[test]
fn empty_map_reports_errors() {
    let mut map: RBTreeMap<u8, u8> = RBTreeMap::default();
    assert_eq!(map.min(), Err(Error::EmptyCollection));
    assert_eq!(map.max(), Err(Error::EmptyCollection));
    assert_eq!(map.try_get(&1), Err(Error::KeyNotFound));
    assert!(!map.remove(&1));
    assert_eq!(map.pop_first(), None);
    assert_eq!(map.pop_last(), None);
    assert!(map.find_range(..).is_none());
    assert!(map.root().is_none());
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(map.pre_order().count(), 0);
    assert_eq!(map.level_order().count(), 0);
}

#[test]
fn clear_empties_and_allows_reuse() {
    let mut map: RBTreeMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
    assert_eq!(map.validate(), Ok(()));

    map.add(7, 7).unwrap();
    assert_eq!(map.first_key_value(), Some((&7, &7)));
    assert_eq!(map.validate(), Ok(()));
}

// ─── Lookups and trait impls ─────────────────────────────────────────────────

#[test]
fn lookups_agree() {
    let mut map = RBTreeMap::from([("a", 1), ("b", 2)]);
    assert_eq!(map.get(&"a"), Some(&1));
    assert_eq!(map.get_key_value(&"b"), Some((&"b", &2)));
    assert_eq!(map.try_get(&"b"), Ok(&2));
    assert_eq!(map[&"a"], 1);

    *map.get_mut(&"a").unwrap() += 10;
    assert_eq!(map[&"a"], 11);
    assert_eq!(map.get_mut(&"z"), None);
}

#[test]
fn debug_formats_like_a_map() {
    let map = RBTreeMap::from([(2, 'b'), (1, 'a')]);
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
    assert_eq!(format!("{:?}", map.keys()), "[1, 2]");
}

#[test]
fn add_or_update_keeps_the_stored_key() {
    let mut map = RBTreeMap::with_comparator(|a: &i32, b: &i32| a.rem_euclid(10).cmp(&b.rem_euclid(10)));
    for k in 0..10 {
        assert_eq!(map.add_or_update(k, k), None);
    }
    for k in 10..40 {
        assert_eq!(map.add_or_update(k, k), Some(k - 10));
        assert_eq!(map.validate(), Ok(()));
    }
    assert_eq!(map.len(), 10);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    assert_eq!(map.values().copied().collect::<Vec<_>>(), (30..40).collect::<Vec<_>>());
}

#[test]
fn extend_overwrites_existing_values() {
    let mut map = RBTreeMap::from([(1, "one")]);
    map.extend([(1, "uno"), (2, "dos")]);
    assert_eq!(map[&1], "uno");
    assert_eq!(map.len(), 2);
}

#[test]
fn capacity_is_kept_across_removals() {
    let mut map: RBTreeMap<u32, u32> = RBTreeMap::with_capacity(64);
    let capacity = map.capacity();
    assert!(capacity >= 64);
    for k in 0..64 {
        map.add(k, k).unwrap();
    }
    for k in 0..32 {
        map.remove(&k);
    }
    for k in 100..132 {
        map.add(k, k).unwrap();
    }
    assert_eq!(map.capacity(), capacity);
}

#[test]
fn iterator_types_are_nameable() {
    let map = RBTreeMap::from([(1, 1)]);
    let iter: rbtree_map::Iter<'_, i32, i32> = map.iter();
    let range: rbtree_map::Range<'_, i32, i32> = map.range(..);
    let into_iter: rbtree_map::IntoIter<i32, i32> = map.clone().into_iter();
    assert_eq!(iter.count() + range.count() + into_iter.count(), 3);
}

#[test]
fn violations_print_readably() {
    let violation = Violation::RedRedLink { depth: 3 };
    assert_eq!(violation.to_string(), "red node with a red child at depth 3");
}

// ─── Panics ──────────────────────────────────────────────────────────────────

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = RBTreeMap::from([(1, 1)]);
    let _ = map[&2];
}

#[test]
#[should_panic(expected = "range start is greater than range end in RBTreeMap")]
fn inverted_range_panics() {
    let map = RBTreeMap::from([(1, 1)]);
    let _ = map.range((Bound::Included(5), Bound::Included(1)));
}

#[test]
#[should_panic(expected = "range start is greater than range end in RBTreeMap")]
fn inverted_range_under_custom_comparator_panics() {
    let map = RBTreeMap::from_iter_with_comparator([(1, 1)], Reversed(Natural));
    let _ = map.range(1..5);
}

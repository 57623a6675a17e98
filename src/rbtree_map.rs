use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Bound, Index, RangeBounds};

use crate::compare::{Comparator, Natural};
use crate::error::{Error, Violation};
use crate::raw::{Color, Handle, RawRBTreeMap, Target};

mod capacity;
mod traversal;

pub use traversal::{Iter, Keys, LevelOrder, PostOrder, PreOrder, Range, Values};

/// Validates that the start bound does not exceed the end bound.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<K, C, R>(comparator: &C, range: &R)
where
    C: Comparator<K> + ?Sized,
    R: RangeBounds<K> + ?Sized,
{
    if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
        (range.start_bound(), range.end_bound())
    {
        let order = comparator.compare(start, end);
        let valid =
            if matches!(range.start_bound(), Bound::Excluded(_)) && matches!(range.end_bound(), Bound::Excluded(_)) {
                order == Ordering::Less
            } else {
                order != Ordering::Greater
            };
        assert!(valid, "range start is greater than range end in RBTreeMap");
    }
}

/// An ordered map based on a [red-black tree].
///
/// Keys are ordered by a [`Comparator`] chosen at construction; by default that is the key type's
/// own [`Ord`] ordering ([`Natural`]). Every key appears at most once.
///
/// The tree is rebalanced in a single pass from the root on every insertion and removal: 4-nodes
/// are split on the way down when adding, and 2-nodes are widened on the way down when removing.
/// No parent links are stored and no fix-up walk back up the tree is ever needed. The height of
/// the tree stays below `2 * log2(n + 1)`.
///
/// Iterators obtained from [`RBTreeMap::iter`], [`RBTreeMap::keys`] or [`RBTreeMap::values`]
/// produce their items in key order. The tree can also be walked in [pre-order],
/// [post-order] and [level-order].
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key changes while it is in the map. The behavior resulting from such a logic error is
/// not specified, but will be encapsulated to the `RBTreeMap` that observed it and not result in
/// undefined behavior. [`RBTreeMap::validate`] can be used to detect it.
///
/// # Examples
///
/// ```
/// use topdown_rbtree::{Error, RBTreeMap};
///
/// let mut index = RBTreeMap::new();
///
/// for (key, value) in [(10, "j"), (20, "t"), (5, "e"), (15, "o"), (25, "y"), (3, "c")] {
///     index.add(key, value).unwrap();
/// }
/// assert_eq!(index.len(), 6);
/// assert_eq!(index.add(5, "again"), Err(Error::DuplicateKey));
///
/// let keys: Vec<_> = index.keys().copied().collect();
/// assert_eq!(keys, [3, 5, 10, 15, 20, 25]);
/// assert_eq!((index.min(), index.max()), (Ok(&3), Ok(&25)));
///
/// assert!(index.remove(&10));
/// assert!(!index.remove(&99));
/// assert_eq!(index.len(), 5);
/// assert!(index.validate().is_ok());
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [pre-order]: RBTreeMap::pre_order
/// [post-order]: RBTreeMap::post_order
/// [level-order]: RBTreeMap::level_order
pub struct RBTreeMap<K, V, C = Natural> {
    raw: RawRBTreeMap<K, V>,
    comparator: C,
}

/// A borrowed node of an [`RBTreeMap`], as returned by [`find_node`] and [`find_range`].
///
/// Besides the entry it exposes the node's color and children, so the shape of the tree can be
/// inspected.
///
/// [`find_node`]: RBTreeMap::find_node
/// [`find_range`]: RBTreeMap::find_range
pub struct NodeRef<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    handle: Handle,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    fn new(raw: &'a RawRBTreeMap<K, V>, handle: Handle) -> Self {
        NodeRef { raw, handle }
    }

    /// The node's key.
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.raw.node(self.handle).key()
    }

    /// The node's value.
    #[must_use]
    pub fn value(&self) -> &'a V {
        self.raw.node(self.handle).value()
    }

    /// The node's key and value.
    #[must_use]
    pub fn key_value(&self) -> (&'a K, &'a V) {
        let node = self.raw.node(self.handle);
        (node.key(), node.value())
    }

    /// The node's color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.raw.node(self.handle).color()
    }

    /// Returns `true` if the node is red.
    #[must_use]
    pub fn is_red(&self) -> bool {
        self.raw.node(self.handle).is_red()
    }

    /// The left child, holding smaller keys.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.raw.node(self.handle).left().map(|handle| NodeRef::new(self.raw, handle))
    }

    /// The right child, holding greater keys.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.raw.node(self.handle).right().map(|handle| NodeRef::new(self.raw, handle))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("color", &self.color())
            .finish()
    }
}

/// An owning iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use topdown_rbtree::RBTreeMap;
///
/// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next(), Some((1, "a")));
/// assert_eq!(iter.next_back(), Some((2, "b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by the keys' [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be added to the empty map
    /// map.add(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> RBTreeMap<K, V> {
        RBTreeMap::with_comparator(Natural)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.add(1, "a").unwrap();
    /// map.add(2, "b").unwrap();
    /// assert_eq!(map.min(), Ok(&2));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::new(),
            comparator,
        }
    }

    /// Returns the comparator that orders this map's keys.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.add(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// The whole tree is discarded at once without rebalancing. Allocated node storage is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.add(1, "a").unwrap();
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        tracing::trace!(len = self.raw.len(), "clearing red-black tree");
        self.raw.clear();
    }

    /// Returns the root node, or `None` if the map is empty.
    ///
    /// ```
    /// use topdown_rbtree::{Color, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, ()), (2, ()), (3, ())]);
    /// let root = map.root().unwrap();
    /// assert_eq!((*root.key(), root.color()), (2, Color::Black));
    /// assert_eq!(root.left().map(|node| node.color()), Some(Color::Red));
    /// ```
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.raw.root().map(|handle| NodeRef::new(&self.raw, handle))
    }

    /// Returns the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{Error, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.min(), Err(Error::EmptyCollection));
    /// map.add(3, 'c').unwrap();
    /// map.add(1, 'a').unwrap();
    /// assert_eq!(map.min(), Ok(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn min(&self) -> Result<&K, Error> {
        self.first_key_value().map(|(key, _)| key).ok_or(Error::EmptyCollection)
    }

    /// Returns the greatest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn max(&self) -> Result<&K, Error> {
        self.last_key_value().map(|(key, _)| key).ok_or(Error::EmptyCollection)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.add(1, "b").unwrap();
    /// map.add(2, "a").unwrap();
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.first()?);
        Some((node.key(), node.value()))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.last()?);
        Some((node.key(), node.value()))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// This is the in-order traversal and the map's default iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Walks the tree in order: left subtree, node, right subtree. Same as [`iter`](Self::iter).
    pub fn in_order(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Walks the tree in pre-order: node, left subtree, right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    /// let keys: Vec<_> = map.pre_order().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [2, 1, 3, 4]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder::new(&self.raw)
    }

    /// Walks the tree in post-order: left subtree, right subtree, node.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    /// let keys: Vec<_> = map.post_order().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 4, 3, 2]);
    /// ```
    pub fn post_order(&self) -> PostOrder<'_, K, V> {
        PostOrder::new(&self.raw)
    }

    /// Walks the tree level by level from the root, left to right within a level.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    /// let keys: Vec<_> = map.level_order().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [2, 1, 3, 4]);
    /// ```
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        LevelOrder::new(&self.raw)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }
}

impl<K, V, C: Comparator<K>> RBTreeMap<K, V, C> {
    /// Builds a map ordered by `comparator` from an iterator of entries. Later entries overwrite
    /// the values of earlier entries with an equal key.
    pub fn from_iter_with_comparator<I>(iter: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = RBTreeMap::with_comparator(comparator);
        map.extend(iter);
        map
    }

    /// Adds a new entry to the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if an entry with an equal key is already present. The map
    /// is left untouched: neither the stored value nor the shape of the tree changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{Error, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.add(37, "a"), Ok(()));
    /// assert_eq!(map.add(37, "b"), Err(Error::DuplicateKey));
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn add(&mut self, key: K, value: V) -> Result<(), Error> {
        if self.raw.search(&self.comparator, &key).is_some() {
            tracing::debug!(len = self.raw.len(), "rejected add of an existing key");
            return Err(Error::DuplicateKey);
        }
        self.raw.insert(&self.comparator, key, value);
        Ok(())
    }

    /// Adds an entry, or overwrites the value of the entry with an equal key.
    ///
    /// Returns the previous value if the key was present. The stored key is kept and only the
    /// value is replaced. Like any insertion, the descent may split 4-nodes on its way down.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.add_or_update(37, "a"), None);
    /// assert_eq!(map.add_or_update(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn add_or_update(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(&self.comparator, key, value)
    }

    /// Removes a key from the map. Returns whether the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.add(1, "a").unwrap();
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map, returning the stored key and value if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.add(1, "a").unwrap();
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove(&self.comparator, &Target::Key(key))
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.remove(&self.comparator, &Target::First)
    }

    /// Removes and returns the entry with the greatest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.remove(&self.comparator, &Target::Last)
    }

    /// Returns `true` if the map contains an entry for the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert!(map.contains(&1));
    /// assert!(!map.contains(&2));
    /// ```
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.raw.search(&self.comparator, key).is_some()
    }

    /// Returns the node holding the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// let node = map.find_node(&2).unwrap();
    /// assert_eq!(node.key_value(), (&2, &"b"));
    /// assert!(map.find_node(&3).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn find_node(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        self.raw
            .search(&self.comparator, key)
            .map(|handle| NodeRef::new(&self.raw, handle))
    }

    /// Returns some node whose key lies inside `range`, or `None` if the range holds no key.
    ///
    /// The walk moves right while the node is below the start bound and left while it is past the
    /// end bound, and stops at the first node that is neither. That node is not necessarily the
    /// smallest or greatest key in the range; use [`range`](Self::range) to enumerate them.
    /// An `Unbounded` side places no restriction on that side.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = (0..100).step_by(10).map(|k| (k, ())).collect();
    /// let hit = map.find_range(25..=45).unwrap();
    /// assert!([30, 40].contains(hit.key()));
    /// assert!(map.find_range(41..50).is_none());
    /// assert!(map.find_range(..).is_some());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn find_range<R>(&self, range: R) -> Option<NodeRef<'_, K, V>>
    where
        R: RangeBounds<K>,
    {
        self.raw
            .search_range(&self.comparator, &range)
            .map(|handle| NodeRef::new(&self.raw, handle))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and the value corresponding to the key.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.search(&self.comparator, key)?);
        Some((node.key(), node.value()))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{Error, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.try_get(&1), Ok(&"a"));
    /// assert_eq!(map.try_get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn try_get(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.raw.search(&self.comparator, key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Constructs an iterator over the entries whose keys lie inside `range`, in key order.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(3, "a"), (5, "b"), (8, "c")]);
    /// let found: Vec<_> = map.range(4..=8).map(|(k, _)| *k).collect();
    /// assert_eq!(found, [5, 8]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to start, then amortized O(1) per entry.
    pub fn range<R>(&self, range: R) -> Range<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        validate_range_bounds(&self.comparator, &range);
        Range::new(&self.raw, &self.comparator, &range)
    }

    /// Checks the structural invariants of the tree.
    ///
    /// Verifies that the root is black, that no red node has a red child, that every path from
    /// the root to an empty link crosses the same number of black nodes, that keys are in
    /// strictly increasing comparator order, and that [`len`](Self::len) matches the number of
    /// reachable nodes.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map: RBTreeMap<u32, u32> = (0..1000).map(|k| (k, k)).collect();
    /// assert_eq!(map.validate(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<(), Violation> {
        self.raw.validate(&self.comparator).inspect_err(|violation| {
            tracing::debug!(%violation, "red-black tree failed validation");
        })
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        RBTreeMap {
            raw: self.raw.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for RBTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        RBTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        RBTreeMap::from_iter_with_comparator(iter, C::default())
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.add_or_update(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for RBTreeMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

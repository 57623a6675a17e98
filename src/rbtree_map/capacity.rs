use super::RBTreeMap;
use crate::compare::Natural;
use crate::raw::RawRBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before node storage
    /// reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`, with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::with_capacity(capacity),
            comparator,
        }
    }

    /// Returns the number of entries the map can hold without reallocating node storage.
    ///
    /// Storage of removed entries is reused, so `capacity` never shrinks.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// map.add(1, 1).unwrap();
    /// map.clear();
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

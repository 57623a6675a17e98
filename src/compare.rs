use core::cmp::Ordering;

/// A total order over keys, supplied to an [`RBTreeMap`] at construction.
///
/// Every key in a map is placed and found through its comparator, so a comparator must be a
/// consistent total order: antisymmetric, transitive, and stable for the lifetime of the map.
/// Breaking that contract is a logic error. The map will not exhibit undefined behavior, but
/// lookups may miss and [`validate`](crate::RBTreeMap::validate) will report order violations.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```
/// use topdown_rbtree::RBTreeMap;
///
/// let mut by_len = RBTreeMap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// by_len.add("three", 3).unwrap();
/// by_len.add("one", 1).unwrap();
/// assert!(by_len.add("two", 2).is_err()); // same length as "one"
/// assert_eq!(by_len.min(), Ok(&"one"));
/// ```
///
/// [`RBTreeMap`]: crate::RBTreeMap
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own [`Ord`] ordering. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
///
/// ```
/// use topdown_rbtree::{Natural, RBTreeMap, Reversed};
///
/// let map = RBTreeMap::from_iter_with_comparator([(1, 'a'), (3, 'c'), (2, 'b')], Reversed(Natural));
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

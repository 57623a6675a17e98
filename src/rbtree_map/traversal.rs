use alloc::collections::VecDeque;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::RangeBounds;

use crate::compare::Comparator;
use crate::raw::{Handle, Path, RawRBTreeMap, above_end};

fn entry<K, V>(raw: &RawRBTreeMap<K, V>, handle: Handle) -> (&K, &V) {
    let node = raw.node(handle);
    (node.key(), node.value())
}

// ─── In-order ──────────────────────────────────────────────────────────────

/// An iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`iter`] and [`in_order`] methods on [`RBTreeMap`]. See their
/// documentation for more.
///
/// [`iter`]: crate::RBTreeMap::iter
/// [`in_order`]: crate::RBTreeMap::in_order
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    front: Path,
    back: Path,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(raw: &'a RawRBTreeMap<K, V>) -> Self {
        let mut front = Path::new();
        let mut back = Path::new();
        raw.push_left_spine(raw.root(), &mut front);
        raw.push_right_spine(raw.root(), &mut back);
        Iter {
            raw,
            front,
            back,
            remaining: raw.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        self.raw.push_left_spine(self.raw.node(handle).right(), &mut self.front);
        self.remaining -= 1;
        Some(entry(self.raw, handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        self.raw.push_right_spine(self.raw.node(handle).left(), &mut self.back);
        self.remaining -= 1;
        Some(entry(self.raw, handle))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of an `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: crate::RBTreeMap::keys
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(super) fn new(inner: Iter<'a, K, V>) -> Self {
        Keys { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the values of an `RBTreeMap`, in order by key.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: crate::RBTreeMap::values
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(super) fn new(inner: Iter<'a, K, V>) -> Self {
        Values { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Range ─────────────────────────────────────────────────────────────────

/// An iterator over a sub-range of entries in an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`range`] method on [`RBTreeMap`].
///
/// [`range`]: crate::RBTreeMap::range
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    path: Path,
    // Greatest node inside the end bound; iteration stops after yielding it.
    last: Option<Handle>,
}

impl<'a, K, V> Range<'a, K, V> {
    pub(super) fn new<C, R>(raw: &'a RawRBTreeMap<K, V>, comparator: &C, range: &R) -> Self
    where
        C: Comparator<K> + ?Sized,
        R: RangeBounds<K> + ?Sized,
    {
        let mut path = Path::new();
        raw.seek(comparator, range.start_bound(), &mut path);

        let mut last = None;
        let mut current = raw.root();
        while let Some(handle) = current {
            let node = raw.node(handle);
            if above_end(comparator, range.end_bound(), node.key()) {
                current = node.left();
            } else {
                last = Some(handle);
                current = node.right();
            }
        }

        let empty = match (path.last(), last) {
            (Some(&first), Some(_)) => above_end(comparator, range.end_bound(), raw.node(first).key()),
            _ => true,
        };
        if empty {
            path.clear();
        }
        Range { raw, path, last }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.path.pop()?;
        if Some(handle) == self.last {
            self.path.clear();
        } else {
            self.raw.push_left_spine(self.raw.node(handle).right(), &mut self.path);
        }
        Some(entry(self.raw, handle))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            raw: self.raw,
            path: self.path.clone(),
            last: self.last,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Pre-order ─────────────────────────────────────────────────────────────

/// A pre-order walk over an `RBTreeMap`: each node before its left subtree, then its right
/// subtree.
///
/// This `struct` is created by the [`pre_order`] method on [`RBTreeMap`].
///
/// [`pre_order`]: crate::RBTreeMap::pre_order
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PreOrder<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    path: Path,
    remaining: usize,
}

impl<'a, K, V> PreOrder<'a, K, V> {
    pub(super) fn new(raw: &'a RawRBTreeMap<K, V>) -> Self {
        let mut path = Path::new();
        path.extend(raw.root());
        PreOrder {
            raw,
            path,
            remaining: raw.len(),
        }
    }
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.path.pop()?;
        let node = self.raw.node(handle);
        // Right goes under left so the left subtree is finished first.
        self.path.extend(node.right());
        self.path.extend(node.left());
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PreOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

impl<K, V> Clone for PreOrder<'_, K, V> {
    fn clone(&self) -> Self {
        PreOrder {
            raw: self.raw,
            path: self.path.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PreOrder<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Post-order ────────────────────────────────────────────────────────────

/// A post-order walk over an `RBTreeMap`: both subtrees of a node, left first, before the node
/// itself. The root comes last.
///
/// This `struct` is created by the [`post_order`] method on [`RBTreeMap`].
///
/// [`post_order`]: crate::RBTreeMap::post_order
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PostOrder<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    path: Path,
    remaining: usize,
}

impl<'a, K, V> PostOrder<'a, K, V> {
    pub(super) fn new(raw: &'a RawRBTreeMap<K, V>) -> Self {
        let mut iter = PostOrder {
            raw,
            path: Path::new(),
            remaining: raw.len(),
        };
        iter.descend(raw.root());
        iter
    }

    // Pushes the path to the first node in post-order under `link`: left when possible, otherwise
    // right, until a leaf.
    fn descend(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            self.path.push(handle);
            let node = self.raw.node(handle);
            link = node.left().or(node.right());
        }
    }
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.path.pop()?;
        if let Some(&parent) = self.path.last() {
            let parent = self.raw.node(parent);
            if parent.left() == Some(handle) {
                self.descend(parent.right());
            }
        }
        self.remaining -= 1;
        Some(entry(self.raw, handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PostOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}

impl<K, V> Clone for PostOrder<'_, K, V> {
    fn clone(&self) -> Self {
        PostOrder {
            raw: self.raw,
            path: self.path.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PostOrder<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Level-order ───────────────────────────────────────────────────────────

/// A breadth-first walk over an `RBTreeMap`: the root, then every node at depth one from left to
/// right, then depth two, and so on.
///
/// This `struct` is created by the [`level_order`] method on [`RBTreeMap`].
///
/// [`level_order`]: crate::RBTreeMap::level_order
/// [`RBTreeMap`]: crate::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct LevelOrder<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    queue: VecDeque<Handle>,
    remaining: usize,
}

impl<'a, K, V> LevelOrder<'a, K, V> {
    pub(super) fn new(raw: &'a RawRBTreeMap<K, V>) -> Self {
        LevelOrder {
            raw,
            queue: raw.root().into_iter().collect(),
            remaining: raw.len(),
        }
    }
}

impl<'a, K, V> Iterator for LevelOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.queue.pop_front()?;
        let node = self.raw.node(handle);
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for LevelOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for LevelOrder<'_, K, V> {}

impl<K, V> Clone for LevelOrder<'_, K, V> {
    fn clone(&self) -> Self {
        LevelOrder {
            raw: self.raw,
            queue: self.queue.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LevelOrder<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

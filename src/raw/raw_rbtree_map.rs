use core::cmp::Ordering;
use core::ops::{Bound, RangeBounds};

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};
use crate::compare::Comparator;
use crate::error::Violation;

/// Stack of handles used by iterators and checks. A red-black tree over `Handle::MAX` nodes is
/// at most 64 levels deep, so this always stays inline.
pub(crate) type Path = SmallVec<[Handle; 64]>;

/// The core red-black tree backing `RBTreeMap`.
///
/// The comparator is owned by the map and passed into every ordered operation, so the same raw
/// tree serves any comparator type.
#[derive(Clone)]
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

/// The restructuring applied to a parent while eliminating a 2-node on the way down.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Rotation {
    Left,
    Right,
    RightLeft,
    LeftRight,
}

/// What a deletion walk is looking for.
pub(crate) enum Target<'a, K> {
    Key(&'a K),
    First,
    Last,
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Discards every node at once; no rebalancing takes place.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn left(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).left()
    }

    #[inline]
    fn right(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).right()
    }

    #[inline]
    fn paint(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).set_color(color);
    }

    /// Pushes `link` and every left descendant of it.
    pub(crate) fn push_left_spine(&self, mut link: Option<Handle>, path: &mut Path) {
        while let Some(handle) = link {
            path.push(handle);
            link = self.left(handle);
        }
    }

    /// Pushes `link` and every right descendant of it.
    pub(crate) fn push_right_spine(&self, mut link: Option<Handle>, path: &mut Path) {
        while let Some(handle) = link {
            path.push(handle);
            link = self.right(handle);
        }
    }

    /// Leftmost node.
    pub(crate) fn first(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(left) = self.left(current) {
            current = left;
        }
        Some(current)
    }

    /// Rightmost node.
    pub(crate) fn last(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(right) = self.right(current) {
            current = right;
        }
        Some(current)
    }

    /// Moves every entry out in ascending order and leaves the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.len);
        let mut path = Path::new();
        self.push_left_spine(self.root, &mut path);

        while let Some(handle) = path.pop() {
            let right = self.right(handle);
            entries.push(self.nodes.take(handle).into_entry());
            self.push_left_spine(right, &mut path);
        }

        self.clear();
        entries
    }

    // ─── Color classification ───────────────────────────────────────────────

    #[inline]
    fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|handle| self.nodes.get(handle).is_red())
    }

    /// A black node with no red child: a lone key in 2-3-4 terms.
    fn is_2node(&self, handle: Handle) -> bool {
        let node = self.nodes.get(handle);
        !node.is_red() && !self.is_red(node.left()) && !self.is_red(node.right())
    }

    /// A node with two red children: three keys in 2-3-4 terms.
    fn is_4node(&self, handle: Handle) -> bool {
        let node = self.nodes.get(handle);
        self.is_red(node.left()) && self.is_red(node.right())
    }

    fn sibling(&self, handle: Handle, parent: Handle) -> Handle {
        let parent = self.nodes.get(parent);
        let sibling = if parent.left() == Some(handle) {
            parent.right()
        } else {
            parent.left()
        };
        sibling.expect("`RawRBTreeMap::sibling()` - a black non-root node must have a sibling!")
    }

    // ─── Rotations ──────────────────────────────────────────────────────────
    //
    // Each rotation rewires the subtree under `top` and returns the handle of its new top. The
    // caller relinks that handle into the old top's parent.

    fn rotate_left(&mut self, top: Handle) -> Handle {
        let pivot = self.right(top).expect("`RawRBTreeMap::rotate_left()` - no right child!");
        let inner = self.left(pivot);
        self.nodes.get_mut(top).set_right(inner);
        self.nodes.get_mut(pivot).set_left(Some(top));
        pivot
    }

    fn rotate_right(&mut self, top: Handle) -> Handle {
        let pivot = self.left(top).expect("`RawRBTreeMap::rotate_right()` - no left child!");
        let inner = self.right(pivot);
        self.nodes.get_mut(top).set_left(inner);
        self.nodes.get_mut(pivot).set_right(Some(top));
        pivot
    }

    fn rotate_left_right(&mut self, top: Handle) -> Handle {
        let child = self.left(top).expect("`RawRBTreeMap::rotate_left_right()` - no left child!");
        let grandchild = self.right(child).expect("`RawRBTreeMap::rotate_left_right()` - no inner grandchild!");

        let (inner_left, inner_right) = (self.left(grandchild), self.right(grandchild));
        self.nodes.get_mut(top).set_left(inner_right);
        self.nodes.get_mut(child).set_right(inner_left);

        let grandchild_node = self.nodes.get_mut(grandchild);
        grandchild_node.set_right(Some(top));
        grandchild_node.set_left(Some(child));
        grandchild
    }

    fn rotate_right_left(&mut self, top: Handle) -> Handle {
        let child = self.right(top).expect("`RawRBTreeMap::rotate_right_left()` - no right child!");
        let grandchild = self.left(child).expect("`RawRBTreeMap::rotate_right_left()` - no inner grandchild!");

        let (inner_left, inner_right) = (self.left(grandchild), self.right(grandchild));
        self.nodes.get_mut(top).set_right(inner_left);
        self.nodes.get_mut(child).set_left(inner_right);

        let grandchild_node = self.nodes.get_mut(grandchild);
        grandchild_node.set_left(Some(top));
        grandchild_node.set_right(Some(child));
        grandchild
    }

    /// Points whichever link held `child` (in `parent`, or the root) at `replacement`.
    fn replace_child_or_root(&mut self, parent: Option<Handle>, child: Handle, replacement: Option<Handle>) {
        match parent {
            Some(parent) => {
                let parent = self.nodes.get_mut(parent);
                if parent.left() == Some(child) {
                    parent.set_left(replacement);
                } else {
                    parent.set_right(replacement);
                }
            }
            None => self.root = replacement,
        }
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Recolors a 4-node into two 2-nodes, pushing its middle key up into the parent.
    fn split_4node(&mut self, handle: Handle) {
        let (left, right) = {
            let node = self.nodes.get(handle);
            (node.left(), node.right())
        };
        self.paint(handle, Color::Red);
        for child in [left, right].into_iter().flatten() {
            self.paint(child, Color::Black);
        }
    }

    /// Repairs a red `current` under a red `parent` with a single or double rotation at the
    /// grandparent. Returns the handle that is now `current`'s parent.
    fn insertion_balance(
        &mut self,
        current: Handle,
        parent: Handle,
        grand_parent: Handle,
        great_grand_parent: Option<Handle>,
    ) -> Option<Handle> {
        let parent_is_on_right = self.right(grand_parent) == Some(parent);
        let current_is_on_right = self.right(parent) == Some(current);

        let (new_top, new_parent) = if parent_is_on_right == current_is_on_right {
            let top = if current_is_on_right {
                self.rotate_left(grand_parent)
            } else {
                self.rotate_right(grand_parent)
            };
            (top, Some(parent))
        } else {
            // `current` itself rises to the top and hangs from the great-grandparent.
            let top = if current_is_on_right {
                self.rotate_left_right(grand_parent)
            } else {
                self.rotate_right_left(grand_parent)
            };
            (top, great_grand_parent)
        };

        self.paint(grand_parent, Color::Red);
        self.paint(new_top, Color::Black);
        self.replace_child_or_root(great_grand_parent, grand_parent, Some(new_top));

        new_parent
    }

    /// Inserts a key-value pair in a single top-down pass.
    ///
    /// Returns the old value if the comparator reports the key as present; in that case only the
    /// value is replaced.
    pub(crate) fn insert<C>(&mut self, comparator: &C, key: K, value: V) -> Option<V>
    where
        C: Comparator<K> + ?Sized,
    {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(Node::new(key, value));
            self.paint(handle, Color::Black);
            self.root = Some(handle);
            self.len = 1;
            return None;
        };

        let mut current = Some(root);
        let mut parent: Option<Handle> = None;
        let mut grand_parent: Option<Handle> = None;
        let mut great_grand_parent: Option<Handle> = None;
        let mut order = Ordering::Equal;

        while let Some(handle) = current {
            order = comparator.compare(&key, self.nodes.get(handle).key());
            if order == Ordering::Equal {
                self.paint_root_black();
                return Some(core::mem::replace(self.nodes.get_mut(handle).value_mut(), value));
            }

            if self.is_4node(handle) {
                self.split_4node(handle);
                // The split may have put two reds in a row.
                if let Some(red_parent) = parent.filter(|&p| self.is_red(Some(p))) {
                    let grand = grand_parent.expect("`RawRBTreeMap::insert()` - a red node cannot be the root!");
                    parent = self.insertion_balance(handle, red_parent, grand, great_grand_parent);
                }
            }

            great_grand_parent = grand_parent;
            grand_parent = parent;
            parent = Some(handle);
            current = if order == Ordering::Less {
                self.left(handle)
            } else {
                self.right(handle)
            };
        }

        let parent = parent.expect("`RawRBTreeMap::insert()` - descent ended without a parent!");
        let handle = self.nodes.alloc(Node::new(key, value));
        if order == Ordering::Greater {
            self.nodes.get_mut(parent).set_right(Some(handle));
        } else {
            self.nodes.get_mut(parent).set_left(Some(handle));
        }

        if self.is_red(Some(parent)) {
            let grand = grand_parent.expect("`RawRBTreeMap::insert()` - a red node cannot be the root!");
            self.insertion_balance(handle, parent, grand, great_grand_parent);
        }

        self.paint_root_black();
        self.len += 1;
        None
    }

    fn paint_root_black(&mut self) {
        if let Some(root) = self.root {
            self.paint(root, Color::Black);
        }
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Makes both children of `parent` red and `parent` black: three 2-nodes fuse into a 4-node.
    fn merge_2nodes(&mut self, parent: Handle, child: Handle, sibling: Handle) {
        self.paint(parent, Color::Black);
        self.paint(child, Color::Red);
        self.paint(sibling, Color::Red);
    }

    /// Chooses the rotation that moves a red key from a 3- or 4-node `sibling` over to `current`.
    fn rotation_needed(&self, parent: Handle, current: Handle, sibling: Handle) -> Rotation {
        let current_is_left = self.left(parent) == Some(current);
        if self.is_red(self.left(sibling)) {
            if current_is_left {
                Rotation::RightLeft
            } else {
                Rotation::Right
            }
        } else if current_is_left {
            Rotation::Left
        } else {
            Rotation::LeftRight
        }
    }

    fn probe<C>(&self, comparator: &C, target: &Target<'_, K>, handle: Handle) -> Ordering
    where
        C: Comparator<K> + ?Sized,
    {
        let node = self.nodes.get(handle);
        match target {
            Target::Key(key) => comparator.compare(*key, node.key()),
            Target::First if node.left().is_none() => Ordering::Equal,
            Target::First => Ordering::Less,
            Target::Last if node.right().is_none() => Ordering::Equal,
            Target::Last => Ordering::Greater,
        }
    }

    /// Removes the entry matching `target` in a single top-down pass.
    ///
    /// Every 2-node on the search path is widened before the walk enters it, so the node finally
    /// unlinked is never a lone black key and no fix-up pass is needed afterwards.
    pub(crate) fn remove<C>(&mut self, comparator: &C, target: &Target<'_, K>) -> Option<(K, V)>
    where
        C: Comparator<K> + ?Sized,
    {
        let root = self.root?;

        let mut current = Some(root);
        let mut parent: Option<Handle> = None;
        let mut grand_parent: Option<Handle> = None;
        let mut matched: Option<Handle> = None;
        let mut parent_of_match: Option<Handle> = None;

        while let Some(handle) = current {
            if self.is_2node(handle) {
                match parent {
                    None => {
                        tracing::trace!("red-black deletion: widening a 2-node root");
                        self.paint(handle, Color::Red);
                    }
                    Some(p) => {
                        let mut sibling = self.sibling(handle, p);
                        if self.is_red(Some(sibling)) {
                            // Turn the red sibling into our grandparent so the real sibling is black.
                            if self.right(p) == Some(sibling) {
                                self.rotate_left(p);
                            } else {
                                self.rotate_right(p);
                            }
                            self.paint(p, Color::Red);
                            self.paint(sibling, Color::Black);
                            self.replace_child_or_root(grand_parent, p, Some(sibling));

                            grand_parent = Some(sibling);
                            if matched == Some(p) {
                                parent_of_match = Some(sibling);
                            }
                            sibling = self.sibling(handle, p);
                        }

                        if self.is_2node(sibling) {
                            self.merge_2nodes(p, handle, sibling);
                        } else {
                            let new_top = match self.rotation_needed(p, handle, sibling) {
                                Rotation::Right => {
                                    let outer = self.left(sibling).expect("`RawRBTreeMap::remove()` - red child vanished!");
                                    self.paint(outer, Color::Black);
                                    self.rotate_right(p)
                                }
                                Rotation::Left => {
                                    let outer = self.right(sibling).expect("`RawRBTreeMap::remove()` - red child vanished!");
                                    self.paint(outer, Color::Black);
                                    self.rotate_left(p)
                                }
                                Rotation::RightLeft => self.rotate_right_left(p),
                                Rotation::LeftRight => self.rotate_left_right(p),
                            };

                            let parent_color = self.nodes.get(p).color();
                            self.paint(new_top, parent_color);
                            self.paint(p, Color::Black);
                            self.paint(handle, Color::Red);
                            self.replace_child_or_root(grand_parent, p, Some(new_top));

                            if matched == Some(p) {
                                parent_of_match = Some(new_top);
                            }
                        }
                    }
                }
            }

            // Once matched, keep walking towards the in-order successor.
            let order = if matched.is_some() {
                Ordering::Less
            } else {
                self.probe(comparator, target, handle)
            };
            if order == Ordering::Equal {
                matched = Some(handle);
                parent_of_match = parent;
            }

            grand_parent = parent;
            parent = Some(handle);
            current = if order == Ordering::Less {
                self.left(handle)
            } else {
                self.right(handle)
            };
        }

        let entry = matched.map(|matched| {
            let successor = parent.expect("`RawRBTreeMap::remove()` - walk ended without visiting a node!");
            self.replace_node(matched, parent_of_match, successor, grand_parent);
            self.len -= 1;
            self.nodes.take(matched).into_entry()
        });

        self.paint_root_black();
        entry
    }

    /// Unlinks `matched` and splices `successor` (the last node of the walk) into its place.
    fn replace_node(
        &mut self,
        matched: Handle,
        parent_of_match: Option<Handle>,
        successor: Handle,
        parent_of_successor: Option<Handle>,
    ) {
        let replacement = if successor == matched {
            // No right subtree: the left child, if any, is a red leaf and moves up.
            self.left(matched)
        } else {
            let successor_right = self.right(successor);
            if let Some(orphan) = successor_right {
                self.paint(orphan, Color::Black);
            }

            if parent_of_successor != Some(matched) {
                let parent_of_successor =
                    parent_of_successor.expect("`RawRBTreeMap::replace_node()` - successor has no parent!");
                self.nodes.get_mut(parent_of_successor).set_left(successor_right);
                let matched_right = self.right(matched);
                self.nodes.get_mut(successor).set_right(matched_right);
            }

            let matched_left = self.left(matched);
            self.nodes.get_mut(successor).set_left(matched_left);
            Some(successor)
        };

        if let Some(replacement) = replacement {
            let color = self.nodes.get(matched).color();
            self.paint(replacement, color);
        }

        self.replace_child_or_root(parent_of_match, matched, replacement);
    }

    // ─── Search ─────────────────────────────────────────────────────────────

    pub(crate) fn search<C>(&self, comparator: &C, key: &K) -> Option<Handle>
    where
        C: Comparator<K> + ?Sized,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            current = match comparator.compare(key, self.nodes.get(handle).key()) {
                Ordering::Less => self.left(handle),
                Ordering::Greater => self.right(handle),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns the first node met on the way down that lies inside `range`.
    pub(crate) fn search_range<C, R>(&self, comparator: &C, range: &R) -> Option<Handle>
    where
        C: Comparator<K> + ?Sized,
        R: RangeBounds<K> + ?Sized,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let key = self.nodes.get(handle).key();
            if below_start(comparator, range.start_bound(), key) {
                current = self.right(handle);
            } else if above_end(comparator, range.end_bound(), key) {
                current = self.left(handle);
            } else {
                return Some(handle);
            }
        }
        None
    }

    /// Builds the in-order stack for the first node not below `start`.
    pub(crate) fn seek<C>(&self, comparator: &C, start: Bound<&K>, path: &mut Path)
    where
        C: Comparator<K> + ?Sized,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            if below_start(comparator, start, self.nodes.get(handle).key()) {
                current = self.right(handle);
            } else {
                path.push(handle);
                current = self.left(handle);
            }
        }
    }

    // ─── Validation ─────────────────────────────────────────────────────────

    /// Checks every red-black invariant, the key order and the entry count.
    pub(crate) fn validate<C>(&self, comparator: &C) -> Result<(), Violation>
    where
        C: Comparator<K> + ?Sized,
    {
        if self.is_red(self.root) {
            return Err(Violation::RedRoot);
        }
        self.black_height(self.root, false, 0)?;

        let mut reachable = 0;
        let mut previous: Option<&K> = None;
        let mut path = Path::new();
        self.push_left_spine(self.root, &mut path);
        while let Some(handle) = path.pop() {
            let node = self.nodes.get(handle);
            if let Some(previous) = previous {
                if comparator.compare(previous, node.key()) != Ordering::Less {
                    return Err(Violation::OrderViolation { position: reachable });
                }
            }
            previous = Some(node.key());
            reachable += 1;
            self.push_left_spine(node.right(), &mut path);
        }

        if reachable != self.len || reachable != self.nodes.len() {
            return Err(Violation::LengthMismatch {
                recorded: self.len,
                reachable,
            });
        }
        Ok(())
    }

    fn black_height(&self, link: Option<Handle>, parent_is_red: bool, depth: usize) -> Result<usize, Violation> {
        let Some(handle) = link else {
            return Ok(0);
        };

        let node = self.nodes.get(handle);
        if parent_is_red && node.is_red() {
            return Err(Violation::RedRedLink { depth });
        }

        let left = self.black_height(node.left(), node.is_red(), depth + 1)?;
        let right = self.black_height(node.right(), node.is_red(), depth + 1)?;
        if left != right {
            return Err(Violation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(!node.is_red()))
    }
}

/// Returns true if `key` lies before the start bound.
pub(crate) fn below_start<K, C>(comparator: &C, start: Bound<&K>, key: &K) -> bool
where
    C: Comparator<K> + ?Sized,
{
    match start {
        Bound::Included(start) => comparator.compare(key, start) == Ordering::Less,
        Bound::Excluded(start) => comparator.compare(key, start) != Ordering::Greater,
        Bound::Unbounded => false,
    }
}

/// Returns true if `key` lies past the end bound.
pub(crate) fn above_end<K, C>(comparator: &C, end: Bound<&K>, key: &K) -> bool
where
    C: Comparator<K> + ?Sized,
{
    match end {
        Bound::Included(end) => comparator.compare(key, end) == Ordering::Greater,
        Bound::Excluded(end) => comparator.compare(key, end) != Ordering::Less,
        Bound::Unbounded => false,
    }
}

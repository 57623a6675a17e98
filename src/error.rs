use thiserror::Error;

/// Errors reported by [`RBTreeMap`](crate::RBTreeMap) operations.
///
/// Every failing operation leaves the map exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// [`add`](crate::RBTreeMap::add) was given a key that is already present.
    #[error("an entry with the same key already exists")]
    DuplicateKey,
    /// A lookup that must succeed, such as [`try_get`](crate::RBTreeMap::try_get), found no entry.
    #[error("no entry found for key")]
    KeyNotFound,
    /// The operation needs at least one entry, such as [`min`](crate::RBTreeMap::min).
    #[error("the map is empty")]
    EmptyCollection,
}

/// A broken structural invariant, reported by [`RBTreeMap::validate`](crate::RBTreeMap::validate).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Violation {
    /// The root node is red.
    #[error("root node is red")]
    RedRoot,
    /// A red node has a red child. `depth` is the depth of the child (root = 0).
    #[error("red node with a red child at depth {depth}")]
    RedRedLink { depth: usize },
    /// Two sibling subtrees have a different number of black nodes on their paths.
    #[error("unbalanced blacks, left: {left} and right: {right}")]
    BlackHeightMismatch { left: usize, right: usize },
    /// In-order traversal met a key that does not compare greater than its predecessor.
    #[error("key at in-order position {position} is not greater than its predecessor")]
    OrderViolation { position: usize },
    /// The recorded entry count differs from the number of reachable nodes.
    #[error("map records {recorded} entries but {reachable} are reachable")]
    LengthMismatch { recorded: usize, reachable: usize },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(Error::DuplicateKey.to_string(), "an entry with the same key already exists");
        assert_eq!(Error::EmptyCollection.to_string(), "the map is empty");
        assert_eq!(
            Violation::BlackHeightMismatch { left: 2, right: 3 }.to_string(),
            "unbalanced blacks, left: 2 and right: 3"
        );
        assert_eq!(
            Violation::LengthMismatch {
                recorded: 4,
                reachable: 3
            }
            .to_string(),
            "map records 4 entries but 3 are reachable"
        );
    }
}

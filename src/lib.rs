//! A top-down red-black tree map for Rust.
//!
//! This crate provides [`RBTreeMap`], an ordered key-value map kept balanced as a red-black tree.
//! Insertion and removal both rebalance in a single pass from the root toward the target:
//!
//! - [`add`](RBTreeMap::add) splits every 4-node (a black node with two red children) on the way
//!   down, so the new red leaf can always be attached with at most one rotation.
//! - [`remove`](RBTreeMap::remove) turns every 2-node on the path into a 3- or 4-node before
//!   stepping into it, so the node finally unlinked is never the last black node of its path.
//!
//! Keys are ordered by a [`Comparator`] supplied at construction, by default the key type's own
//! [`Ord`] ordering.
//!
//! # Example
//!
//! ```
//! use topdown_rbtree::{Color, Error, RBTreeMap};
//!
//! let mut ages = RBTreeMap::new();
//! ages.add("Carol", 41).unwrap();
//! ages.add("Alice", 29).unwrap();
//! ages.add("Bob", 35).unwrap();
//!
//! // Keys are unique.
//! assert_eq!(ages.add("Bob", 36), Err(Error::DuplicateKey));
//! assert_eq!(ages.add_or_update("Bob", 36), Some(35));
//!
//! // Entries come back in key order.
//! let names: Vec<_> = ages.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // The tree itself can be inspected.
//! let root = ages.root().unwrap();
//! assert_eq!((*root.key(), root.color()), ("Bob", Color::Black));
//! assert_eq!(ages.validate(), Ok(()));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Custom ordering** - Any [`Comparator`], including plain closures
//! - **Four traversals** - In-order, pre-order, post-order and level-order walks
//! - **Self-checking** - [`RBTreeMap::validate`] verifies every red-black invariant
//!
//! # Implementation
//!
//! Nodes live in a contiguous arena and link to their children by index; there are no parent
//! links. Walks keep their own explicit stack (or queue, for level-order), so no traversal
//! recurses.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod raw;

pub mod rbtree_map;

pub use compare::{Comparator, Natural, Reversed};
pub use error::{Error, Violation};
pub use raw::Color;
pub use rbtree_map::{NodeRef, RBTreeMap};

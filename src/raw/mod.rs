mod arena;
mod handle;
mod node;
mod raw_rbtree_map;

pub(crate) use handle::Handle;
pub use node::Color;
pub(crate) use raw_rbtree_map::{Path, RawRBTreeMap, Target, above_end};

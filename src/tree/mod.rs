#![forbid(unsafe_code)]

//! The hierarchical change-tree engine.
//!
//! Turns a flat batch of changed paths into a collapsible directory tree:
//! build, sort (directories first), compress single-child directory
//! chains, flatten to the cursor-addressable row sequence the UI renders,
//! and navigate it (cursor/scroll/collapse/filter/search) via
//! [`TreeView`]. The engine does no I/O and never fails; both the
//! working-tree status pane and the commit-files modal are instances of
//! it with different leaf payloads.

pub mod build;
pub mod nav;
pub mod node;

pub use build::{build, compress, flatten, sort};
pub use nav::TreeView;
pub use node::{CollapseMap, FlatNode, PathRecord, TreeNode, leaf_name};

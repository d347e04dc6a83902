//! Snapshot element model and lookup
//!
//! This module provides the data structures a UI snapshot is made of and the
//! synchronous lookups performed on them:
//! - Element: one node payload (id, rectangle, content, type)
//! - ElementTreeNode: the owned element tree of a snapshot
//! - ElementIndex: id/alias lookup and flat list, plus synthetic insertion
//! - element_at_position: point-in-rectangle resolution

pub mod element;
pub mod element_map;
pub mod locate;
pub mod tree;

pub use element::{Element, NodeType, Point, Rect, Size};
pub use element_map::ElementIndex;
pub use locate::element_at_position;
pub use tree::ElementTreeNode;

//! settle-dom - Minimal element tree
//!
//! Arena-based element tree with class lists, a document wrapper that
//! models the parse lifecycle, and a mutation journal that downstream
//! watchers drain through the [`ChangeFeed`] trait. Small enough to stand
//! in for a live document in tests.

mod changes;
mod document;
mod node;
mod query;
mod tree;

pub use changes::{ChangeFeed, ChangeKind, ChangeRecord};
pub use document::{Document, ReadyState};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{DomError, DomResult, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this id refers to an actual node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }
}

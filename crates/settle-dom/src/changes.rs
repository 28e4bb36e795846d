//! Change feed
//!
//! Structural and attribute mutations are journaled by the tree and
//! drained by whoever observes the document. Delivery is pull-based:
//! everything runs on one thread and the consumer polls between its own
//! mutations.

use crate::NodeId;

/// Kind of change a journal entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A child was inserted into or removed from the target
    ChildListChanged,
    /// An attribute (including class) of the target changed
    AttributeChanged,
    /// The document finished initial parsing
    ContentLoaded,
}

/// One journaled mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    /// The element the change happened on (parent for child-list changes)
    pub target: NodeId,
}

impl ChangeRecord {
    pub fn child_list_changed(target: NodeId) -> Self {
        Self {
            kind: ChangeKind::ChildListChanged,
            target,
        }
    }

    pub fn attribute_changed(target: NodeId) -> Self {
        Self {
            kind: ChangeKind::AttributeChanged,
            target,
        }
    }

    pub fn content_loaded(target: NodeId) -> Self {
        Self {
            kind: ChangeKind::ContentLoaded,
            target,
        }
    }
}

/// Source of change notifications
pub trait ChangeFeed {
    /// Drain all changes journaled since the last poll
    fn poll_changes(&mut self) -> Vec<ChangeRecord>;

    /// Check for undrained changes without consuming them
    fn has_pending_changes(&self) -> bool;
}

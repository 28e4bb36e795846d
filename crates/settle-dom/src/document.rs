//! Document - High-level document API
//!
//! Owns the tree, caches the body element, and models the parse
//! lifecycle: a watcher attached while the document is still `Loading`
//! waits for the journaled content-loaded change before its first scan.

use crate::{ChangeFeed, ChangeRecord, DomResult, DomTree, NodeId};

/// Parse lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Still receiving markup
    Loading,
    /// Initial parse finished, content may still stream in
    #[default]
    Interactive,
    /// All subresources settled
    Complete,
}

impl ReadyState {
    /// Can scripts walk the full tree yet?
    #[inline]
    pub fn is_interactive(&self) -> bool {
        !matches!(self, ReadyState::Loading)
    }
}

/// A document: tree plus lifecycle state
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    body: NodeId,
    ready_state: ReadyState,
}

impl Document {
    /// Create an interactive document with an empty body
    pub fn new() -> Self {
        Self::with_state(ReadyState::Interactive)
    }

    /// Create a document that is still parsing
    pub fn loading() -> Self {
        Self::with_state(ReadyState::Loading)
    }

    fn with_state(ready_state: ReadyState) -> Self {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let root = tree.root();
        // Infallible: root exists and body is detached
        let _ = tree.append_child(root, body);
        // The skeleton is not an observable mutation
        let _ = tree.poll_changes();
        Self {
            tree,
            body,
            ready_state,
        }
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Current lifecycle state
    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Mark initial parsing as finished (Loading -> Interactive, one-way)
    pub fn finish_parsing(&mut self) {
        if self.ready_state != ReadyState::Loading {
            return;
        }
        self.ready_state = ReadyState::Interactive;
        let root = self.tree.root();
        self.tree.record(ChangeRecord::content_loaded(root));
        tracing::debug!("document finished parsing");
    }

    /// Convenience: create an element and append it under `parent`
    pub fn insert_element(&mut self, parent: NodeId, tag: &str) -> DomResult<NodeId> {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)
    }

    /// Access the tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for Document {
    fn poll_changes(&mut self) -> Vec<ChangeRecord> {
        self.tree.poll_changes()
    }

    fn has_pending_changes(&self) -> bool {
        self.tree.has_pending_changes()
    }
}

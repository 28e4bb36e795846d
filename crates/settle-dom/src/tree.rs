//! Tree (arena-based allocation)
//!
//! Nodes live in a flat `Vec`; structural edits rewrite sibling links.
//! Every mutation appends to a journal that observers drain through
//! [`ChangeFeed`].

use crate::{ChangeFeed, ChangeRecord, Node, NodeId};

/// Result type for tree operations
pub type DomResult<T> = Result<T, DomError>;

/// Tree operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,

    #[error("operation would create a cycle")]
    HierarchyRequest,

    #[error("node is not a child of the given parent")]
    NotAChild,

    #[error("node is not an element")]
    NotAnElement,
}

/// Arena-based element tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    journal: Vec<ChangeRecord>,
}

impl DomTree {
    /// Create a new tree containing only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            journal: Vec::new(),
        }
    }

    /// Document root id
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds only the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Allocate a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        self.get(parent).ok_or(DomError::NotFound)?;
        if self.get(child).ok_or(DomError::NotFound)?.parent.is_valid() {
            // Re-parenting goes through remove_child first
            return Err(DomError::HierarchyRequest);
        }

        let prev_last = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);
        {
            let node = self.get_mut(child).ok_or(DomError::NotFound)?;
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }
        if prev_last.is_valid() {
            if let Some(prev) = self.get_mut(prev_last) {
                prev.next_sibling = child;
            }
        }
        {
            let p = self.get_mut(parent).ok_or(DomError::NotFound)?;
            if !p.first_child.is_valid() {
                p.first_child = child;
            }
            p.last_child = child;
        }

        tracing::trace!("appended node {:?} under {:?}", child, parent);
        self.record(ChangeRecord::child_list_changed(parent));
        Ok(child)
    }

    /// Detach `child` from `parent`. The node stays in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let (prev, next) = {
            let node = self.get(child).ok_or(DomError::NotFound)?;
            if node.parent != parent {
                return Err(DomError::NotAChild);
            }
            (node.prev_sibling, node.next_sibling)
        };

        if prev.is_valid() {
            if let Some(n) = self.get_mut(prev) {
                n.next_sibling = next;
            }
        }
        if next.is_valid() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        }
        {
            let p = self.get_mut(parent).ok_or(DomError::NotFound)?;
            if p.first_child == child {
                p.first_child = next;
            }
            if p.last_child == child {
                p.last_child = prev;
            }
        }
        {
            let node = self.get_mut(child).ok_or(DomError::NotFound)?;
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }

        tracing::trace!("removed node {:?} from {:?}", child, parent);
        self.record(ChangeRecord::child_list_changed(parent));
        Ok(child)
    }

    /// Add a class to an element, journaling only if it was absent
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let elem = self
            .get_mut(id)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        let added = elem.add_class(class);
        if added {
            self.record(ChangeRecord::attribute_changed(id));
        }
        Ok(added)
    }

    /// Remove a class from an element
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let elem = self
            .get_mut(id)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        let removed = elem.remove_class(class);
        if removed {
            self.record(ChangeRecord::attribute_changed(id));
        }
        Ok(removed)
    }

    /// Set a non-class attribute on an element
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .get_mut(id)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        elem.set_attr(name, value.to_string());
        self.record(ChangeRecord::attribute_changed(id));
        Ok(())
    }

    /// Iterate direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next: first }
    }

    /// Iterate all descendants of `id` depth-first (excluding `id` itself)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        let mut child = self.get(id).map(|n| n.last_child).unwrap_or(NodeId::NONE);
        while child.is_valid() {
            stack.push(child);
            child = self.get(child).map(|n| n.prev_sibling).unwrap_or(NodeId::NONE);
        }
        Descendants { tree: self, stack }
    }

    fn is_ancestor_of(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cur = self.get(node).map(|n| n.parent).unwrap_or(NodeId::NONE);
        while cur.is_valid() {
            if cur == candidate {
                return true;
            }
            cur = self.get(cur).map(|n| n.parent).unwrap_or(NodeId::NONE);
        }
        false
    }

    /// Check whether `id` is the root or still attached under the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root() || self.is_ancestor_of(self.root(), id)
    }

    pub(crate) fn record(&mut self, change: ChangeRecord) {
        self.journal.push(change);
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for DomTree {
    fn poll_changes(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.journal)
    }

    fn has_pending_changes(&self) -> bool {
        !self.journal.is_empty()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Depth-first iterator over descendants
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        // Push children right-to-left so the leftmost comes out first
        let mut child = node.last_child;
        while child.is_valid() {
            self.stack.push(child);
            child = self.tree.get(child).map(|n| n.prev_sibling).unwrap_or(NodeId::NONE);
        }
        Some((id, node))
    }
}

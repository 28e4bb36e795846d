//! Element queries
//!
//! Class and tag lookups over a subtree, in document order. The
//! exclusion class makes `.pending:not(.ready)` a single call.

use crate::{DomTree, NodeId};

impl DomTree {
    /// Elements under `root` (inclusive) carrying `class` and, if given,
    /// not carrying `exclude`
    pub fn elements_with_class(
        &self,
        root: NodeId,
        class: &str,
        exclude: Option<&str>,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.element_matches(root, class, exclude) {
            out.push(root);
        }
        for (id, node) in self.descendants(root) {
            if let Some(elem) = node.as_element() {
                if elem.has_class(class) && !exclude.is_some_and(|e| elem.has_class(e)) {
                    out.push(id);
                }
            }
        }
        out
    }

    fn element_matches(&self, id: NodeId, class: &str, exclude: Option<&str>) -> bool {
        self.get(id)
            .and_then(|n| n.as_element())
            .map(|e| e.has_class(class) && !exclude.is_some_and(|x| e.has_class(x)))
            .unwrap_or(false)
    }

    /// Does any descendant element of `id` have the given tag?
    pub fn has_child_with_tag(&self, id: NodeId, tag: &str) -> bool {
        self.descendants(id)
            .filter_map(|(_, node)| node.as_element())
            .any(|elem| elem.tag.eq_ignore_ascii_case(tag))
    }
}

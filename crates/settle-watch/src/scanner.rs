//! Readiness scanner
//!
//! One pass over a subtree: every placeholder still pending that now
//! contains rendered content gets the ready class. Repeated scans with
//! no new content are no-ops; nothing here can fail.

use settle_dom::{Document, NodeId};

use crate::WatchConfig;

/// Outcome of one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanReport {
    /// Placeholders promoted to ready during this scan
    pub promoted: usize,
    /// Placeholders still pending after this scan
    pub pending_remaining: usize,
}

impl ScanReport {
    /// No pending placeholders left under the scanned root
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.pending_remaining == 0
    }
}

/// Scans a subtree and promotes resolved placeholders
#[derive(Debug)]
pub struct ReadinessScanner<'a> {
    config: &'a WatchConfig,
}

impl<'a> ReadinessScanner<'a> {
    pub fn new(config: &'a WatchConfig) -> Self {
        Self { config }
    }

    /// Promote every pending placeholder under `root` whose rendered
    /// content has arrived
    pub fn scan(&self, doc: &mut Document, root: NodeId) -> ScanReport {
        let pending = doc.tree().elements_with_class(
            root,
            &self.config.pending_class,
            Some(&self.config.ready_class),
        );

        let mut report = ScanReport::default();
        for id in pending {
            if doc.tree().has_child_with_tag(id, &self.config.content_tag) {
                // Cannot fail: the query only yields live elements
                let _ = doc.tree_mut().add_class(id, &self.config.ready_class);
                report.promoted += 1;
            } else {
                report.pending_remaining += 1;
            }
        }

        if report.promoted > 0 {
            tracing::debug!(
                "promoted {} placeholders, {} still pending",
                report.promoted,
                report.pending_remaining
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_placeholders(count: usize) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let mut ids = Vec::new();
        for _ in 0..count {
            let id = doc.insert_element(body, "pre").unwrap();
            doc.tree_mut().add_class(id, "mermaid").unwrap();
            ids.push(id);
        }
        (doc, ids)
    }

    fn render_into(doc: &mut Document, placeholder: NodeId) {
        doc.insert_element(placeholder, "svg").unwrap();
    }

    fn is_ready(doc: &Document, id: NodeId) -> bool {
        doc.tree()
            .get(id)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_class("mermaid-ready"))
    }

    #[test]
    fn test_unresolved_placeholder_stays_pending() {
        let (mut doc, ids) = doc_with_placeholders(1);
        let body = doc.body();
        let config = WatchConfig::default();
        let report = ReadinessScanner::new(&config).scan(&mut doc, body);

        assert_eq!(report.promoted, 0);
        assert_eq!(report.pending_remaining, 1);
        assert!(!is_ready(&doc, ids[0]));
    }

    #[test]
    fn test_resolved_placeholder_is_promoted_once() {
        let (mut doc, ids) = doc_with_placeholders(1);
        let body = doc.body();
        render_into(&mut doc, ids[0]);
        let config = WatchConfig::default();
        let scanner = ReadinessScanner::new(&config);

        let report = scanner.scan(&mut doc, body);
        assert_eq!(report.promoted, 1);
        assert!(report.is_settled());
        assert!(is_ready(&doc, ids[0]));

        // Idempotent: already-ready elements are not pending, not re-promoted
        let report = scanner.scan(&mut doc, body);
        assert_eq!(report.promoted, 0);
        assert!(report.is_settled());
        assert!(is_ready(&doc, ids[0]));
    }

    #[test]
    fn test_mixed_resolution() {
        let (mut doc, ids) = doc_with_placeholders(3);
        let body = doc.body();
        render_into(&mut doc, ids[0]);
        render_into(&mut doc, ids[2]);
        let config = WatchConfig::default();

        let report = ReadinessScanner::new(&config).scan(&mut doc, body);
        assert_eq!(report.promoted, 2);
        assert_eq!(report.pending_remaining, 1);
        assert!(!is_ready(&doc, ids[1]));
    }

    #[test]
    fn test_deeply_nested_content_counts() {
        let (mut doc, ids) = doc_with_placeholders(1);
        let body = doc.body();
        let wrapper = doc.insert_element(ids[0], "div").unwrap();
        doc.insert_element(wrapper, "svg").unwrap();
        let config = WatchConfig::default();

        let report = ReadinessScanner::new(&config).scan(&mut doc, body);
        assert_eq!(report.promoted, 1);
    }

    #[test]
    fn test_other_children_do_not_promote() {
        let (mut doc, ids) = doc_with_placeholders(1);
        let body = doc.body();
        // Error text injected instead of a rendered graphic
        let note = doc.tree_mut().create_text("syntax error in graph");
        doc.tree_mut().append_child(ids[0], note).unwrap();
        doc.insert_element(ids[0], "span").unwrap();
        let config = WatchConfig::default();

        let report = ReadinessScanner::new(&config).scan(&mut doc, body);
        assert_eq!(report.promoted, 0);
        assert_eq!(report.pending_remaining, 1);
    }

    #[test]
    fn test_empty_document_is_a_noop() {
        let mut doc = Document::new();
        let body = doc.body();
        let config = WatchConfig::default();
        let report = ReadinessScanner::new(&config).scan(&mut doc, body);
        assert_eq!(report, ScanReport::default());
        assert!(report.is_settled());
    }

    #[test]
    fn test_custom_vocabulary() {
        let config = WatchConfig {
            pending_class: "graph".to_string(),
            ready_class: "graph-done".to_string(),
            content_tag: "canvas".to_string(),
        };
        let mut doc = Document::new();
        let body = doc.body();
        let holder = doc.insert_element(body, "div").unwrap();
        doc.tree_mut().add_class(holder, "graph").unwrap();
        doc.insert_element(holder, "canvas").unwrap();

        let report = ReadinessScanner::new(&config).scan(&mut doc, body);
        assert_eq!(report.promoted, 1);
        let elem = doc.tree().get(holder).unwrap().as_element().unwrap();
        assert!(elem.has_class("graph-done"));
    }
}

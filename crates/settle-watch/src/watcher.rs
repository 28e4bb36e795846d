//! Change observer
//!
//! Watches a document's change feed and re-runs the readiness scanner
//! until every placeholder under the watched root has resolved, then
//! detaches itself. The lifecycle is explicit: `attach` arms or starts
//! the watcher, `pump` delivers pending change notifications, `stop`
//! and `rearm` move it out of and back into service.

use settle_dom::{ChangeFeed, ChangeKind, Document, NodeId};

use crate::{ConfigError, ReadinessScanner, ScanReport, WatchConfig};

/// Watcher lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Attached while the document was still parsing; first scan runs
    /// when the content-loaded change arrives
    Armed,
    /// Scanning on every qualifying change
    Watching,
    /// Detached: every placeholder resolved, or `stop` was called
    Stopped,
}

impl WatcherState {
    /// Will future changes trigger scans?
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self, WatcherState::Stopped)
    }
}

/// Errors attaching a watcher
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("watch root does not exist in this document")]
    UnknownRoot,

    #[error("watch root is detached from the document")]
    DetachedRoot,
}

/// Observes a document until its placeholders settle
#[derive(Debug)]
pub struct ReadyWatcher {
    config: WatchConfig,
    root: NodeId,
    state: WatcherState,
}

impl ReadyWatcher {
    /// Attach to `doc`, watching the subtree under `root`.
    ///
    /// On an interactive document the initial scan runs immediately; if
    /// it already settles everything the watcher starts out `Stopped`
    /// (it never needs a single notification). On a still-loading
    /// document the watcher arms itself and scans first when the
    /// content-loaded change arrives.
    pub fn attach(
        config: WatchConfig,
        doc: &mut Document,
        root: NodeId,
    ) -> Result<Self, WatchError> {
        config.validate()?;
        doc.tree().get(root).ok_or(WatchError::UnknownRoot)?;
        if !doc.tree().is_attached(root) {
            return Err(WatchError::DetachedRoot);
        }

        let mut watcher = Self {
            config,
            root,
            state: WatcherState::Armed,
        };
        if doc.ready_state().is_interactive() {
            watcher.state = WatcherState::Watching;
            let report = watcher.scan_and_settle(doc);
            tracing::debug!("watcher attached, {} pending", report.pending_remaining);
        } else {
            tracing::debug!("watcher armed, document still parsing");
        }
        Ok(watcher)
    }

    /// Attach with the default (mermaid) vocabulary, watching the body
    pub fn attach_default(doc: &mut Document) -> Result<Self, WatchError> {
        let body = doc.body();
        Self::attach(WatchConfig::default(), doc, body)
    }

    /// Current lifecycle state
    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// The subtree being watched
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Marker vocabulary in use
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Deliver pending change notifications.
    ///
    /// Returns the scan report if a scan ran, `None` if the watcher is
    /// stopped or nothing qualifying happened. Once a scan leaves zero
    /// pending placeholders the watcher stops and later calls are
    /// no-ops.
    pub fn pump(&mut self, doc: &mut Document) -> Option<ScanReport> {
        match self.state {
            WatcherState::Stopped => None,
            WatcherState::Armed => {
                let loaded = doc
                    .poll_changes()
                    .iter()
                    .any(|c| c.kind == ChangeKind::ContentLoaded);
                if !loaded {
                    return None;
                }
                self.state = WatcherState::Watching;
                tracing::debug!("document ready, watcher now watching");
                Some(self.scan_and_settle(doc))
            }
            WatcherState::Watching => {
                if doc.poll_changes().is_empty() {
                    return None;
                }
                Some(self.scan_and_settle(doc))
            }
        }
    }

    /// Detach explicitly. Terminal until `rearm`.
    pub fn stop(&mut self) {
        if self.state.is_active() {
            tracing::debug!("watcher stopped");
            self.state = WatcherState::Stopped;
        }
    }

    /// Scan now and go back to watching if anything is still pending.
    ///
    /// Picks up placeholders added after the watcher stopped. On an
    /// active watcher this is just an eager scan.
    pub fn rearm(&mut self, doc: &mut Document) -> ScanReport {
        if self.state == WatcherState::Stopped {
            tracing::debug!("watcher rearmed");
        }
        self.state = WatcherState::Watching;
        self.scan_and_settle(doc)
    }

    fn scan_and_settle(&mut self, doc: &mut Document) -> ScanReport {
        let report = ReadinessScanner::new(&self.config).scan(doc, self.root);
        // Discard the journal entries our own promotions produced so the
        // next pump does not re-trigger on them
        let _ = doc.poll_changes();
        if report.is_settled() {
            tracing::debug!("all placeholders settled, watcher stopping");
            self.state = WatcherState::Stopped;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(doc: &mut Document) -> NodeId {
        let body = doc.body();
        let id = doc.insert_element(body, "pre").unwrap();
        doc.tree_mut().add_class(id, "mermaid").unwrap();
        id
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
    fn test_attach_rejects_bad_inputs() {
        let mut doc = Document::new();
        let orphan = doc.tree_mut().create_element("div");

        assert!(matches!(
            ReadyWatcher::attach(WatchConfig::default(), &mut doc, NodeId::NONE),
            Err(WatchError::UnknownRoot)
        ));
        assert!(matches!(
            ReadyWatcher::attach(WatchConfig::default(), &mut doc, orphan),
            Err(WatchError::DetachedRoot)
        ));

        let bad = WatchConfig {
            ready_class: "mermaid".to_string(),
            ..WatchConfig::default()
        };
        let body = doc.body();
        assert!(matches!(
            ReadyWatcher::attach(bad, &mut doc, body),
            Err(WatchError::InvalidConfig(ConfigError::MarkersCollide))
        ));
    }

    #[test]
    fn test_attach_without_placeholders_stops_immediately() {
        let mut doc = Document::new();
        let watcher = ReadyWatcher::attach_default(&mut doc).unwrap();
        assert_eq!(watcher.state(), WatcherState::Stopped);
    }

    #[test]
    fn test_attach_with_pending_placeholder_watches() {
        let mut doc = Document::new();
        let id = placeholder(&mut doc);
        let mut watcher = ReadyWatcher::attach_default(&mut doc).unwrap();
        assert_eq!(watcher.state(), WatcherState::Watching);
        assert!(!is_ready(&doc, id));

        // No changes, no scan
        assert_eq!(watcher.pump(&mut doc), None);
    }

    #[test]
    fn test_pump_promotes_and_stops() {
        let mut doc = Document::new();
        let id = placeholder(&mut doc);
        let mut watcher = ReadyWatcher::attach_default(&mut doc).unwrap();

        render_into(&mut doc, id);
        let report = watcher.pump(&mut doc).unwrap();
        assert_eq!(report.promoted, 1);
        assert!(report.is_settled());
        assert!(is_ready(&doc, id));
        assert_eq!(watcher.state(), WatcherState::Stopped);

        // Stopped watcher no longer consumes the feed
        render_into(&mut doc, id);
        assert_eq!(watcher.pump(&mut doc), None);
        assert!(doc.has_pending_changes());
    }

    #[test]
    fn test_own_promotions_do_not_retrigger() {
        let mut doc = Document::new();
        let a = placeholder(&mut doc);
        let b = placeholder(&mut doc);
        let mut watcher = ReadyWatcher::attach_default(&mut doc).unwrap();

        render_into(&mut doc, a);
        let report = watcher.pump(&mut doc).unwrap();
        assert_eq!(report.promoted, 1);
        assert_eq!(report.pending_remaining, 1);
        assert_eq!(watcher.state(), WatcherState::Watching);

        // The add_class from the promotion was drained inside pump
        assert_eq!(watcher.pump(&mut doc), None);
        let _ = b;
    }

    #[test]
    fn test_armed_watcher_waits_for_content_loaded() {
        let mut doc = Document::loading();
        let id = placeholder(&mut doc);
        render_into(&mut doc, id);
        let body = doc.body();
        let mut watcher =
            ReadyWatcher::attach(WatchConfig::default(), &mut doc, body).unwrap();
        assert_eq!(watcher.state(), WatcherState::Armed);

        // Structural changes alone do not start it
        assert_eq!(watcher.pump(&mut doc), None);
        assert_eq!(watcher.state(), WatcherState::Armed);
        assert!(!is_ready(&doc, id));

        doc.finish_parsing();
        let report = watcher.pump(&mut doc).unwrap();
        assert_eq!(report.promoted, 1);
        assert_eq!(watcher.state(), WatcherState::Stopped);
    }

    #[test]
    fn test_explicit_stop_and_rearm() {
        let mut doc = Document::new();
        let id = placeholder(&mut doc);
        let mut watcher = ReadyWatcher::attach_default(&mut doc).unwrap();

        watcher.stop();
        assert_eq!(watcher.state(), WatcherState::Stopped);
        render_into(&mut doc, id);
        assert_eq!(watcher.pump(&mut doc), None);
        assert!(!is_ready(&doc, id));

        let report = watcher.rearm(&mut doc);
        assert_eq!(report.promoted, 1);
        assert!(is_ready(&doc, id));
        assert_eq!(watcher.state(), WatcherState::Stopped);
    }

    #[test]
    fn test_rearm_picks_up_late_placeholders() {
        let mut doc = Document::new();
        let mut watcher = ReadyWatcher::attach_default(&mut doc).unwrap();
        assert_eq!(watcher.state(), WatcherState::Stopped);

        // Placeholder injected after the watcher already settled
        let late = placeholder(&mut doc);
        assert_eq!(watcher.pump(&mut doc), None);

        let report = watcher.rearm(&mut doc);
        assert_eq!(report.pending_remaining, 1);
        assert_eq!(watcher.state(), WatcherState::Watching);

        render_into(&mut doc, late);
        let report = watcher.pump(&mut doc).unwrap();
        assert_eq!(report.promoted, 1);
        assert_eq!(watcher.state(), WatcherState::Stopped);
    }
}

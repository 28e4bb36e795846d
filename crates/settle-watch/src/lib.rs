//! settle-watch - Placeholder readiness watcher
//!
//! Diagram libraries inject their rendered output into placeholder
//! elements some time after the page loads, which makes the raw
//! diagram source flash before the graphic replaces it. This crate
//! watches a document for that injected content and promotes each
//! placeholder from its pending class to a ready class, so styling can
//! hide placeholders until they are ready. The promotion is one-way:
//! an element is marked ready exactly once and never unmarked here.
//!
//! ```
//! use settle_dom::Document;
//! use settle_watch::{ReadyWatcher, WatcherState};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let holder = doc.insert_element(body, "pre").unwrap();
//! doc.tree_mut().add_class(holder, "mermaid").unwrap();
//!
//! let mut watcher = ReadyWatcher::attach_default(&mut doc).unwrap();
//! assert_eq!(watcher.state(), WatcherState::Watching);
//!
//! // The diagram library injects its output, the environment pumps
//! doc.insert_element(holder, "svg").unwrap();
//! let report = watcher.pump(&mut doc).unwrap();
//! assert_eq!(report.promoted, 1);
//! assert_eq!(watcher.state(), WatcherState::Stopped);
//! ```

mod config;
mod scanner;
mod watcher;

pub use config::{ConfigError, WatchConfig};
pub use scanner::{ReadinessScanner, ScanReport};
pub use watcher::{ReadyWatcher, WatchError, WatcherState};

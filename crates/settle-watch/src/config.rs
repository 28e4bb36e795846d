//! Marker configuration
//!
//! Which classes mean "pending" and "ready", and which tag counts as
//! rendered content. An element is pending iff it carries the pending
//! class and not the ready class; the ready class is set once and never
//! removed by this crate.

use serde::{Deserialize, Serialize};

/// Marker names the scanner and watcher operate on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Class placed on placeholders by the page author
    pub pending_class: String,
    /// Class this crate adds once rendered content exists
    pub ready_class: String,
    /// Tag of the injected content that proves rendering happened
    pub content_tag: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            pending_class: "mermaid".to_string(),
            ready_class: "mermaid-ready".to_string(),
            content_tag: "svg".to_string(),
        }
    }
}

impl WatchConfig {
    /// Check the marker names are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pending_class", &self.pending_class),
            ("ready_class", &self.ready_class),
            ("content_tag", &self.content_tag),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyMarker { field });
            }
            if value.contains(char::is_whitespace) {
                return Err(ConfigError::MarkerHasWhitespace { field });
            }
        }
        if self.pending_class == self.ready_class {
            return Err(ConfigError::MarkersCollide);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyMarker { field: &'static str },

    #[error("{field} must be a single class/tag name without whitespace")]
    MarkerHasWhitespace { field: &'static str },

    #[error("pending and ready classes must differ")]
    MarkersCollide,
}

//! Editor configuration for markedit
//!
//! This module defines the `EditorOptions` struct that holds the
//! host-configurable knobs of the editing core, with serde support for
//! JSON persistence and value sanitization on load.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Editor Options
// ─────────────────────────────────────────────────────────────────────────────

/// Host-configurable options for an editor instance.
///
/// Unknown fields in persisted JSON are ignored, and out-of-range values
/// are clamped on load so a stale or hand-edited blob never breaks the
/// editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Unique identifier for this editor instance. When set, every
    /// accepted history push is mirrored to the backup store and a
    /// recovery comparison runs at initialization. `None` disables
    /// backups entirely.
    pub id: Option<String>,

    /// Number of spaces inserted/removed per indent step.
    pub tab_size: usize,

    /// Width of the coalescing window for input-driven history pushes,
    /// in milliseconds. Rapid keystrokes inside one window produce a
    /// single history record.
    pub coalesce_ms: u64,
}

impl EditorOptions {
    /// Minimum allowed tab size.
    pub const MIN_TAB_SIZE: usize = 1;
    /// Maximum allowed tab size.
    pub const MAX_TAB_SIZE: usize = 16;
    /// Default tab size.
    pub const DEFAULT_TAB_SIZE: usize = 4;

    /// Default coalescing window in milliseconds.
    pub const DEFAULT_COALESCE_MS: u64 = 300;
    /// Maximum allowed coalescing window in milliseconds.
    pub const MAX_COALESCE_MS: u64 = 5_000;

    /// Create options with an instance id, keeping other defaults.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Clamp all values into their valid ranges.
    pub fn sanitize(&mut self) {
        self.tab_size = self.tab_size.clamp(Self::MIN_TAB_SIZE, Self::MAX_TAB_SIZE);
        self.coalesce_ms = self.coalesce_ms.min(Self::MAX_COALESCE_MS);
        if let Some(id) = &self.id {
            if id.is_empty() {
                self.id = None;
            }
        }
    }

    /// Parse options from JSON, clamping out-of-range values.
    pub fn from_json_sanitized(json: &str) -> serde_json::Result<Self> {
        let mut options: Self = serde_json::from_str(json)?;
        options.sanitize();
        Ok(options)
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            id: None,
            tab_size: Self::DEFAULT_TAB_SIZE,
            coalesce_ms: Self::DEFAULT_COALESCE_MS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EditorOptions::default();
        assert_eq!(options.id, None);
        assert_eq!(options.tab_size, 4);
        assert_eq!(options.coalesce_ms, 300);
    }

    #[test]
    fn test_with_id() {
        let options = EditorOptions::with_id("draft-42");
        assert_eq!(options.id.as_deref(), Some("draft-42"));
        assert_eq!(options.tab_size, EditorOptions::DEFAULT_TAB_SIZE);
    }

    #[test]
    fn test_sanitize_clamps_tab_size() {
        let mut options = EditorOptions {
            tab_size: 100,
            ..EditorOptions::default()
        };
        options.sanitize();
        assert_eq!(options.tab_size, EditorOptions::MAX_TAB_SIZE);

        options.tab_size = 0;
        options.sanitize();
        assert_eq!(options.tab_size, EditorOptions::MIN_TAB_SIZE);
    }

    #[test]
    fn test_sanitize_drops_empty_id() {
        let mut options = EditorOptions {
            id: Some(String::new()),
            ..EditorOptions::default()
        };
        options.sanitize();
        assert_eq!(options.id, None);
    }

    #[test]
    fn test_from_json_sanitized() {
        let options =
            EditorOptions::from_json_sanitized(r#"{"tab_size": 100, "coalesce_ms": 99999}"#)
                .unwrap();
        assert_eq!(options.tab_size, EditorOptions::MAX_TAB_SIZE);
        assert_eq!(options.coalesce_ms, EditorOptions::MAX_COALESCE_MS);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let options =
            EditorOptions::from_json_sanitized(r#"{"id": "a", "future_feature": true}"#).unwrap();
        assert_eq!(options.id.as_deref(), Some("a"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = EditorOptions::from_json_sanitized(r#"{"tab_size": 2}"#).unwrap();
        assert_eq!(options.tab_size, 2);
        assert_eq!(options.coalesce_ms, EditorOptions::DEFAULT_COALESCE_MS);
    }

    #[test]
    fn test_roundtrip() {
        let original = EditorOptions {
            id: Some("note".to_string()),
            tab_size: 2,
            coalesce_ms: 150,
        };
        let json = serde_json::to_string(&original).unwrap();
        let loaded: EditorOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(original, loaded);
    }
}

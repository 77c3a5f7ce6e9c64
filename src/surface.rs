//! External collaborator contracts for markedit
//!
//! The core never renders anything. It talks to a host-supplied text
//! surface for buffer and selection access, and flips a host-supplied
//! hotkey switch during mention capture. `MemorySurface` is a reference
//! implementation used in tests and headless hosts.

use crate::string_utils::clamp_range;

// ─────────────────────────────────────────────────────────────────────────────
// Selection Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Pixel geometry of a selection endpoint, passed through from the host
/// untouched. The core never computes these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub left: f32,
    pub top: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Surface
// ─────────────────────────────────────────────────────────────────────────────

/// The host's text-input surface.
///
/// Implementations own the live buffer and selection; the core reads and
/// writes through this trait only. Implementations should clamp
/// selections they are handed — the core always hands over offsets that
/// are valid for the text it just set, but hosts may mutate text
/// independently.
pub trait TextSurface {
    /// Current full buffer text.
    fn text(&self) -> String;

    /// Replace the full buffer text.
    fn set_text(&mut self, text: &str);

    /// Current selection as ordered (start, end) byte offsets.
    fn selection(&self) -> (usize, usize);

    /// Set the selection.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Pixel geometry of the selection endpoints, if the host can
    /// provide it. Headless surfaces return nothing.
    fn selection_rects(&self) -> Vec<SelectionRect> {
        Vec::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hotkey Switch
// ─────────────────────────────────────────────────────────────────────────────

/// Global enable/disable switch of the host's hotkey dispatcher.
///
/// Used exclusively by the mention lifecycle: dispatch is disabled while
/// a mention is being captured so keystrokes reach the keyword instead
/// of other bindings, and re-enabled on the tick after the mention ends.
pub trait HotkeySwitch {
    /// Enable or disable hotkey dispatch.
    fn set_enabled(&mut self, enabled: bool);

    /// Whether dispatch is currently enabled.
    fn is_enabled(&self) -> bool;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A surface backed by a plain string, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    text: String,
    selection: (usize, usize),
}

impl MemorySurface {
    /// Create an empty surface with a collapsed caret at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface seeded with text, caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: (end, end),
        }
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.selection = clamp_range(&self.text, self.selection.0, self.selection.1);
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = clamp_range(&self.text, start, end);
    }
}

/// A hotkey switch backed by a plain flag, for tests and headless hosts.
#[derive(Debug, Clone)]
pub struct MemoryHotkeySwitch {
    enabled: bool,
}

impl Default for MemoryHotkeySwitch {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MemoryHotkeySwitch {
    /// Create an enabled switch.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HotkeySwitch for MemoryHotkeySwitch {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface_roundtrip() {
        let mut surface = MemorySurface::new();
        surface.set_text("hello");
        surface.set_selection(1, 4);
        assert_eq!(surface.text(), "hello");
        assert_eq!(surface.selection(), (1, 4));
    }

    #[test]
    fn test_with_text_places_caret_at_end() {
        let surface = MemorySurface::with_text("abc");
        assert_eq!(surface.selection(), (3, 3));
    }

    #[test]
    fn test_set_selection_clamps() {
        let mut surface = MemorySurface::with_text("abc");
        surface.set_selection(10, 2);
        assert_eq!(surface.selection(), (2, 3));
    }

    #[test]
    fn test_set_text_reclamps_selection() {
        let mut surface = MemorySurface::with_text("long text here");
        surface.set_selection(5, 12);
        surface.set_text("ab");
        assert_eq!(surface.selection(), (2, 2));
    }

    #[test]
    fn test_selection_rects_default_empty() {
        let surface = MemorySurface::new();
        assert!(surface.selection_rects().is_empty());
    }

    #[test]
    fn test_hotkey_switch() {
        let mut switch = MemoryHotkeySwitch::new();
        assert!(switch.is_enabled());
        switch.set_enabled(false);
        assert!(!switch.is_enabled());
    }
}

//! Mention trigger tracking for markedit
//!
//! A small state machine layered on top of caret queries that tracks an
//! in-progress `@mention`. It owns nothing but its own trigger state; the
//! editor core turns its updates into events and drives the deferred
//! hotkey re-enable.
//!
//! Lifecycle: `IDLE → STARTED → (MATCHING)* → IDLE`. A mention starts
//! only at a word boundary, never nests, and aborts when the caret
//! backspaces past the trigger character.

use crate::string_utils::{floor_char_boundary, safe_slice};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Mention Update
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of feeding one input event to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionUpdate {
    /// Nothing changed.
    None,
    /// A mention just started; hotkey dispatch should be disabled.
    Started {
        /// `(pos0, pos1)` — both sit just past the trigger character.
        range: (usize, usize),
    },
    /// The in-progress keyword changed.
    Matched {
        /// Text between the trigger character and the caret.
        keyword: String,
        range: (usize, usize),
    },
    /// The mention finished or aborted; hotkey dispatch should be
    /// re-enabled on the next cooperative tick, not synchronously.
    Ended { range: (usize, usize) },
}

// ─────────────────────────────────────────────────────────────────────────────
// Mention Engine
// ─────────────────────────────────────────────────────────────────────────────

/// State for an in-progress mention capture.
///
/// `pos0` is fixed when the trigger fires; `pos1` tracks the caret while
/// the user types the keyword.
#[derive(Debug, Clone, Default)]
pub struct MentionEngine {
    started: bool,
    pos0: usize,
    pos1: usize,
}

impl MentionEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mention capture is in progress.
    pub fn is_active(&self) -> bool {
        self.started
    }

    /// Handle the trigger key (the `@`-producing combination).
    ///
    /// Re-triggering while already started ends the current mention
    /// instead of nesting. Otherwise a mention starts only if the caret
    /// sits at a word boundary: buffer start, or right after whitespace.
    pub fn trigger(&mut self, buffer: &str, caret: usize) -> MentionUpdate {
        if self.started {
            return self.end();
        }

        let caret = floor_char_boundary(buffer, caret);
        let at_boundary = caret == 0
            || buffer[..caret]
                .chars()
                .next_back()
                .map(|c| c.is_whitespace())
                .unwrap_or(true);
        if !at_boundary {
            return MentionUpdate::None;
        }

        self.started = true;
        self.pos0 = caret + 1;
        self.pos1 = caret + 1;
        debug!("mention started at {}", self.pos0);
        MentionUpdate::Started {
            range: (self.pos0, self.pos1),
        }
    }

    /// Handle a text-input event while a mention may be in progress.
    ///
    /// Moves `pos1` to the caret. Backspacing past the trigger character
    /// (`pos1 < pos0`) aborts the mention.
    pub fn on_input(&mut self, buffer: &str, caret: usize) -> MentionUpdate {
        if !self.started {
            return MentionUpdate::None;
        }

        self.pos1 = caret;
        if self.pos1 < self.pos0 {
            return self.end();
        }

        MentionUpdate::Matched {
            keyword: safe_slice(buffer, self.pos0, self.pos1).to_string(),
            range: (self.pos0, self.pos1),
        }
    }

    /// End the mention explicitly (Space/Escape/Enter, or host request).
    pub fn end(&mut self) -> MentionUpdate {
        if !self.started {
            return MentionUpdate::None;
        }
        self.started = false;
        debug!("mention ended at ({}, {})", self.pos0, self.pos1);
        MentionUpdate::Ended {
            range: (self.pos0, self.pos1),
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
    fn test_trigger_at_buffer_start_always_starts() {
        let mut engine = MentionEngine::new();
        let update = engine.trigger("", 0);
        assert_eq!(update, MentionUpdate::Started { range: (1, 1) });
        assert!(engine.is_active());
    }

    #[test]
    fn test_trigger_after_whitespace_starts() {
        let mut engine = MentionEngine::new();
        let update = engine.trigger("hello ", 6);
        assert_eq!(update, MentionUpdate::Started { range: (7, 7) });
    }

    #[test]
    fn test_trigger_after_newline_starts() {
        let mut engine = MentionEngine::new();
        assert!(matches!(
            engine.trigger("a\n", 2),
            MentionUpdate::Started { .. }
        ));
    }

    #[test]
    fn test_trigger_after_word_char_does_not_start() {
        let mut engine = MentionEngine::new();
        assert_eq!(engine.trigger("hello", 5), MentionUpdate::None);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_retrigger_ends_instead_of_nesting() {
        let mut engine = MentionEngine::new();
        engine.trigger("", 0);
        let update = engine.trigger("@", 1);
        assert!(matches!(update, MentionUpdate::Ended { .. }));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_match_reports_keyword() {
        let mut engine = MentionEngine::new();
        engine.trigger("", 0);
        // User typed "@al", caret at 3
        let update = engine.on_input("@al", 3);
        assert_eq!(
            update,
            MentionUpdate::Matched {
                keyword: "al".to_string(),
                range: (1, 3),
            }
        );
    }

    #[test]
    fn test_backspace_past_trigger_aborts() {
        let mut engine = MentionEngine::new();
        engine.trigger("abc ", 4); // pos0 = 5
        engine.on_input("abc @x", 6);
        let update = engine.on_input("abc", 3);
        assert_eq!(update, MentionUpdate::Ended { range: (5, 3) });
        // Further input produces nothing until re-triggered
        assert_eq!(engine.on_input("abc", 3), MentionUpdate::None);
    }

    #[test]
    fn test_explicit_end() {
        let mut engine = MentionEngine::new();
        engine.trigger("", 0);
        engine.on_input("@ab", 3);
        assert_eq!(engine.end(), MentionUpdate::Ended { range: (1, 3) });
        assert_eq!(engine.end(), MentionUpdate::None);
    }

    #[test]
    fn test_no_panic_on_any_caret() {
        let buffer = "hei på 你好 🎉";
        for i in 0..=buffer.len() + 3 {
            let mut engine = MentionEngine::new();
            let _ = engine.trigger(buffer, i);
            let _ = engine.on_input(buffer, i);
            let _ = engine.end();
        }
    }

    #[test]
    fn test_input_while_idle_is_ignored() {
        let mut engine = MentionEngine::new();
        assert_eq!(engine.on_input("text", 4), MentionUpdate::None);
    }
}

//! Event emission for markedit
//!
//! The core is composed into a host rather than inheriting from one, so
//! notification is an injected capability: the host hands the editor an
//! `EventSink` closure and receives `EditorEvent`s through it.

use crate::backup::BackupRecord;
use crate::history::HistoryRecord;

// ─────────────────────────────────────────────────────────────────────────────
// Editor Events
// ─────────────────────────────────────────────────────────────────────────────

/// Notifications emitted by the editor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The buffer text changed through an accepted history push. Hosts
    /// should recompute any size/metrics derived from the text.
    Change {
        text: String,
        selection: (usize, usize),
    },
    /// The state was mirrored to the backup store.
    Backup {
        text: String,
        selection: (usize, usize),
    },
    /// At initialization, a persisted non-empty backup differed from the
    /// live buffer. Hosts typically prompt for recovery.
    Different {
        backup: BackupRecord,
        current: HistoryRecord,
    },
    /// A mention capture started.
    MentionStart { range: (usize, usize) },
    /// The in-progress mention keyword changed.
    MentionMatch {
        keyword: String,
        range: (usize, usize),
    },
    /// A mention capture ended or aborted.
    MentionEnd { range: (usize, usize) },
    /// A non-fatal failure, e.g. backup persistence or image resolution.
    Error { message: String },
}

/// The injected notification capability.
pub type EventSink = Box<dyn FnMut(EditorEvent)>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_sink_receives_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let mut sink: EventSink = Box::new(move |event| seen_clone.borrow_mut().push(event));

        sink(EditorEvent::Change {
            text: "a".to_string(),
            selection: (1, 1),
        });
        sink(EditorEvent::MentionEnd { range: (1, 3) });

        assert_eq!(seen.borrow().len(), 2);
        assert!(matches!(seen.borrow()[1], EditorEvent::MentionEnd { range: (1, 3) }));
    }
}

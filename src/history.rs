//! Undo/redo history for markedit
//!
//! The stack stores full `(buffer, selection)` snapshots addressed by a
//! cursor. `back`/`forward` move the cursor one position and saturate at
//! the bounds; a push while the cursor is behind the tail first discards
//! the now-orphaned forward records. Dedup against the active record is
//! the editor's job, not the stack's.

/// A stored `(buffer, selection)` snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// The full buffer text at the time of the snapshot.
    pub value: String,
    /// Selection range (start, end) at the time of the snapshot.
    pub selection: (usize, usize),
}

impl HistoryRecord {
    /// Create a snapshot.
    pub fn new(value: impl Into<String>, selection: (usize, usize)) -> Self {
        Self {
            value: value.into(),
            selection,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// History Stack
// ─────────────────────────────────────────────────────────────────────────────

/// Default maximum number of retained records.
const DEFAULT_MAX_RECORDS: usize = 100;

/// An ordered, cursor-addressable sequence of snapshots.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    records: Vec<HistoryRecord>,
    /// Index of the active record. Meaningless while `records` is empty.
    cursor: usize,
    /// Maximum number of retained records; the oldest is evicted first.
    max_records: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    /// Create an empty stack with the default capacity bound.
    pub fn new() -> Self {
        Self::with_max_records(DEFAULT_MAX_RECORDS)
    }

    /// Create an empty stack retaining at most `max_records` snapshots.
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            max_records: max_records.max(1),
        }
    }

    /// Append a record after the cursor, discarding any forward records.
    pub fn push(&mut self, record: HistoryRecord) {
        if !self.records.is_empty() {
            self.records.truncate(self.cursor + 1);
        }
        self.records.push(record);

        if self.records.len() > self.max_records {
            self.records.remove(0);
        }
        self.cursor = self.records.len() - 1;
    }

    /// The record at the cursor, if any.
    pub fn active(&self) -> Option<&HistoryRecord> {
        self.records.get(self.cursor)
    }

    /// Move the cursor one record back and return the new active record.
    /// Saturates at the oldest record.
    pub fn back(&mut self) -> Option<&HistoryRecord> {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.records.get(self.cursor)
    }

    /// Move the cursor one record forward and return the new active
    /// record. Saturates at the newest record.
    pub fn forward(&mut self) -> Option<&HistoryRecord> {
        if self.cursor + 1 < self.records.len() {
            self.cursor += 1;
        }
        self.records.get(self.cursor)
    }

    /// Check if the cursor can move back.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if the cursor can move forward.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.records.len()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the stack holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: &str) -> HistoryRecord {
        HistoryRecord::new(value, (value.len(), value.len()))
    }

    #[test]
    fn test_empty_stack() {
        let mut stack = HistoryStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.active(), None);
        assert_eq!(stack.back(), None);
        assert_eq!(stack.forward(), None);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_push_sets_active() {
        let mut stack = HistoryStack::new();
        stack.push(rec("a"));
        assert_eq!(stack.active().map(|r| r.value.as_str()), Some("a"));
    }

    #[test]
    fn test_back_then_forward() {
        let mut stack = HistoryStack::new();
        stack.push(rec("a"));
        stack.push(rec("b"));

        assert_eq!(stack.back().map(|r| r.value.as_str()), Some("a"));
        assert_eq!(stack.forward().map(|r| r.value.as_str()), Some("b"));
    }

    #[test]
    fn test_back_saturates_at_oldest() {
        let mut stack = HistoryStack::new();
        stack.push(rec("a"));
        stack.push(rec("b"));
        stack.back();
        // Already at the oldest record; stays there
        assert_eq!(stack.back().map(|r| r.value.as_str()), Some("a"));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_forward_saturates_at_newest() {
        let mut stack = HistoryStack::new();
        stack.push(rec("a"));
        assert_eq!(stack.forward().map(|r| r.value.as_str()), Some("a"));
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_push_after_back_truncates_forward_records() {
        let mut stack = HistoryStack::new();
        stack.push(rec("a"));
        stack.push(rec("b"));
        stack.push(rec("c"));
        stack.back();
        stack.back();
        stack.push(rec("d"));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.active().map(|r| r.value.as_str()), Some("d"));
        assert!(!stack.can_redo());
        assert_eq!(stack.back().map(|r| r.value.as_str()), Some("a"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stack = HistoryStack::with_max_records(3);
        for value in ["a", "b", "c", "d"] {
            stack.push(rec(value));
        }
        assert_eq!(stack.len(), 3);
        stack.back();
        stack.back();
        // "a" was evicted; the oldest reachable record is "b"
        assert_eq!(stack.active().map(|r| r.value.as_str()), Some("b"));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_selection_preserved_in_records() {
        let mut stack = HistoryStack::new();
        stack.push(HistoryRecord::new("hello", (1, 4)));
        assert_eq!(stack.active().map(|r| r.selection), Some((1, 4)));
    }
}

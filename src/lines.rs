//! Line model for markedit
//!
//! Lines are derived on demand from a buffer and a selection, never stored.
//! A `Line` carries its absolute byte span (exclusive of the trailing
//! newline) plus the overlap of the selection with that span. Consecutive
//! lines satisfy `line[i].end + 1 == line[i + 1].start`, the `+1` being the
//! removed `\n`.

use crate::string_utils::clamp_range;

// ─────────────────────────────────────────────────────────────────────────────
// Line
// ─────────────────────────────────────────────────────────────────────────────

/// A single derived line of the buffer with selection-overlap metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Zero-based line index.
    pub index: usize,
    /// Byte offset of the first character of the line.
    pub start: usize,
    /// Byte offset one past the last character, exclusive of the newline.
    pub end: usize,
    /// The line's text without its newline.
    pub text: String,
    /// Whether any part of the selection touches this line.
    pub in_selection: bool,
    /// Selection start clamped into this line (only for in-selection lines).
    pub sel_start: Option<usize>,
    /// Selection end clamped into this line (only for in-selection lines).
    pub sel_end: Option<usize>,
}

impl Line {
    /// Selection start within this line, falling back to the line start.
    pub fn sel_start_or_line(&self) -> usize {
        self.sel_start.unwrap_or(self.start)
    }

    /// Selection end within this line, falling back to the line end.
    pub fn sel_end_or_line(&self) -> usize {
        self.sel_end.unwrap_or(self.end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Derivation
// ─────────────────────────────────────────────────────────────────────────────

/// Derive the lines of `buffer`, tagged with their overlap of `selection`.
///
/// When `restrict_to_selection` is true, production stops at the first
/// line that begins past the selection end, and lines entirely outside
/// the selection are omitted. When false, every line of the buffer is
/// returned, out-of-selection lines tagged `in_selection: false`.
///
/// A line counts as in-selection unless it lies entirely before the
/// selection start or entirely after the selection end; a collapsed caret
/// sitting on a line boundary therefore selects the earlier line.
pub fn lines_in(buffer: &str, selection: (usize, usize), restrict_to_selection: bool) -> Vec<Line> {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let mut pass = 0usize;
    let mut lines = Vec::new();

    for (index, text) in buffer.split('\n').enumerate() {
        let line_start = pass;
        let line_end = pass + text.len();
        pass = line_end + 1;

        if restrict_to_selection && line_start > end {
            break;
        }

        if line_end < start || line_start > end {
            if !restrict_to_selection {
                lines.push(Line {
                    index,
                    start: line_start,
                    end: line_end,
                    text: text.to_string(),
                    in_selection: false,
                    sel_start: None,
                    sel_end: None,
                });
            }
        } else {
            lines.push(Line {
                index,
                start: line_start,
                end: line_end,
                text: text.to_string(),
                in_selection: true,
                sel_start: Some(line_start.max(start)),
                sel_end: Some(line_end.min(end)),
            });
        }
    }

    lines
}

/// Split the buffer into the text strictly before and strictly after the
/// given line range.
///
/// `before` ends at the first line's start; `after` begins one past the
/// last line's end, skipping the newline that separated it from the rest
/// of the buffer. Together with a rewritten center these reassemble a
/// full buffer. `lines` must be non-empty and ordered.
pub fn detach_lines<'a>(buffer: &'a str, lines: &[Line]) -> (&'a str, &'a str) {
    let (first, last) = match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return ("", ""),
    };

    let before = &buffer[..first.start.min(buffer.len())];
    let after_start = (last.end + 1).min(buffer.len());
    let after = &buffer[after_start..];
    (before, after)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Line derivation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_single_line_buffer() {
        let lines = lines_in("hello", (0, 5), false);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].end, 5);
        assert_eq!(lines[0].text, "hello");
        assert!(lines[0].in_selection);
    }

    #[test]
    fn test_empty_buffer_yields_one_empty_line() {
        let lines = lines_in("", (0, 0), true);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "");
        assert!(lines[0].in_selection);
    }

    #[test]
    fn test_line_spans_are_contiguous() {
        let buffer = "one\ntwo\nthree";
        let lines = lines_in(buffer, (0, buffer.len()), false);
        assert_eq!(lines.len(), 3);
        for pair in lines.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start);
        }
    }

    #[test]
    fn test_lines_reconstruct_buffer() {
        // Extending each [start, end) by the removed separators must
        // exactly rebuild the buffer.
        for buffer in ["", "a", "a\nb", "a\n\nb\n", "\n\n", "first\nsecond\nthird"] {
            let lines = lines_in(buffer, (0, buffer.len()), false);
            let rebuilt: Vec<&str> = lines.iter().map(|l| &buffer[l.start..l.end]).collect();
            assert_eq!(rebuilt.join("\n"), buffer, "buffer {:?}", buffer);
        }
    }

    #[test]
    fn test_selection_overlap_clamped_per_line() {
        let buffer = "one\ntwo\nthree";
        // Selection from inside "one" to inside "three"
        let lines = lines_in(buffer, (1, 10), true);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].sel_start, Some(1));
        assert_eq!(lines[0].sel_end, Some(3)); // Clamped to line end
        assert_eq!(lines[1].sel_start, Some(4)); // Clamped to line start
        assert_eq!(lines[1].sel_end, Some(7));
        assert_eq!(lines[2].sel_start, Some(8));
        assert_eq!(lines[2].sel_end, Some(10));
    }

    #[test]
    fn test_restrict_stops_after_selection() {
        let buffer = "one\ntwo\nthree\nfour";
        let lines = lines_in(buffer, (0, 2), true);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "one");
    }

    #[test]
    fn test_unrestricted_tags_outside_lines() {
        let buffer = "one\ntwo\nthree";
        let lines = lines_in(buffer, (4, 7), false);
        assert_eq!(lines.len(), 3);
        assert!(!lines[0].in_selection);
        assert!(lines[1].in_selection);
        assert!(!lines[2].in_selection);
        assert_eq!(lines[0].sel_start, None);
    }

    #[test]
    fn test_caret_on_boundary_selects_earlier_line() {
        // Caret at the very end of "one" (offset 3): line "one" qualifies,
        // line "two" (starting at 4) does not start before the caret.
        let buffer = "one\ntwo";
        let lines = lines_in(buffer, (3, 3), true);
        assert_eq!(lines[0].text, "one");
        assert!(lines[0].in_selection);
    }

    #[test]
    fn test_inverted_selection_is_normalized() {
        let buffer = "one\ntwo";
        let lines = lines_in(buffer, (6, 1), true);
        assert_eq!(lines.len(), 2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // detach_lines
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_detach_middle_line() {
        let buffer = "one\ntwo\nthree";
        let lines = lines_in(buffer, (4, 7), true);
        let (before, after) = detach_lines(buffer, &lines);
        assert_eq!(before, "one\n");
        assert_eq!(after, "three");
    }

    #[test]
    fn test_detach_first_line() {
        let buffer = "one\ntwo";
        let lines = lines_in(buffer, (0, 2), true);
        let (before, after) = detach_lines(buffer, &lines);
        assert_eq!(before, "");
        assert_eq!(after, "two");
    }

    #[test]
    fn test_detach_last_line_has_empty_after() {
        let buffer = "one\ntwo";
        let lines = lines_in(buffer, (5, 7), true);
        let (before, after) = detach_lines(buffer, &lines);
        assert_eq!(before, "one\n");
        assert_eq!(after, "");
    }

    #[test]
    fn test_detach_whole_buffer() {
        let buffer = "one\ntwo";
        let lines = lines_in(buffer, (0, buffer.len()), true);
        let (before, after) = detach_lines(buffer, &lines);
        assert_eq!(before, "");
        assert_eq!(after, "");
    }
}

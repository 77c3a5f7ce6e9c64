//! Text Transformation Operations
//!
//! This module provides the pure editing operations of the core: every
//! function maps an old `(buffer, selection)` plus parameters to a new
//! `(buffer, selection)` without touching any shared state.
//!
//! # Supported Operations
//! - **Block**: indent, outdent, heading level, smart Enter
//! - **Inline**: delimiter wrapping (bold, italic, inline code, strikethrough)
//! - **Insertion**: text insertion with caret/selection placement modes,
//!   plus link/image/table/horizontal-rule snippets built on top of it

use crate::lines::{detach_lines, lines_in, Line};
use crate::string_utils::clamp_range;
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Edit Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying a transformation: the new buffer and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    /// The new buffer text
    pub text: String,
    /// New selection range (start, end) in byte offsets
    pub selection: (usize, usize),
}

impl EditResult {
    /// Create a result with a collapsed caret.
    pub fn with_caret(text: String, caret: usize) -> Self {
        Self {
            text,
            selection: (caret, caret),
        }
    }

    /// Create a result that leaves the given state unchanged.
    pub fn unchanged(buffer: &str, selection: (usize, usize)) -> Self {
        Self {
            text: buffer.to_string(),
            selection,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Modes
// ─────────────────────────────────────────────────────────────────────────────

/// Delimiter insertion behavior for [`wrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Remove the delimiters if they already surround the selection,
    /// insert them otherwise. Applying twice is an involution.
    Toggle,
    /// Always insert, so repeated invocations nest delimiter pairs.
    /// Used for inline code, where backticks must be stackable.
    Repeat,
}

/// Selection placement after [`insert_with_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Caret collapses to the start of the inserted text.
    CaretBefore,
    /// The entire inserted text ends up selected.
    SelectInserted,
    /// Caret collapses to the end of the inserted text (the default).
    #[default]
    CaretAfter,
    /// Selection placed at `insertion_start + rel_start .. insertion_start
    /// + rel_end`, both clamped to the inserted text.
    Relative(usize, usize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Indentation
// ─────────────────────────────────────────────────────────────────────────────

/// Prepend `tab_size` spaces to every line intersecting the selection.
///
/// The selection start shifts right by one tab; the end accumulates one
/// tab per affected line. Lines outside the selection are reassembled
/// untouched.
pub fn indent(buffer: &str, selection: (usize, usize), tab_size: usize) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let lines = lines_in(buffer, (start, end), true);
    if lines.is_empty() {
        return EditResult::unchanged(buffer, (start, end));
    }

    let (before, after) = detach_lines(buffer, &lines);
    let tab = " ".repeat(tab_size);
    let mut sel_start = None;
    let mut sel_end = end;
    let mut center = String::new();

    for (i, line) in lines.iter().enumerate() {
        if sel_start.is_none() {
            sel_start = Some(line.sel_start_or_line() + tab_size);
        }
        sel_end = line.sel_end_or_line() + tab_size * (i + 1);
        if i > 0 {
            center.push('\n');
        }
        center.push_str(&tab);
        center.push_str(&line.text);
    }

    EditResult {
        text: reassemble(before, center, after, &lines, buffer),
        selection: (sel_start.unwrap_or(start), sel_end),
    }
}

/// Strip up to `tab_size` leading spaces from every line intersecting
/// the selection.
///
/// Permissive policy: a line with fewer leading spaces loses only what it
/// has. The actual removed width per line is accumulated when computing
/// the new selection end, and the new start never retreats past the first
/// line's own start offset.
pub fn outdent(buffer: &str, selection: (usize, usize), tab_size: usize) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let lines = lines_in(buffer, (start, end), true);
    if lines.is_empty() {
        return EditResult::unchanged(buffer, (start, end));
    }

    let (before, after) = detach_lines(buffer, &lines);
    let mut sel_start = None;
    let mut sel_end = end;
    let mut removed_total = 0usize;
    let mut center = String::new();

    for (i, line) in lines.iter().enumerate() {
        let removed = line
            .text
            .bytes()
            .take_while(|b| *b == b' ')
            .count()
            .min(tab_size);

        if sel_start.is_none() {
            sel_start = Some(line.sel_start_or_line().saturating_sub(removed).max(line.start));
        }
        removed_total += removed;
        sel_end = line.sel_end_or_line().saturating_sub(removed_total);

        if i > 0 {
            center.push('\n');
        }
        center.push_str(&line.text[removed..]);
    }

    let sel_start = sel_start.unwrap_or(start);
    EditResult {
        text: reassemble(before, center, after, &lines, buffer),
        selection: (sel_start, sel_end.max(sel_start)),
    }
}

/// Rejoin detached context around a rewritten center, restoring the
/// separator that `detach_lines` skipped when the last line was not the
/// final line of the buffer.
fn reassemble(before: &str, mut center: String, after: &str, lines: &[Line], buffer: &str) -> String {
    if lines.last().map(|l| l.end < buffer.len()).unwrap_or(false) {
        center.push('\n');
    }
    format!("{}{}{}", before, center, after)
}

// ─────────────────────────────────────────────────────────────────────────────
// Delimiter Wrapping
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap (or, in toggle mode, unwrap) the selection with a delimiter pair.
///
/// In [`WrapMode::Toggle`], if the characters immediately adjacent to the
/// selection already equal the delimiters, they are removed and the
/// selection shifts left by `before.len()`. Otherwise — and always in
/// [`WrapMode::Repeat`] — the delimiters are inserted and the selection
/// shifts right by `before.len()`.
pub fn wrap(
    buffer: &str,
    selection: (usize, usize),
    before: &str,
    after: &str,
    mode: WrapMode,
) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let focus = &buffer[start..end];

    if mode == WrapMode::Toggle {
        let has_before = start
            .checked_sub(before.len())
            .and_then(|i| buffer.get(i..start))
            .map(|s| s == before)
            .unwrap_or(false);
        let has_after = buffer.get(end..end + after.len()).map(|s| s == after).unwrap_or(false);

        if has_before && has_after {
            let text = format!(
                "{}{}{}",
                &buffer[..start - before.len()],
                focus,
                &buffer[end + after.len()..]
            );
            return EditResult {
                text,
                selection: (start - before.len(), end - before.len()),
            };
        }
    }

    let wrapped = format!("{}{}{}", before, focus, after);
    insert_with_mode(
        buffer,
        (start, end),
        &wrapped,
        InsertMode::Relative(before.len(), before.len() + focus.len()),
    )
}

/// Toggle `**bold**` delimiters around the selection.
pub fn bold(buffer: &str, selection: (usize, usize)) -> EditResult {
    wrap(buffer, selection, "**", "**", WrapMode::Toggle)
}

/// Toggle `_italic_` delimiters around the selection.
pub fn italic(buffer: &str, selection: (usize, usize)) -> EditResult {
    wrap(buffer, selection, "_", "_", WrapMode::Toggle)
}

/// Wrap the selection in backticks. Always inserts, so backticks stack
/// for escaping.
pub fn inline_code(buffer: &str, selection: (usize, usize)) -> EditResult {
    wrap(buffer, selection, "`", "`", WrapMode::Repeat)
}

/// Toggle `~~strikethrough~~` delimiters around the selection.
pub fn strikethrough(buffer: &str, selection: (usize, usize)) -> EditResult {
    wrap(buffer, selection, "~~", "~~", WrapMode::Toggle)
}

// ─────────────────────────────────────────────────────────────────────────────
// Headings
// ─────────────────────────────────────────────────────────────────────────────

/// Set the heading level of the selected line.
///
/// Only applies when the selection spans exactly one line; anything else
/// is a no-op, not an error. An existing `#+ ` marker is stripped first,
/// then `level` hashes and a space are prepended (level 0 demotes to a
/// plain paragraph). The selection shifts by the net marker delta.
pub fn heading(buffer: &str, selection: (usize, usize), level: u8) -> EditResult {
    let level = level.min(6) as usize;
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let lines = lines_in(buffer, (start, end), true);
    if lines.len() != 1 {
        return EditResult::unchanged(buffer, (start, end));
    }

    let line = &lines[0];
    let (before, after) = detach_lines(buffer, &lines);
    let marker = if level > 0 {
        format!("{} ", "#".repeat(level))
    } else {
        String::new()
    };

    let stripped = strip_heading_marker(&line.text);
    let delta = line.text.len() - stripped.len();
    let sel_start = start.saturating_sub(delta).max(line.start) + marker.len();
    let sel_end = end.saturating_sub(delta).max(line.start) + marker.len();

    let center = format!("{}{}", marker, stripped);
    EditResult {
        text: reassemble(before, center, after, &lines, buffer),
        selection: (sel_start, sel_end.max(sel_start)),
    }
}

/// Strip a leading `#+ ` heading marker, if present.
fn strip_heading_marker(line: &str) -> &str {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 {
        return line;
    }
    let rest = &line[hashes..];
    let spaces = rest
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    if spaces == 0 {
        // '#'s not followed by whitespace are content, not a marker
        return line;
    }
    &rest[spaces..]
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Insert `text` at the selection, replacing any selected content, and
/// place the resulting selection according to `mode`.
pub fn insert_with_mode(
    buffer: &str,
    selection: (usize, usize),
    text: &str,
    mode: InsertMode,
) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let new_text = format!("{}{}{}", &buffer[..start], text, &buffer[end..]);

    let new_selection = match mode {
        InsertMode::CaretBefore => (start, start),
        InsertMode::SelectInserted => (start, start + text.len()),
        InsertMode::CaretAfter => (start + text.len(), start + text.len()),
        InsertMode::Relative(rel_start, rel_end) => {
            let rel_start = rel_start.min(text.len());
            let rel_end = rel_end.min(text.len());
            if rel_start > rel_end {
                (start + rel_end, start + rel_start)
            } else {
                (start + rel_start, start + rel_end)
            }
        }
    };

    EditResult {
        text: new_text,
        selection: new_selection,
    }
}

/// Insert a horizontal rule below the selection.
pub fn horizontal_rule(buffer: &str, selection: (usize, usize)) -> EditResult {
    insert_with_mode(buffer, selection, "\n---\n", InsertMode::CaretAfter)
}

/// Insert a `[text](url)` link, using the selection as the link text when
/// present, and leave the `url` placeholder selected for replacement.
pub fn link(buffer: &str, selection: (usize, usize)) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let focus = &buffer[start..end];
    let label = if focus.is_empty() { "text" } else { focus };
    let snippet = format!("[{}](url)", label);
    let url_start = 1 + label.len() + 2;
    insert_with_mode(
        buffer,
        (start, end),
        &snippet,
        InsertMode::Relative(url_start, url_start + 3),
    )
}

/// Insert an `![alt](url)` image, leaving the `url` placeholder selected.
pub fn image(buffer: &str, selection: (usize, usize)) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);
    let focus = &buffer[start..end];
    let label = if focus.is_empty() { "alt" } else { focus };
    let snippet = format!("![{}](url)", label);
    let url_start = 2 + label.len() + 2;
    insert_with_mode(
        buffer,
        (start, end),
        &snippet,
        InsertMode::Relative(url_start, url_start + 3),
    )
}

/// Insert an empty two-column table skeleton below the selection.
pub fn table(buffer: &str, selection: (usize, usize)) -> EditResult {
    let snippet = "\n| Column | Column |\n| ------ | ------ |\n|        |        |\n";
    insert_with_mode(buffer, selection, snippet, InsertMode::CaretAfter)
}

// ─────────────────────────────────────────────────────────────────────────────
// Smart Enter
// ─────────────────────────────────────────────────────────────────────────────

/// Leading whitespace plus an optional list/quote marker.
fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\s*)((?:[+*>-]|\d+\.)\s+)?").expect("hardcoded marker pattern")
    })
}

/// A fenced-code-block opener: optional list/quote marker, a run of 3+
/// backticks, optional language tag, optional closing run on the same line.
fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:(?:[+*>-]|\d+\.)\s+)?`{3,}[^`]*(?:`{3,})?\s*$")
            .expect("hardcoded fence pattern")
    })
}

/// A numeric ordinal marker (`N.`) at the start of a captured marker.
fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.").expect("hardcoded ordinal pattern"))
}

/// Handle the Enter key with list and code-fence awareness.
///
/// With a non-collapsed selection, Enter simply replaces it with a single
/// newline. With a collapsed caret:
/// - pressing Enter on an empty list/quote item deletes the marker
///   instead of continuing the list, leaving a bare line with the caret
///   at the marker's former start;
/// - otherwise a list/quote marker is continued onto the new line, with
///   numeric ordinals incremented;
/// - on a fenced-code opener the line break is doubled so a closing
///   fence stays on its own line.
pub fn smart_enter(buffer: &str, selection: (usize, usize)) -> EditResult {
    let (start, end) = clamp_range(buffer, selection.0, selection.1);

    // Replacing a real selection gets no list/fence logic
    if start != end {
        return insert_with_mode(buffer, (start, end), "\n", InsertMode::CaretAfter);
    }

    let lines = lines_in(buffer, (start, end), true);
    let current = match lines.first() {
        Some(line) => line,
        None => return insert_with_mode(buffer, (start, end), "\n", InsertMode::CaretAfter),
    };

    let mut before = buffer[..start].to_string();
    let mut after = buffer[end..].to_string();
    let mut center = String::from("\n");
    let mut caret_base = start;

    if let Some(caps) = marker_re().captures(&current.text) {
        let tab = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let order = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        if !current.text.is_empty() && tab.len() + order.len() == current.text.len() {
            // Empty list/quote item: drop the marker instead of continuing
            caret_base = start.saturating_sub(current.text.len()).max(current.start);
            before.truncate(caret_base);
            center.clear();
        } else if !order.is_empty() {
            center.push_str(tab);
            center.push_str(&continue_marker(order));
        }
    }

    if fence_re().is_match(&current.text) {
        // Keep a slot for the closing fence on its own line
        after.insert(0, '\n');
    }

    let caret = caret_base + center.len();
    EditResult {
        text: format!("{}{}{}", before, center, after),
        selection: (caret, caret),
    }
}

/// Continue a list/quote marker onto the next line, incrementing a
/// numeric ordinal and repeating any other marker verbatim.
fn continue_marker(order: &str) -> String {
    if let Some(caps) = ordinal_re().captures(order) {
        let digits_end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        if let Some(next) = caps[1].parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
            return format!("{}.{}", next, &order[digits_end..]);
        }
    }
    order.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Editing commands a host can dispatch without calling the individual
/// transformation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// Indent every selected line by one tab
    Indent,
    /// Outdent every selected line by up to one tab
    Outdent,
    /// Bold (**text**)
    Bold,
    /// Italic (_text_)
    Italic,
    /// Inline code (`code`)
    InlineCode,
    /// Strikethrough (~~text~~)
    Strikethrough,
    /// Heading level 0-6 (0 demotes to a paragraph)
    Heading(u8),
    /// List/fence-aware line break
    SmartEnter,
    /// Horizontal rule
    HorizontalRule,
    /// Link ([text](url))
    Link,
    /// Image (![alt](url))
    Image,
    /// Table skeleton
    Table,
}

impl EditCommand {
    /// Get the conventional keyboard shortcut label for this command.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Indent => "Tab",
            Self::Outdent => "Shift+Tab",
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::InlineCode => "Ctrl+`",
            Self::Strikethrough => "Ctrl+U",
            Self::Heading(0) => "Ctrl+0",
            Self::Heading(1) => "Ctrl+1",
            Self::Heading(2) => "Ctrl+2",
            Self::Heading(3) => "Ctrl+3",
            Self::Heading(4) => "Ctrl+4",
            Self::Heading(5) => "Ctrl+5",
            Self::Heading(6) => "Ctrl+6",
            Self::Heading(_) => "Ctrl+0-6",
            Self::SmartEnter => "Enter",
            Self::HorizontalRule => "Ctrl+Shift+H",
            Self::Link => "Ctrl+K",
            Self::Image => "Ctrl+Shift+K",
            Self::Table => "Ctrl+Shift+T",
        }
    }

    /// Apply this command to the given buffer and selection.
    pub fn apply(&self, buffer: &str, selection: (usize, usize), tab_size: usize) -> EditResult {
        match self {
            Self::Indent => indent(buffer, selection, tab_size),
            Self::Outdent => outdent(buffer, selection, tab_size),
            Self::Bold => bold(buffer, selection),
            Self::Italic => italic(buffer, selection),
            Self::InlineCode => inline_code(buffer, selection),
            Self::Strikethrough => strikethrough(buffer, selection),
            Self::Heading(level) => heading(buffer, selection, *level),
            Self::SmartEnter => smart_enter(buffer, selection),
            Self::HorizontalRule => horizontal_rule(buffer, selection),
            Self::Link => link(buffer, selection),
            Self::Image => image(buffer, selection),
            Self::Table => table(buffer, selection),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! UTF-8 Safe String Utilities
//!
//! Selection offsets arrive from the host as arbitrary byte positions into
//! the buffer. Rust strings are UTF-8 encoded, so indices must fall on
//! character boundaries before slicing. These utilities clamp and order
//! offsets so no transformation ever panics mid-character.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{clamp_range, safe_slice};
//!
//! let text = "Hei på deg"; // Norwegian text with å
//! let (start, end) = clamp_range(text, 6, 4); // Inverted + mid-char is fine
//! let focus = safe_slice(text, start, end);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
/// If `index` is already on a character boundary, returns `index`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk backwards to find the start of the character
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the
/// string length. If `index` is already on a boundary, returns `index`.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk forwards to find the start of the next character
    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// In UTF-8:
/// - Single-byte chars (ASCII): 0xxxxxxx (0x00-0x7F)
/// - Multi-byte char start: 11xxxxxx (0xC0-0xFF)
/// - Continuation bytes: 10xxxxxx (0x80-0xBF)
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    // A byte is a char start if it's NOT a continuation byte (10xxxxxx)
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Clamping
// ─────────────────────────────────────────────────────────────────────────────

/// Clamp a host-supplied selection to valid, ordered buffer offsets.
///
/// - Both offsets are clamped into `[0, s.len()]` and floored to character
///   boundaries.
/// - An inverted pair (`start > end`) is swapped rather than rejected.
///
/// Every public entry point that accepts a selection runs it through here
/// first, so out-of-range or inverted selections are never errors.
#[inline]
pub fn clamp_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let start = floor_char_boundary(s, start.min(s.len()));
    let end = floor_char_boundary(s, end.min(s.len()));
    if start > end {
        (end, start)
    } else {
        (start, end)
    }
}

/// Check if an index is on a valid UTF-8 character boundary.
#[inline]
pub fn is_char_boundary(s: &str, index: usize) -> bool {
    if index == 0 || index >= s.len() {
        return true;
    }
    is_utf8_char_start(s.as_bytes()[index])
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe Slicing Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Safely slice a string from `start` to `end`, adjusting indices to
/// valid UTF-8 character boundaries.
///
/// - `start` is adjusted down to the nearest character boundary (floor)
/// - `end` is adjusted up to the nearest character boundary (ceil)
///
/// If `start >= end` after adjustment, returns an empty string.
#[inline]
pub fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(s, start);
    let end = ceil_char_boundary(s, end);

    if start >= end {
        return "";
    }

    &s[start..end]
}

/// Safely slice from the beginning of a string to `end`.
///
/// `end` is adjusted down to a valid character boundary.
#[inline]
pub fn safe_slice_to(s: &str, end: usize) -> &str {
    let end = floor_char_boundary(s, end);
    &s[..end]
}

/// Safely slice from `start` to the end of a string.
///
/// `start` is adjusted up to a valid character boundary.
#[inline]
pub fn safe_slice_from(s: &str, start: usize) -> &str {
    let start = ceil_char_boundary(s, start);
    &s[start..]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

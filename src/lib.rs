//! markedit - Selection-Aware Markdown Editing Core
//!
//! A plain-text Markdown editing engine that operates on a `(buffer,
//! selection)` pair owned by a host-provided text surface. The host wires
//! key bindings and rendering; this crate supplies line-aware
//! transformations (indent, outdent, wrap, heading, smart Enter), a
//! deduplicating undo/redo history, an `@`-mention capture state machine,
//! and crash-recovery backups.
//!
//! The typical entry point is [`EditorCore`], built through
//! [`EditorBuilder`] with a [`TextSurface`] implementation. The
//! transformation functions in [`transform`] are also usable standalone:
//! they are pure `(buffer, selection) -> EditResult` functions with no
//! editor state.

pub mod backup;
pub mod editor;
pub mod error;
pub mod events;
pub mod history;
pub mod lines;
pub mod mention;
pub mod options;
pub mod schedule;
pub mod string_utils;
pub mod surface;
pub mod transform;

// Only export what hosts actually wire up
pub use backup::{BackupRecord, BackupStore, FileBackupStore, MemoryBackupStore};
pub use editor::{EditorBuilder, EditorCore};
pub use error::{Error, Result, ResultExt};
pub use events::{EditorEvent, EventSink};
pub use history::{HistoryRecord, HistoryStack};
pub use lines::{detach_lines, lines_in, Line};
pub use mention::{MentionEngine, MentionUpdate};
pub use options::EditorOptions;
pub use surface::{HotkeySwitch, MemoryHotkeySwitch, MemorySurface, SelectionRect, TextSurface};
pub use transform::{EditCommand, EditResult, InsertMode, WrapMode};

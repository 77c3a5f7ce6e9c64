//! Editor core orchestration for markedit
//!
//! `EditorCore` owns the live `(buffer, selection)` pair through the
//! host's text surface, routes transformer output back onto it, records
//! accepted states in the history stack (with dedup), mirrors them to the
//! backup store, and emits change/backup/mention notifications through
//! the injected event sink.
//!
//! The core is single-threaded and cooperative: hosts call
//! [`EditorCore::notify_input`] on every input event and drive
//! [`EditorCore::tick`] from their own loop. The only deferred work is
//! the mention-end hotkey re-enable, which runs strictly after the task
//! that caused it.

use crate::backup::{BackupRecord, BackupStore};
use crate::error::{Error, Result};
use crate::events::{EditorEvent, EventSink};
use crate::history::{HistoryRecord, HistoryStack};
use crate::mention::{MentionEngine, MentionUpdate};
use crate::options::EditorOptions;
use crate::schedule::{Debouncer, TaskQueue};
use crate::surface::{HotkeySwitch, TextSurface};
use crate::transform::{self, EditCommand, EditResult, InsertMode, WrapMode};
use log::{debug, warn};
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Deferred Work
// ─────────────────────────────────────────────────────────────────────────────

/// Work scheduled for the tick after the current task.
#[derive(Debug, Clone)]
enum DeferredTask {
    /// Re-enable hotkey dispatch and announce the mention end.
    EndMention { range: (usize, usize) },
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`EditorCore`].
///
/// A text surface is mandatory; everything else is optional. Building
/// without a surface fails with [`Error::NoSurface`] — the core must not
/// operate on an undefined surface.
pub struct EditorBuilder<S: TextSurface> {
    surface: Option<S>,
    options: EditorOptions,
    hotkeys: Option<Box<dyn HotkeySwitch>>,
    backup: Option<Box<dyn BackupStore>>,
    backup_url: Option<String>,
    sink: Option<EventSink>,
}

impl<S: TextSurface> Default for EditorBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TextSurface> EditorBuilder<S> {
    /// Create a builder with default options and no collaborators.
    pub fn new() -> Self {
        Self {
            surface: None,
            options: EditorOptions::default(),
            hotkeys: None,
            backup: None,
            backup_url: None,
            sink: None,
        }
    }

    /// Set the text surface (required).
    pub fn surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the editor options.
    pub fn options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach the host's hotkey dispatcher switch.
    pub fn hotkeys(mut self, hotkeys: impl HotkeySwitch + 'static) -> Self {
        self.hotkeys = Some(Box::new(hotkeys));
        self
    }

    /// Attach a backup store.
    pub fn backup(mut self, backup: impl BackupStore + 'static) -> Self {
        self.backup = Some(Box::new(backup));
        self
    }

    /// Set the location context persisted with every backup record
    /// (e.g. a document URL).
    pub fn backup_url(mut self, url: impl Into<String>) -> Self {
        self.backup_url = Some(url.into());
        self
    }

    /// Attach the event sink.
    pub fn on_event(mut self, sink: impl FnMut(EditorEvent) + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Build and initialize the editor core.
    ///
    /// Initialization seeds the history with the surface's current state
    /// and, when an id is configured, compares the persisted backup
    /// against the live buffer, emitting [`EditorEvent::Different`] when
    /// a non-empty backup disagrees.
    pub fn build(self) -> Result<EditorCore<S>> {
        let surface = self.surface.ok_or(Error::NoSurface)?;
        let mut options = self.options;
        options.sanitize();

        let coalesce = Duration::from_millis(options.coalesce_ms);
        let mut core = EditorCore {
            surface,
            options,
            history: HistoryStack::new(),
            mention: MentionEngine::new(),
            hotkeys: self.hotkeys,
            backup: self.backup,
            backup_url: self.backup_url,
            sink: self.sink,
            debouncer: Debouncer::new(coalesce),
            deferred: TaskQueue::new(),
        };
        core.init();
        Ok(core)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Core
// ─────────────────────────────────────────────────────────────────────────────

/// The editing core: one mutable `(buffer, selection)` pair, one history,
/// one mention engine.
pub struct EditorCore<S: TextSurface> {
    surface: S,
    options: EditorOptions,
    history: HistoryStack,
    mention: MentionEngine,
    hotkeys: Option<Box<dyn HotkeySwitch>>,
    backup: Option<Box<dyn BackupStore>>,
    backup_url: Option<String>,
    sink: Option<EventSink>,
    debouncer: Debouncer,
    deferred: TaskQueue<DeferredTask>,
}

impl<S: TextSurface> EditorCore<S> {
    /// Start building an editor core.
    pub fn builder() -> EditorBuilder<S> {
        EditorBuilder::new()
    }

    /// Run the backup comparison, then seed the history.
    ///
    /// The comparison must come first: the seed push mirrors the live
    /// buffer to the backup store, which would clobber any prior state
    /// the recovery prompt is supposed to surface.
    fn init(&mut self) {
        self.compare_backup();
        self.push_history();
    }

    fn compare_backup(&mut self) {
        let id = match &self.options.id {
            Some(id) => id.clone(),
            None => return,
        };
        let loaded = match self.backup.as_ref() {
            Some(store) => store.load(&id),
            None => return,
        };

        match loaded {
            Ok(Some(backup)) => {
                let current = HistoryRecord::new(self.surface.text(), self.surface.selection());
                if !backup.value.is_empty() && backup.value != current.value {
                    debug!("backup for '{}' differs from live buffer", id);
                    self.emit(EditorEvent::Different { backup, current });
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!("Failed to load backup for '{}': {}", id, err);
                self.emit(EditorEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Buffer and Selection Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Current buffer text.
    pub fn text(&self) -> String {
        self.surface.text()
    }

    /// Current selection.
    pub fn selection(&self) -> (usize, usize) {
        self.surface.selection()
    }

    /// The configured options.
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Replace the buffer and selection, recording the new state.
    ///
    /// With no explicit selection the caret lands at the end of the text.
    pub fn set_text(&mut self, text: &str, selection: Option<(usize, usize)>) {
        let selection = selection.unwrap_or((text.len(), text.len()));
        self.surface.set_text(text);
        self.surface.set_selection(selection.0, selection.1);
        self.push_history();
    }

    /// Move the selection without touching the text. Recorded through
    /// the coalescing window like any other input.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.surface.set_selection(start, end);
        self.debouncer.touch(Instant::now());
    }

    /// Collapse the caret to the end of the buffer.
    pub fn move_caret_to_end(&mut self) {
        let len = self.surface.text().len();
        self.surface.set_selection(len, len);
    }

    /// Update the location context persisted with future backup records.
    pub fn set_backup_url(&mut self, url: Option<String>) {
        self.backup_url = url;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transformations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply an [`EditCommand`] to the current state and record it.
    pub fn apply_command(&mut self, command: EditCommand) {
        let result = command.apply(&self.surface.text(), self.surface.selection(), self.options.tab_size);
        self.apply_edit(result);
    }

    /// Indent every selected line by one tab.
    pub fn indent(&mut self) {
        self.apply_command(EditCommand::Indent);
    }

    /// Outdent every selected line by up to one tab.
    pub fn outdent(&mut self) {
        self.apply_command(EditCommand::Outdent);
    }

    /// Toggle bold delimiters around the selection.
    pub fn bold(&mut self) {
        self.apply_command(EditCommand::Bold);
    }

    /// Toggle italic delimiters around the selection.
    pub fn italic(&mut self) {
        self.apply_command(EditCommand::Italic);
    }

    /// Wrap the selection in backticks (stackable).
    pub fn inline_code(&mut self) {
        self.apply_command(EditCommand::InlineCode);
    }

    /// Toggle strikethrough delimiters around the selection.
    pub fn strikethrough(&mut self) {
        self.apply_command(EditCommand::Strikethrough);
    }

    /// Set the heading level of the selected line (0 demotes).
    pub fn heading(&mut self, level: u8) {
        self.apply_command(EditCommand::Heading(level));
    }

    /// Handle the Enter key with list and fence awareness.
    pub fn smart_enter(&mut self) {
        self.apply_command(EditCommand::SmartEnter);
    }

    /// Insert a horizontal rule.
    pub fn horizontal_rule(&mut self) {
        self.apply_command(EditCommand::HorizontalRule);
    }

    /// Insert a link snippet, leaving the url placeholder selected.
    pub fn link(&mut self) {
        self.apply_command(EditCommand::Link);
    }

    /// Insert an image snippet, leaving the url placeholder selected.
    pub fn image(&mut self) {
        self.apply_command(EditCommand::Image);
    }

    /// Insert a table skeleton.
    pub fn table(&mut self) {
        self.apply_command(EditCommand::Table);
    }

    /// Wrap the selection in an arbitrary delimiter pair.
    pub fn wrap(&mut self, before: &str, after: &str, mode: WrapMode) {
        let result = transform::wrap(
            &self.surface.text(),
            self.surface.selection(),
            before,
            after,
            mode,
        );
        self.apply_edit(result);
    }

    /// Insert text at the selection with explicit caret placement.
    pub fn insert_with_mode(&mut self, text: &str, mode: InsertMode) {
        let result =
            transform::insert_with_mode(&self.surface.text(), self.surface.selection(), text, mode);
        self.apply_edit(result);
    }

    /// Write a transformation result to the surface and record it.
    fn apply_edit(&mut self, result: EditResult) {
        self.surface.set_text(&result.text);
        self.surface.set_selection(result.selection.0, result.selection.1);
        self.push_history();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the surface state unless it matches the active record.
    ///
    /// A push whose buffer and selection both equal the active record is
    /// skipped entirely. An accepted push that changed the text emits
    /// [`EditorEvent::Change`]; with an id configured it is also
    /// mirrored to the backup store.
    pub fn push_history(&mut self) {
        let text = self.surface.text();
        let selection = self.surface.selection();

        // The seed push has no prior record and is not a transition, so
        // it emits no Change
        let text_changed = match self.history.active() {
            Some(active) => {
                if active.value == text && active.selection == selection {
                    return;
                }
                active.value != text
            }
            None => false,
        };

        self.history.push(HistoryRecord::new(text.clone(), selection));

        if text_changed {
            self.emit(EditorEvent::Change {
                text: text.clone(),
                selection,
            });
        }

        if let Some(id) = self.options.id.clone() {
            if let Some(store) = self.backup.as_mut() {
                let mut record = BackupRecord::now(text.clone(), selection);
                record.url = self.backup_url.clone();
                match store.save(&id, &record) {
                    Ok(()) => self.emit(EditorEvent::Backup { text, selection }),
                    Err(err) => {
                        warn!("Failed to save backup for '{}': {}", id, err);
                        self.emit(EditorEvent::Error {
                            message: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Step back in history and restore that state to the surface.
    pub fn undo(&mut self) {
        let record = match self.history.back() {
            Some(record) => record.clone(),
            None => return,
        };
        self.restore(record);
    }

    /// Step forward in history and restore that state to the surface.
    pub fn redo(&mut self) {
        let record = match self.history.forward() {
            Some(record) => record.clone(),
            None => return,
        };
        self.restore(record);
    }

    /// Write a history record back to the surface without re-recording.
    fn restore(&mut self, record: HistoryRecord) {
        let text_changed = self.surface.text() != record.value;
        self.surface.set_text(&record.value);
        self.surface
            .set_selection(record.selection.0, record.selection.1);
        if text_changed {
            self.emit(EditorEvent::Change {
                text: record.value,
                selection: record.selection,
            });
        }
    }

    /// Check if an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of stored history records.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input Coalescing
    // ─────────────────────────────────────────────────────────────────────────

    /// Note a host input event (typing, selecting).
    ///
    /// Feeds the mention engine and arms the coalescing window; the
    /// state is recorded on the first [`tick`](Self::tick) past the
    /// window, so rapid keystrokes produce one history record while the
    /// last keystroke's state is always the one eventually pushed.
    pub fn notify_input(&mut self) {
        let caret = self.surface.selection().0;
        let update = self.mention.on_input(&self.surface.text(), caret);
        self.handle_mention_update(update);
        self.debouncer.touch(Instant::now());
    }

    /// Drive deferred work and the coalescing window.
    ///
    /// Hosts call this from their loop with the current instant. Runs
    /// any work deferred by the mention lifecycle, then performs the
    /// coalesced history push once the window has passed.
    pub fn tick(&mut self, now: Instant) {
        for task in self.deferred.drain() {
            match task {
                DeferredTask::EndMention { range } => {
                    if let Some(hotkeys) = self.hotkeys.as_mut() {
                        hotkeys.set_enabled(true);
                    }
                    self.emit(EditorEvent::MentionEnd { range });
                }
            }
        }

        if self.debouncer.fire(now) {
            self.push_history();
        }
    }

    /// Push any coalesced state immediately instead of waiting out the
    /// window.
    pub fn flush(&mut self) {
        if self.debouncer.flush() {
            self.push_history();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mentions
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle the mention trigger key.
    pub fn mention_trigger(&mut self) {
        let caret = self.surface.selection().0;
        let update = self.mention.trigger(&self.surface.text(), caret);
        self.handle_mention_update(update);
    }

    /// End the mention capture explicitly (Space/Escape/Enter).
    pub fn mention_end(&mut self) {
        let update = self.mention.end();
        self.handle_mention_update(update);
    }

    /// Whether a mention capture is in progress.
    pub fn mention_active(&self) -> bool {
        self.mention.is_active()
    }

    fn handle_mention_update(&mut self, update: MentionUpdate) {
        match update {
            MentionUpdate::None => {}
            MentionUpdate::Started { range } => {
                if let Some(hotkeys) = self.hotkeys.as_mut() {
                    hotkeys.set_enabled(false);
                }
                self.emit(EditorEvent::MentionStart { range });
            }
            MentionUpdate::Matched { keyword, range } => {
                self.emit(EditorEvent::MentionMatch { keyword, range });
            }
            MentionUpdate::Ended { range } => {
                // The ending key event must not re-enter hotkey dispatch
                self.deferred.defer(DeferredTask::EndMention { range });
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Image Paste
    // ─────────────────────────────────────────────────────────────────────────

    /// React to the host's image-paste resolver outcome.
    ///
    /// On success the image markdown is inserted at the selection; on
    /// failure the buffer stays untouched and the error is surfaced as
    /// an event.
    pub fn resolve_pasted_image(&mut self, outcome: Result<String>) {
        match outcome {
            Ok(url) => {
                let snippet = format!("![alt]({})", url);
                self.insert_with_mode(&snippet, InsertMode::CaretAfter);
            }
            Err(err) => {
                let err = Error::ImageResolve(err.to_string());
                self.emit(EditorEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    fn emit(&mut self, event: EditorEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink(event);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

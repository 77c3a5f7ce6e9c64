//! Backup persistence for markedit
//!
//! When an editor instance is configured with an id, every accepted
//! history push mirrors the `(buffer, selection)` state to a backup
//! store, and initialization compares the persisted backup against the
//! live buffer for crash recovery. The storage medium is host-defined;
//! this module ships a platform-config-dir JSON implementation and an
//! in-memory one.

use crate::error::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the backup directory.
const APP_NAME: &str = "markedit";

/// Suffix appended during atomic writes.
const TMP_SUFFIX: &str = ".tmp";

// ─────────────────────────────────────────────────────────────────────────────
// Backup Record
// ─────────────────────────────────────────────────────────────────────────────

/// The persisted shape of an editor backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// The full buffer text.
    pub value: String,
    /// Selection range (start, end) at save time.
    pub selection: (usize, usize),
    /// Host-supplied location context (e.g. a document URL), if any.
    #[serde(default)]
    pub url: Option<String>,
    /// Save time as milliseconds since the Unix epoch.
    #[serde(default)]
    pub time: u64,
}

impl BackupRecord {
    /// Create a record stamped with the current time.
    pub fn now(value: impl Into<String>, selection: (usize, usize)) -> Self {
        Self {
            value: value.into(),
            selection,
            url: None,
            time: unix_millis(),
        }
    }
}

/// Milliseconds since the Unix epoch; 0 if the clock is before it.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Backup Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A keyed store of backup records.
pub trait BackupStore {
    /// Load the backup for `id`, if one exists.
    fn load(&self, id: &str) -> Result<Option<BackupRecord>>;

    /// Save the backup for `id`, replacing any previous one.
    fn save(&mut self, id: &str, record: &BackupRecord) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File-Backed Store
// ─────────────────────────────────────────────────────────────────────────────

/// A backup store writing one JSON file per editor id under a root
/// directory, `~/.config/markedit/` by default on Linux.
///
/// Writes are atomic: the record lands in a temporary file first, which
/// then replaces the real one.
#[derive(Debug, Clone)]
pub struct FileBackupStore {
    root: PathBuf,
}

impl FileBackupStore {
    /// Create a store rooted at the platform config directory.
    pub fn new() -> Result<Self> {
        let root = dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(Error::BackupDirNotFound)?;
        Ok(Self { root })
    }

    /// Create a store rooted at an explicit directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the backup file for `id`.
    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_id(id)))
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            debug!("Creating backup directory: {}", self.root.display());
            fs::create_dir_all(&self.root).map_err(|e| Error::BackupSave {
                path: self.root.clone(),
                source: Box::new(e),
            })?;
        }
        Ok(())
    }
}

impl BackupStore for FileBackupStore {
    fn load(&self, id: &str) -> Result<Option<BackupRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            debug!("No backup at {}", path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| Error::BackupLoad {
            path: path.clone(),
            source: Box::new(e),
        })?;
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let record: BackupRecord =
            serde_json::from_str(&contents).map_err(|e| Error::BackupLoad {
                path: path.clone(),
                source: Box::new(e),
            })?;
        debug!("Loaded backup from {}", path.display());
        Ok(Some(record))
    }

    fn save(&mut self, id: &str, record: &BackupRecord) -> Result<()> {
        self.ensure_root()?;
        let path = self.record_path(id);
        let tmp_path = path.with_extension(format!("json{}", TMP_SUFFIX));

        let json = serde_json::to_string_pretty(record).map_err(|e| Error::BackupSave {
            path: path.clone(),
            source: Box::new(e),
        })?;

        // Write to the temporary file first (atomic write pattern)
        fs::write(&tmp_path, &json).map_err(|e| Error::BackupSave {
            path: tmp_path.clone(),
            source: Box::new(e),
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| Error::BackupSave {
            path: path.clone(),
            source: Box::new(e),
        })?;

        info!("Backup saved to {}", path.display());
        Ok(())
    }
}

/// Map an arbitrary editor id onto a safe file stem.
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Store
// ─────────────────────────────────────────────────────────────────────────────

/// A backup store backed by a map, for tests and ephemeral hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackupStore {
    records: HashMap<String, BackupRecord>,
}

impl MemoryBackupStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackupStore for MemoryBackupStore {
    fn load(&self, id: &str) -> Result<Option<BackupRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn save(&mut self, id: &str, record: &BackupRecord) -> Result<()> {
        self.records.insert(id.to_string(), record.clone());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_now_is_stamped() {
        let record = BackupRecord::now("text", (0, 4));
        assert!(record.time > 0);
        assert_eq!(record.url, None);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryBackupStore::new();
        let record = BackupRecord::now("draft", (5, 5));
        store.save("note-1", &record).unwrap();

        let loaded = store.load("note-1").unwrap();
        assert_eq!(loaded, Some(record));
        assert_eq!(store.load("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = FileBackupStore::with_root(dir.path());
        let record = BackupRecord {
            value: "# Notes\ncontent".to_string(),
            selection: (2, 7),
            url: Some("doc://notes".to_string()),
            time: 1234,
        };

        store.save("draft", &record).unwrap();
        let loaded = store.load("draft").unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[test]
    fn test_file_store_missing_id_is_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileBackupStore::with_root(dir.path());
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrites_previous() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = FileBackupStore::with_root(dir.path());

        store.save("d", &BackupRecord::now("v1", (0, 0))).unwrap();
        store.save("d", &BackupRecord::now("v2", (2, 2))).unwrap();

        let loaded = store.load("d").unwrap().expect("record");
        assert_eq!(loaded.value, "v2");
    }

    #[test]
    fn test_file_store_corrupted_record_errors() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileBackupStore::with_root(dir.path());
        std::fs::write(dir.path().join("bad.json"), "{ invalid json }").unwrap();

        assert!(matches!(
            store.load("bad"),
            Err(Error::BackupLoad { .. })
        ));
    }

    #[test]
    fn test_file_store_empty_record_is_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileBackupStore::with_root(dir.path());
        std::fs::write(dir.path().join("empty.json"), "  ").unwrap();
        assert_eq!(store.load("empty").unwrap(), None);
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("note-1_a"), "note-1_a");
        assert_eq!(sanitize_id("path/to doc"), "path_to_doc");
    }

    #[test]
    fn test_record_unknown_fields_ignored() {
        let json = r#"{"value": "v", "selection": [1, 2], "extra": true}"#;
        let record: BackupRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.value, "v");
        assert_eq!(record.selection, (1, 2));
        assert_eq!(record.time, 0);
    }
}

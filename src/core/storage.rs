//! # Document Persistence
//!
//! The editor persists one document under one well-known key. Where the
//! bytes go is behind [`KeyValueStore`]: a directory of JSON files for the
//! real app, an in-memory map for tests.
//!
//! ```text
//! <data_dir>/
//! └── blackboard-document.json   // Snapshot { version, saved_at, content }
//! ```
//!
//! File writes use atomic rename (write `.tmp`, then `rename()`).
//! Anything unreadable on load is logged and treated as "nothing stored".

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::document::Document;
use crate::core::error::EditorError;
use crate::core::markdown;

pub const STORAGE_KEY: &str = "blackboard-document";

/// Bumped when the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, EditorError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), EditorError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the store directory.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, EditorError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), EditorError> {
        atomic_write(&self.path(key), value)?;
        Ok(())
    }
}

/// Write `contents` to `path` via a sibling `.tmp` file and rename.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, EditorError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), EditorError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What was being edited: raw text or a block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum SnapshotContent {
    Text(String),
    Blocks(Document),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub content: SnapshotContent,
}

impl Snapshot {
    pub fn new(content: SnapshotContent) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            content,
        }
    }

    pub fn parse(json: &str) -> Result<Self, EditorError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| EditorError::MalformedStorage(e.to_string()))?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(EditorError::MalformedStorage(format!(
                "snapshot version {} is newer than supported {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(snapshot)
    }

    /// Content as raw text. Block documents come back in the Markdown layout
    /// with `☐`/`☑` checkboxes, so raw toggling and propagation keep working.
    pub fn into_text(self) -> String {
        match self.content {
            SnapshotContent::Text(text) => text,
            SnapshotContent::Blocks(doc) => markdown::editor_text(&doc),
        }
    }

    /// Content as a block document. Raw text is lifted line by line, with
    /// checkbox lines becoming checklist items.
    pub fn into_document(self) -> Document {
        match self.content {
            SnapshotContent::Text(text) => Document::from_editor_text(&text),
            SnapshotContent::Blocks(doc) => doc,
        }
    }
}

/// Read the stored snapshot. Missing, unreadable, or malformed data all
/// yield `None`; the latter two are logged.
pub fn load(store: &dyn KeyValueStore) -> Option<Snapshot> {
    let json = match store.get(STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            warn!("Could not read stored document: {}", e);
            return None;
        }
    };
    match Snapshot::parse(&json) {
        Ok(snapshot) => {
            debug!("Loaded snapshot saved at {}", snapshot.saved_at);
            Some(snapshot)
        }
        Err(e) => {
            warn!("Ignoring stored document: {}", e);
            None
        }
    }
}

pub fn save(store: &mut dyn KeyValueStore, content: SnapshotContent) -> Result<(), EditorError> {
    let json = serde_json::to_string_pretty(&Snapshot::new(content))
        .map_err(|e| EditorError::MalformedStorage(e.to_string()))?;
    store.set(STORAGE_KEY, &json)
}

//! Filesystem-backed document store.
//!
//! Documents live under `root` at their relative path. History is an
//! append-only JSON Lines file (`root/.history.jsonl`), one canonical record
//! per line. Writes go to a sibling temp file and are renamed into place, so
//! a reader never sees a partial document.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::check_path;
use crate::{Document, DocumentStore, HistoryRecord, StoreError, VersionTag};

const HISTORY_FILE: &str = ".history.jsonl";

pub struct FsDocumentStore {
    root: PathBuf,
    /// Serializes compare-and-swap within this process.
    write_lock: Mutex<()>,
}

impl FsDocumentStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root.display().to_string(), e))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        check_path(path)?;
        Ok(path.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg)))
    }

    fn read_content(&self, path: &str) -> Result<Option<String>, StoreError> {
        let full = self.resolve(path)?;
        match fs::read_to_string(&full) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn commit(&self, path: &str, content: &str, message: &str) -> Result<VersionTag, StoreError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(path, e))?;
        }

        let tmp = full.with_extension("tmp");
        fs::write(&tmp, content.as_bytes()).map_err(|e| StoreError::io(path, e))?;
        fs::rename(&tmp, &full).map_err(|e| StoreError::io(path, e))?;

        let version = VersionTag::of(content);
        self.append_history(&HistoryRecord {
            path: path.to_string(),
            message: message.to_string(),
            version: version.clone(),
            ts_utc: Utc::now(),
        })?;
        Ok(version)
    }

    fn append_history(&self, record: &HistoryRecord) -> Result<(), StoreError> {
        let line = canonical_json_line(record)?;
        let path = self.root.join(HISTORY_FILE);
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(HISTORY_FILE, e))?;
        f.write_all(line.as_bytes())
            .and_then(|_| f.write_all(b"\n"))
            .map_err(|e| StoreError::io(HISTORY_FILE, e))
    }
}

impl DocumentStore for FsDocumentStore {
    fn read(&self, path: &str) -> Result<Document, StoreError> {
        let content = self.read_content(path)?.ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        let doc = Document::new(content);
        debug!(path, version = %doc.version, "store read");
        Ok(doc)
    }

    fn write(&self, path: &str, content: &str, expected: &VersionTag, message: &str) -> Result<VersionTag, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.read_content(path)?.ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        let actual = VersionTag::of(&current);
        if &actual != expected {
            warn!(path, expected = %expected, actual = %actual, "store write conflict");
            return Err(StoreError::Conflict {
                path: path.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        let version = self.commit(path, content, message)?;
        info!(path, message, version = %version, "store write");
        Ok(version)
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<VersionTag, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.read_content(path)?.is_some() {
            return Err(StoreError::AlreadyExists {
                path: path.to_string(),
            });
        }
        let version = self.commit(path, content, message)?;
        info!(path, message, version = %version, "store create");
        Ok(version)
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        let full = self.resolve(dir)?;
        let mut names = Vec::new();
        for entry in fs::read_dir(&full).map_err(|e| StoreError::io(dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.ends_with(".tmp") {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let path = self.root.join(HISTORY_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(HISTORY_FILE, e)),
        };

        let mut out = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: HistoryRecord = serde_json::from_str(trimmed).map_err(|e| StoreError::Decode {
                path: format!("{HISTORY_FILE}:{}", i + 1),
                message: e.to_string(),
            })?;
            out.push(record);
        }
        Ok(out)
    }
}

/// Sorted keys, compact, one record per line.
fn canonical_json_line<T: serde::Serialize>(v: &T) -> Result<String, StoreError> {
    let raw = serde_json::to_value(v).map_err(|e| StoreError::Encode {
        message: e.to_string(),
    })?;
    serde_json::to_string(&sort_keys(&raw)).map_err(|e| StoreError::Encode {
        message: e.to_string(),
    })
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::document::check_path;
use crate::{Document, DocumentStore, HistoryRecord, StoreError, VersionTag};

#[derive(Debug, Default)]
struct State {
    docs: BTreeMap<String, String>,
    history: Vec<HistoryRecord>,
}

/// Process-local store; tests and single-process tooling.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<State>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without recording history.
    pub fn with_document(self, path: &str, content: impl Into<String>) -> Self {
        self.lock().docs.insert(path.to_string(), content.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation is a single insert/push.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn commit(state: &mut State, path: &str, content: &str, message: &str) -> VersionTag {
    let version = VersionTag::of(content);
    state.docs.insert(path.to_string(), content.to_string());
    state.history.push(HistoryRecord {
        path: path.to_string(),
        message: message.to_string(),
        version: version.clone(),
        ts_utc: Utc::now(),
    });
    version
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self, path: &str) -> Result<Document, StoreError> {
        check_path(path)?;
        let state = self.lock();
        let content = state.docs.get(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        let doc = Document::new(content.clone());
        debug!(path, version = %doc.version, "store read");
        Ok(doc)
    }

    fn write(&self, path: &str, content: &str, expected: &VersionTag, message: &str) -> Result<VersionTag, StoreError> {
        check_path(path)?;
        let mut state = self.lock();
        let current = state.docs.get(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        let actual = VersionTag::of(current);
        if &actual != expected {
            warn!(path, expected = %expected, actual = %actual, "store write conflict");
            return Err(StoreError::Conflict {
                path: path.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        let version = commit(&mut state, path, content, message);
        info!(path, message, version = %version, "store write");
        Ok(version)
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<VersionTag, StoreError> {
        check_path(path)?;
        let mut state = self.lock();
        if state.docs.contains_key(path) {
            return Err(StoreError::AlreadyExists {
                path: path.to_string(),
            });
        }
        let version = commit(&mut state, path, content, message);
        info!(path, message, version = %version, "store create");
        Ok(version)
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        check_path(dir)?;
        let prefix = format!("{dir}/");
        let state = self.lock();
        let names: BTreeSet<String> = state
            .docs
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(StoreError::NotFound {
                path: dir.to_string(),
            });
        }
        Ok(names.into_iter().collect())
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self.lock().history.clone())
    }
}

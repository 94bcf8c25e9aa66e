use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::StoreError;

// ---------------------------------------------------------------------------
// Version tag
// ---------------------------------------------------------------------------

/// Content hash of a stored document (SHA-256, lowercase hex).
///
/// Two reads return the same tag iff the bytes are identical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn of(content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document content plus the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub version: VersionTag,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let version = VersionTag::of(&content);
        Self { content, version }
    }
}

/// One committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub path: String,
    pub message: String,
    pub version: VersionTag,
    pub ts_utc: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Path-keyed document store with compare-and-swap writes.
///
/// Paths are relative, `/`-separated (`data/season/S1/2024-01-01.json`).
pub trait DocumentStore: Send + Sync {
    fn read(&self, path: &str) -> Result<Document, StoreError>;

    /// Replace `path` if its current version equals `expected`.
    fn write(&self, path: &str, content: &str, expected: &VersionTag, message: &str) -> Result<VersionTag, StoreError>;

    /// Create `path`; fails with [`StoreError::AlreadyExists`] if present.
    fn create(&self, path: &str, content: &str, message: &str) -> Result<VersionTag, StoreError>;

    /// Names of the direct children of `dir`, sorted.
    fn list(&self, dir: &str) -> Result<Vec<String>, StoreError>;

    /// Every committed change, oldest first.
    fn history(&self) -> Result<Vec<HistoryRecord>, StoreError>;

    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        match self.read(path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Reject paths a store must not resolve.
pub(crate) fn check_path(path: &str) -> Result<(), StoreError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

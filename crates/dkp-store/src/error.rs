use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound {
        path: String,
    },
    AlreadyExists {
        path: String,
    },
    /// The document changed since `expected` was read. Re-read and retry.
    Conflict {
        path: String,
        expected: String,
        actual: String,
    },
    /// Empty, absolute or parent-escaping path.
    InvalidPath {
        path: String,
    },
    Io {
        path: String,
        message: String,
    },
    Decode {
        path: String,
        message: String,
    },
    Encode {
        message: String,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    pub(crate) fn io(path: &str, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_string(),
            }
        } else {
            StoreError::Io {
                path: path.to_string(),
                message: e.to_string(),
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { path } => write!(f, "document not found: {path}"),
            StoreError::AlreadyExists { path } => write!(f, "document already exists: {path}"),
            StoreError::Conflict {
                path,
                expected,
                actual,
            } => write!(
                f,
                "stale version for {path}: expected {expected}, store has {actual}"
            ),
            StoreError::InvalidPath { path } => write!(f, "invalid document path: {path:?}"),
            StoreError::Io { path, message } => write!(f, "io error on {path}: {message}"),
            StoreError::Decode { path, message } => write!(f, "cannot decode {path}: {message}"),
            StoreError::Encode { message } => write!(f, "cannot encode document: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

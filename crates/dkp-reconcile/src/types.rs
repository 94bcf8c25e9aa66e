use std::fmt;

use dkp_schemas::{FixField, NoteError, RawLootEntry, ValidationError};

// ---------------------------------------------------------------------------
// Merge evidence
// ---------------------------------------------------------------------------

/// Incoming entry dropped because its id is already stored, with one field
/// where the upload disagrees with history.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReconcileDiff {
    pub id: String,
    /// Export field name (`player`, `note`, ...).
    pub field: String,
    pub stored: String,
    pub incoming: String,
}

/// Full merge result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReport {
    /// Stored entries in their order, then appended ones in upload order.
    pub merged: Vec<RawLootEntry>,
    /// Ids appended by this merge, upload order.
    pub appended: Vec<String>,
    /// Ids dropped because they were already stored (upload order).
    pub already_stored: Vec<String>,
    /// Field-level disagreements of dropped entries (sorted).
    pub diffs: Vec<ReconcileDiff>,
}

impl MergeReport {
    /// Nothing new: writing `merged` back would not change the document.
    pub fn is_noop(&self) -> bool {
        self.appended.is_empty()
    }

    /// Some re-uploaded entry disagrees with the stored one.
    pub fn has_drift(&self) -> bool {
        !self.diffs.is_empty()
    }
}

/// One field changed by a fix (before/after), for previews and audit messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldChange {
    pub id: String,
    pub field: FixField,
    pub before: String,
    pub after: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} \"{}\" -> \"{}\"",
            self.id, self.field, self.before, self.after
        )
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fix application failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FixError {
    /// No stored entry carries the fix's id.
    EntryNotFound { id: String },
}

impl fmt::Display for FixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixError::EntryNotFound { id } => {
                write!(f, "fix references unknown loot entry id \"{id}\"")
            }
        }
    }
}

impl std::error::Error for FixError {}

/// Import gate rejections, in the order the gate checks them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportError {
    EmptyBatch,
    DuplicateId {
        id: String,
    },
    DateMismatch {
        id: String,
        expected: String,
        found: String,
    },
    /// Raw `date` or `time` does not parse.
    InvalidTimestamp {
        id: String,
        problem: ValidationError,
    },
    MissingResponse {
        id: String,
        character: String,
    },
    MissingBidNote {
        id: String,
        character: String,
    },
    UnknownCharacter {
        id: String,
        character: String,
    },
    InvalidNote {
        id: String,
        note: String,
        problem: NoteError,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::EmptyBatch => write!(f, "empty loot log"),
            ImportError::DuplicateId { id } => write!(f, "duplicate id found: \"{id}\""),
            ImportError::DateMismatch {
                id,
                expected,
                found,
            } => write!(
                f,
                "dates differ from each other: entry \"{id}\" has {found}, expected {expected}"
            ),
            ImportError::InvalidTimestamp { id, problem } => write!(f, "{problem} (id=\"{id}\")"),
            ImportError::MissingResponse { id, character } => {
                write!(f, "response is empty (id=\"{id}\", character={character})")
            }
            ImportError::MissingBidNote { id, character } => write!(
                f,
                "response is \"{}\" but note is empty (id=\"{id}\", character={character})",
                dkp_schemas::BID_RESPONSE
            ),
            ImportError::UnknownCharacter { character, .. } => {
                write!(f, "unknown character: {character}")
            }
            ImportError::InvalidNote { id, note, problem } => {
                write!(f, "{problem}, but was: \"{note}\" (id=\"{id}\")")
            }
        }
    }
}

impl std::error::Error for ImportError {}

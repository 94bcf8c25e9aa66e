use std::fmt;

// ---------------------------------------------------------------------------
// Note rule
// ---------------------------------------------------------------------------

/// Why a non-blank bid note was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteError {
    /// Not made of ASCII digits only (signs, spaces, letters).
    NotInteger,
    /// Parses to zero.
    NotPositive,
    /// Positive but not a multiple of 10.
    NotMultipleOfTen,
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::NotInteger => write!(f, "note must be a parsable integer"),
            NoteError::NotPositive => write!(f, "note must be a positive value"),
            NoteError::NotMultipleOfTen => {
                write!(f, "note must be a multiple of 10 (e.g. 10, 20, ...)")
            }
        }
    }
}

impl std::error::Error for NoteError {}

// ---------------------------------------------------------------------------
// Construction-time validation
// ---------------------------------------------------------------------------

/// Structural validation failures raised when building domain values.
///
/// Loot variants carry the offending entry id and timestamp so a message can
/// point an admin at the exact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidNote {
        id: String,
        timestamp: String,
        note: String,
        problem: NoteError,
    },
    EmptyField {
        id: String,
        timestamp: String,
        field: &'static str,
    },
    InvalidDate {
        raw: String,
    },
    InvalidTime {
        raw: String,
    },
    DuplicatePlayerName {
        name: String,
    },
    CharacterClaimedTwice {
        character: String,
        first: String,
        second: String,
    },
    UnknownFixField {
        name: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidNote {
                id,
                timestamp,
                note,
                problem,
            } => write!(
                f,
                "invalid note for entry (id=\"{id}\", timestamp=\"{timestamp}\"): {problem}, but was: \"{note}\""
            ),
            ValidationError::EmptyField {
                id,
                timestamp,
                field,
            } => write!(
                f,
                "{field} must not be empty (id=\"{id}\", timestamp=\"{timestamp}\")"
            ),
            ValidationError::InvalidDate { raw } => {
                write!(f, "invalid date: \"{raw}\"")
            }
            ValidationError::InvalidTime { raw } => {
                write!(f, "invalid time: \"{raw}\"")
            }
            ValidationError::DuplicatePlayerName { name } => {
                write!(f, "duplicate player name: {name}")
            }
            ValidationError::CharacterClaimedTwice {
                character,
                first,
                second,
            } => write!(
                f,
                "character {character} belongs to both {first} and {second}"
            ),
            ValidationError::UnknownFixField { name } => write!(
                f,
                "unknown fix field \"{name}\" (expected one of: character, note, response)"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

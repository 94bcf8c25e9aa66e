use std::fmt;

use chrono::NaiveDate;

use dkp_ledger::BalanceError;
use dkp_loot::NormalizeError;
use dkp_reconcile::{FixError, ImportError};
use dkp_report::ReportError;
use dkp_schemas::ValidationError;
use dkp_store::StoreError;

/// Every failure a service call can report.
///
/// Classified for the caller:
/// - [`is_validation`](Self::is_validation): reject and show the message
/// - [`is_not_found`](Self::is_not_found): show the message
/// - [`is_conflict`](Self::is_conflict): re-read and retry; never retried here
/// - [`is_contract_violation`](Self::is_contract_violation): an invariant was
///   already broken upstream
#[derive(Debug)]
pub enum DkpError {
    /// Uploaded batch rejected by the import gate.
    Import(ImportError),
    Validation(ValidationError),
    Fix(FixError),
    /// A patched entry would no longer pass the import gate.
    FixContent(ImportError),
    Normalize(NormalizeError),
    Balance(BalanceError),
    Store(StoreError),
    Report(ReportError),
    Config(anyhow::Error),

    NoSeasons,
    NoSeasonFor { raid_day: NaiveDate },
    UnknownSeason { name: String },
    UnknownPlayer { name: String },
    LootLogNotFound { season: String, raid_day: NaiveDate },
    BlankName { what: &'static str },
    BlankFixReason,
    PlayerNameTaken { name: String },
    CharacterTaken { character: String, owner: String },
    /// Deleting would orphan attendance records.
    PlayerHasAttendance { name: String, raids: usize },
    SeasonNameTaken { name: String },
    /// An admin view with open validations cannot register a raid.
    AdminViewInvalid { validations: Vec<String> },
}

impl DkpError {
    pub fn is_validation(&self) -> bool {
        match self {
            DkpError::Import(_)
            | DkpError::FixContent(_)
            | DkpError::BlankName { .. }
            | DkpError::BlankFixReason
            | DkpError::PlayerNameTaken { .. }
            | DkpError::CharacterTaken { .. }
            | DkpError::PlayerHasAttendance { .. }
            | DkpError::SeasonNameTaken { .. }
            | DkpError::AdminViewInvalid { .. } => true,
            DkpError::Validation(e) => !matches!(e, ValidationError::UnknownFixField { .. }),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            DkpError::Fix(FixError::EntryNotFound { .. })
            | DkpError::NoSeasons
            | DkpError::NoSeasonFor { .. }
            | DkpError::UnknownSeason { .. }
            | DkpError::UnknownPlayer { .. }
            | DkpError::LootLogNotFound { .. } => true,
            DkpError::Store(e) => e.is_not_found(),
            DkpError::Report(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Stale version on write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DkpError::Store(e) if e.is_conflict())
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            DkpError::Validation(ValidationError::UnknownFixField { .. })
                | DkpError::Normalize(_)
                | DkpError::Balance(_)
        )
    }
}

impl fmt::Display for DkpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DkpError::Import(e) => write!(f, "import rejected: {e}"),
            DkpError::Validation(e) => write!(f, "{e}"),
            DkpError::Fix(e) => write!(f, "fix rejected: {e}"),
            DkpError::FixContent(e) => write!(f, "fix rejected: {e}"),
            DkpError::Normalize(e) => write!(f, "stored loot does not normalize: {e}"),
            DkpError::Balance(e) => write!(f, "balance: {e}"),
            DkpError::Store(e) => write!(f, "store: {e}"),
            DkpError::Report(e) => write!(f, "report: {e}"),
            DkpError::Config(e) => write!(f, "config: {e:#}"),
            DkpError::NoSeasons => write!(f, "no season is configured"),
            DkpError::NoSeasonFor { raid_day } => write!(f, "no season covers raid day {raid_day}"),
            DkpError::UnknownSeason { name } => write!(f, "unknown season: {name}"),
            DkpError::UnknownPlayer { name } => write!(f, "unknown player: {name}"),
            DkpError::LootLogNotFound { season, raid_day } => {
                write!(f, "no loot log for {raid_day} in season {season}")
            }
            DkpError::BlankName { what } => write!(f, "{what} must not be blank"),
            DkpError::BlankFixReason => write!(f, "a fix needs a reason"),
            DkpError::PlayerNameTaken { name } => write!(f, "player already exists: {name}"),
            DkpError::CharacterTaken { character, owner } => {
                write!(f, "character {character} already belongs to {owner}")
            }
            DkpError::PlayerHasAttendance { name, raids } => {
                write!(f, "player {name} attended {raids} raid(s) and cannot be deleted")
            }
            DkpError::SeasonNameTaken { name } => write!(f, "season already exists: {name}"),
            DkpError::AdminViewInvalid { validations } => {
                write!(f, "admin view has open validations: {}", validations.join("; "))
            }
        }
    }
}

impl std::error::Error for DkpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DkpError::Import(e) => Some(e),
            DkpError::Validation(e) => Some(e),
            DkpError::Fix(e) => Some(e),
            DkpError::FixContent(e) => Some(e),
            DkpError::Normalize(e) => Some(e),
            DkpError::Balance(e) => Some(e),
            DkpError::Store(e) => Some(e),
            DkpError::Report(e) => Some(e),
            DkpError::Config(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<ImportError> for DkpError {
    fn from(e: ImportError) -> Self {
        DkpError::Import(e)
    }
}

impl From<ValidationError> for DkpError {
    fn from(e: ValidationError) -> Self {
        DkpError::Validation(e)
    }
}

impl From<FixError> for DkpError {
    fn from(e: FixError) -> Self {
        DkpError::Fix(e)
    }
}

impl From<NormalizeError> for DkpError {
    fn from(e: NormalizeError) -> Self {
        DkpError::Normalize(e)
    }
}

impl From<BalanceError> for DkpError {
    fn from(e: BalanceError) -> Self {
        DkpError::Balance(e)
    }
}

impl From<StoreError> for DkpError {
    fn from(e: StoreError) -> Self {
        DkpError::Store(e)
    }
}

impl From<ReportError> for DkpError {
    fn from(e: ReportError) -> Self {
        DkpError::Report(e)
    }
}

impl From<anyhow::Error> for DkpError {
    fn from(e: anyhow::Error) -> Self {
        DkpError::Config(e)
    }
}

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// Who took part in a reported raid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendance {
    /// UTC date the report started.
    pub date: NaiveDate,
    pub report_url: String,
    /// `"name-server"`, distinct and sorted.
    pub characters: Vec<String>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Network or transport failure.
    Transport(String),
    /// The service answered with an application-level error.
    Api { message: String },
    /// No report exists under this id.
    NotFound { report_id: String },
    /// A payload could not be decoded.
    Decode(String),
    /// Credentials or endpoint missing.
    Config(String),
}

impl ReportError {
    /// Failures a user can fix by entering a different report id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReportError::NotFound { .. })
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Transport(msg) => write!(f, "report transport error: {msg}"),
            ReportError::Api { message } => write!(f, "report api error: {message}"),
            ReportError::NotFound { report_id } => write!(f, "report not found: {report_id}"),
            ReportError::Decode(msg) => write!(f, "report decode error: {msg}"),
            ReportError::Config(msg) => write!(f, "report config error: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// External report service contract.
///
/// Object-safe and `Send + Sync` so a service can hold an
/// `Arc<dyn ReportSource>`.
pub trait ReportSource: Send + Sync {
    /// Short name for logs (e.g. `"warcraftlogs"`).
    fn name(&self) -> &'static str;

    fn fetch_attendance(&self, report_id: &str) -> Result<Attendance, ReportError>;
}

//! dkp-report
//!
//! Boundary to the external combat-log report service, used to pre-fill a
//! raid's attendance.
//!
//! This crate owns the [`ReportSource`] trait and the decoding of the
//! service's report payload. Transport and authentication are left to
//! implementors; nothing here performs IO.

mod payload;
mod source;

pub use payload::{parse_report, ATTENDANCE_QUERY, DEFAULT_REPORT_URL_BASE};
pub use source::{Attendance, ReportError, ReportSource};

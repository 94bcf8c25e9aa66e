//! Date codecs between the loot addon export and canonical ISO forms.
//!
//! The addon writes `date` as `d/m/yy` (e.g. `31/1/24`, no zero padding) and
//! `time` as `HH:MM:SS`. Everything stored or displayed by this workspace
//! uses ISO dates and the sortable `YYYY-MM-DD HH:MM:SS` timestamp form.

use chrono::{NaiveDate, NaiveDateTime};

use crate::ValidationError;

/// Raw export date format (`1/1/24`).
pub const RAW_DATE_FORMAT: &str = "%d/%m/%y";
/// Raw export date format without padding, used when writing.
const RAW_DATE_WRITE_FORMAT: &str = "%-d/%-m/%y";
/// ISO date format (`2024-01-01`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical, lexicographically sortable timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `1/1/24` -> `2024-01-01`. Zero-padded input (`01/01/24`) is accepted too.
pub fn to_iso_date(raw_date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw_date.trim(), RAW_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            raw: raw_date.to_string(),
        }
    })
}

/// `2024-12-01` -> `1/12/24`.
pub fn to_raw_date(date: NaiveDate) -> String {
    date.format(RAW_DATE_WRITE_FORMAT).to_string()
}

/// Parse an ISO date (`2024-01-01`).
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate { raw: s.to_string() })
}

/// Combine raw `date` and `time` fields into one timestamp.
pub fn combine_raw_timestamp(raw_date: &str, raw_time: &str) -> Result<NaiveDateTime, ValidationError> {
    let date = to_iso_date(raw_date)?;
    let time = chrono::NaiveTime::parse_from_str(raw_time.trim(), "%H:%M:%S").map_err(|_| {
        ValidationError::InvalidTime {
            raw: raw_time.to_string(),
        }
    })?;
    Ok(date.and_time(time))
}

/// Render a timestamp in canonical form.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

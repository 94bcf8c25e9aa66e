//! Report service payload decoding.

use std::collections::BTreeSet;

use chrono::DateTime;
use serde::Deserialize;

use crate::{Attendance, ReportError};

/// Public report pages are `{base}{report_id}`.
pub const DEFAULT_REPORT_URL_BASE: &str = "https://www.warcraftlogs.com/reports/";

/// GraphQL query whose response [`parse_report`] decodes. Takes `$code`.
///
/// Only encounter fights are requested, so trash and key runs do not count
/// towards attendance.
pub const ATTENDANCE_QUERY: &str = r#"query($code: String) {
    reportData {
        report(code: $code) {
            code
            title
            startTime
            fights(translate: true, killType: Encounters) {
                id
                name
                difficulty
                friendlyPlayers
            }
            masterData {
                actors(type: "Player") {
                    id
                    name
                    server
                }
            }
        }
    }
}"#;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    report_data: Option<ReportData>,
}

#[derive(Debug, Deserialize)]
struct ReportData {
    report: Option<Report>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    /// Epoch millis.
    start_time: f64,
    #[serde(default)]
    fights: Vec<Fight>,
    master_data: Option<MasterData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fight {
    #[serde(default)]
    friendly_players: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct MasterData {
    #[serde(default)]
    actors: Vec<Actor>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    id: i64,
    name: String,
    #[serde(default)]
    server: Option<String>,
}

impl Actor {
    fn character(&self) -> String {
        match self.server.as_deref() {
            Some(server) if !server.is_empty() => format!("{}-{}", self.name, server),
            _ => self.name.clone(),
        }
    }
}

/// Decode a report response into [`Attendance`].
///
/// A character counts when its actor id appears in any fight's friendly
/// players.
pub fn parse_report(report_id: &str, payload: &serde_json::Value, url_base: &str) -> Result<Attendance, ReportError> {
    let envelope = Envelope::deserialize(payload).map_err(|e| ReportError::Decode(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let message = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ReportError::Api { message });
    }

    let report = envelope
        .data
        .and_then(|d| d.report_data)
        .and_then(|r| r.report)
        .ok_or_else(|| ReportError::NotFound {
            report_id: report_id.to_string(),
        })?;

    let date = DateTime::from_timestamp_millis(report.start_time.round() as i64)
        .ok_or_else(|| ReportError::Decode(format!("startTime out of range: {}", report.start_time)))?
        .date_naive();

    let present: BTreeSet<i64> = report
        .fights
        .iter()
        .flat_map(|f| f.friendly_players.iter().copied())
        .collect();

    let characters: BTreeSet<String> = report
        .master_data
        .map(|m| m.actors)
        .unwrap_or_default()
        .iter()
        .filter(|a| present.contains(&a.id))
        .map(Actor::character)
        .collect();

    Ok(Attendance {
        date,
        report_url: format!("{url_base}{report_id}"),
        characters: characters.into_iter().collect(),
    })
}

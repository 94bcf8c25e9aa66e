//! Scenario: report payloads decode into raid attendance
//!
//! Date is the UTC day of `startTime`, characters are the actors appearing
//! in any fight, rendered `name-server`, distinct and sorted.

use chrono::NaiveDate;
use dkp_report::{parse_report, ReportError, DEFAULT_REPORT_URL_BASE};
use serde_json::json;

fn payload() -> serde_json::Value {
    json!({
        "data": {
            "reportData": {
                "report": {
                    "code": "aBcD1234",
                    "title": "Amirdrassil HC",
                    // 2024-01-31 23:30:00 UTC
                    "startTime": 1_706_743_800_000_i64,
                    "fights": [
                        { "id": 1, "name": "Gnarlroot", "difficulty": 4, "friendlyPlayers": [2, 1] },
                        { "id": 2, "name": "Fyrakk", "difficulty": 4, "friendlyPlayers": [1, 3] }
                    ],
                    "masterData": {
                        "actors": [
                            { "id": 1, "name": "Zelma", "server": "Blackrock" },
                            { "id": 2, "name": "Moppi", "server": "Blackrock" },
                            { "id": 3, "name": "Moppi", "server": "Antonidas" },
                            { "id": 4, "name": "Benched", "server": "Blackrock" }
                        ]
                    }
                }
            }
        }
    })
}

#[test]
fn scenario_attendance_from_fights() {
    let att = parse_report("aBcD1234", &payload(), DEFAULT_REPORT_URL_BASE).unwrap();
    assert_eq!(att.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    assert_eq!(att.report_url, "https://www.warcraftlogs.com/reports/aBcD1234");
    assert_eq!(
        att.characters,
        vec![
            "Moppi-Antonidas".to_string(),
            "Moppi-Blackrock".to_string(),
            "Zelma-Blackrock".to_string()
        ],
        "actors outside every fight are not attendees"
    );
}

#[test]
fn scenario_missing_report_is_not_found() {
    let body = json!({ "data": { "reportData": { "report": null } } });
    let err = parse_report("nope", &body, DEFAULT_REPORT_URL_BASE).unwrap_err();
    assert_eq!(
        err,
        ReportError::NotFound {
            report_id: "nope".to_string()
        }
    );
}

#[test]
fn scenario_service_errors_are_api_errors() {
    let body = json!({
        "data": null,
        "errors": [ { "message": "This report does not exist." }, { "message": "second" } ]
    });
    let err = parse_report("x", &body, DEFAULT_REPORT_URL_BASE).unwrap_err();
    assert_eq!(
        err,
        ReportError::Api {
            message: "This report does not exist.; second".to_string()
        }
    );
}

#[test]
fn scenario_malformed_payload_is_decode_error() {
    let body = json!({ "data": { "reportData": { "report": { "startTime": "yesterday" } } } });
    assert!(matches!(
        parse_report("x", &body, DEFAULT_REPORT_URL_BASE),
        Err(ReportError::Decode(_))
    ));
}

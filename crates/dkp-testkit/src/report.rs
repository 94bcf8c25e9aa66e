//! Report source answering from a script instead of the network.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use dkp_report::{Attendance, ReportError, ReportSource, DEFAULT_REPORT_URL_BASE};

#[derive(Debug, Default)]
struct Script {
    answers: BTreeMap<String, Result<Attendance, ReportError>>,
    calls: Vec<String>,
}

/// Unscripted report ids answer `NotFound`. Every call is recorded.
#[derive(Debug, Default)]
pub struct ScriptedReportSource {
    script: Mutex<Script>,
}

impl ScriptedReportSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer `report_id` with these characters on `date`.
    pub fn with_report(self, report_id: &str, date: NaiveDate, characters: &[&str]) -> Self {
        let mut characters: Vec<String> = characters.iter().map(|c| c.to_string()).collect();
        characters.sort();
        characters.dedup();
        let attendance = Attendance {
            date,
            report_url: format!("{DEFAULT_REPORT_URL_BASE}{report_id}"),
            characters,
        };
        self.lock().answers.insert(report_id.to_string(), Ok(attendance));
        self
    }

    /// Answer `report_id` with an error.
    pub fn with_failure(self, report_id: &str, error: ReportError) -> Self {
        self.lock().answers.insert(report_id.to_string(), Err(error));
        self
    }

    /// Report ids asked for so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }
}

impl ReportSource for ScriptedReportSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn fetch_attendance(&self, report_id: &str) -> Result<Attendance, ReportError> {
        let mut script = self.lock();
        script.calls.push(report_id.to_string());
        script
            .answers
            .get(report_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(ReportError::NotFound {
                    report_id: report_id.to_string(),
                })
            })
    }
}

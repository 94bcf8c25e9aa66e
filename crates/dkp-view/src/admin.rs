use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use dkp_reconcile::unknown_characters;
use dkp_report::Attendance;
use dkp_schemas::{Raid, Roster};

/// Raid registration page for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminView {
    pub report_id: String,
    pub date: NaiveDate,
    pub report_url: String,
    /// Players owning at least one attending character, sorted, distinct.
    /// Empty when `validations` is not.
    pub player_list: Vec<String>,
    pub validations: Vec<String>,
}

impl AdminView {
    pub fn is_valid(&self) -> bool {
        self.validations.is_empty()
    }

    /// The raid this view would register; `None` while validations remain.
    pub fn to_raid(&self, id: u32) -> Option<Raid> {
        if !self.is_valid() {
            return None;
        }
        Some(Raid::new(
            id,
            self.date,
            self.report_id.as_str(),
            self.player_list.iter().cloned(),
        ))
    }
}

pub fn assemble_admin_view(report_id: &str, attendance: &Attendance, roster: &Roster) -> AdminView {
    let validations: Vec<String> =
        unknown_characters(roster, attendance.characters.iter().map(String::as_str))
            .into_iter()
            .map(|c| format!("unknown character: {c}"))
            .collect();

    let player_list = if validations.is_empty() {
        attendance
            .characters
            .iter()
            .filter_map(|c| roster.player_for_character(c))
            .map(|p| p.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        Vec::new()
    };

    AdminView {
        report_id: report_id.to_string(),
        date: attendance.date,
        report_url: attendance.report_url.clone(),
        player_list,
        validations,
    }
}

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raid evening. The date is the raid-day key for its loot log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raid {
    pub id: u32,
    pub date: NaiveDate,
    /// External combat-log report reference; empty until set.
    #[serde(default)]
    pub report_id: String,
    /// Player names present for the full raid.
    #[serde(alias = "player", default)]
    pub attendees: BTreeSet<String>,
}

impl Raid {
    pub fn new<I, S>(id: u32, date: NaiveDate, report_id: impl Into<String>, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            date,
            report_id: report_id.into(),
            attendees: attendees.into_iter().map(Into::into).collect(),
        }
    }

    /// Missing report reference or attendance.
    pub fn is_incomplete(&self) -> bool {
        self.report_id.trim().is_empty() || self.attendees.is_empty()
    }

    pub fn attended_by(&self, player_name: &str) -> bool {
        self.attendees.contains(player_name)
    }

    /// `None` while no report is attached.
    pub fn report_url(&self, url_base: &str) -> Option<String> {
        if self.report_id.trim().is_empty() {
            None
        } else {
            Some(format!("{url_base}{}", self.report_id))
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Raid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: u32,
    pub name: String,
    #[serde(alias = "descr", alias = "desc", default)]
    pub description: String,
    #[serde(alias = "start")]
    pub start_date: NaiveDate,
}

impl Season {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            start_date,
        }
    }
}

/// Seasons ordered by start date.
///
/// A season runs from its `start_date` (inclusive) to the next season's
/// `start_date` (exclusive); the most recent season is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeasonCalendar {
    seasons: Vec<Season>,
}

impl SeasonCalendar {
    pub fn new(mut seasons: Vec<Season>) -> Self {
        seasons.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Self { seasons }
    }

    /// Oldest first.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Newest first, i.e. starting with the current season.
    pub fn latest_first(&self) -> Vec<&Season> {
        self.seasons.iter().rev().collect()
    }

    pub fn by_id(&self, id: u32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.name == name)
    }

    /// The season with the latest `start_date <= date`.
    pub fn season_for(&self, date: NaiveDate) -> Option<&Season> {
        self.seasons
            .iter()
            .rev()
            .find(|s| s.start_date <= date)
    }

    /// Start date of the chronologically next season, `None` if open-ended.
    pub fn end_of(&self, season: &Season) -> Option<NaiveDate> {
        self.seasons
            .iter()
            .map(|s| s.start_date)
            .find(|start| *start > season.start_date)
    }

    pub fn contains(&self, season: &Season, date: NaiveDate) -> bool {
        date >= season.start_date && self.end_of(season).map_or(true, |end| date < end)
    }

    /// Raids whose date falls inside `season`, in input order.
    pub fn raids_in(&self, season: &Season, raids: &[Raid]) -> Vec<Raid> {
        raids
            .iter()
            .filter(|r| self.contains(season, r.date))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> SeasonCalendar {
        // deliberately unsorted
        SeasonCalendar::new(vec![
            Season::new(2, "tww-s1", "The War Within S1", ymd(2024, 9, 10)),
            Season::new(1, "df-s4", "Dragonflight S4", ymd(2024, 4, 23)),
            Season::new(3, "tww-s2", "The War Within S2", ymd(2025, 3, 4)),
        ])
    }

    #[test]
    fn season_for_picks_latest_start_not_after_date() {
        let c = calendar();
        assert_eq!(c.season_for(ymd(2024, 4, 23)).unwrap().name, "df-s4");
        assert_eq!(c.season_for(ymd(2024, 9, 9)).unwrap().name, "df-s4");
        assert_eq!(c.season_for(ymd(2024, 9, 10)).unwrap().name, "tww-s1");
        assert_eq!(c.season_for(ymd(2030, 1, 1)).unwrap().name, "tww-s2");
        assert!(c.season_for(ymd(2020, 1, 1)).is_none());
    }

    #[test]
    fn end_is_next_start_or_open() {
        let c = calendar();
        let s1 = c.by_name("tww-s1").unwrap();
        assert_eq!(c.end_of(s1), Some(ymd(2025, 3, 4)));
        let s2 = c.by_name("tww-s2").unwrap();
        assert_eq!(c.end_of(s2), None);
    }

    #[test]
    fn latest_first_starts_with_current() {
        let cal = calendar();
        let names: Vec<&str> = cal
            .latest_first()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["tww-s2", "tww-s1", "df-s4"]);
    }

    #[test]
    fn raids_are_split_by_season_boundary() {
        let c = calendar();
        let raids = vec![
            Raid::new(1, ymd(2024, 9, 9), "a", ["Olli"]),
            Raid::new(2, ymd(2024, 9, 10), "b", ["Olli"]),
            Raid::new(3, ymd(2025, 3, 4), "c", ["Olli"]),
        ];
        let s1 = c.by_name("tww-s1").unwrap();
        let ids: Vec<u32> = c.raids_in(s1, &raids).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }
}

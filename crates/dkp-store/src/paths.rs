use chrono::NaiveDate;

use dkp_schemas::date::ISO_DATE_FORMAT;

pub const DEFAULT_DATA_DIR: &str = "data";
const LOOT_LOG_EXTENSION: &str = ".json";

/// Where each collection lives inside a store.
///
/// ```text
/// {data_dir}/player.json
/// {data_dir}/raid.json
/// {data_dir}/season.json
/// {data_dir}/season/{season_name}/{YYYY-MM-DD}.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    data_dir: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoreLayout {
    pub fn new(data_dir: impl Into<String>) -> Self {
        let data_dir: String = data_dir.into();
        Self {
            data_dir: data_dir.trim_end_matches('/').to_string(),
        }
    }

    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }

    pub fn player_file(&self) -> String {
        format!("{}/player.json", self.data_dir)
    }

    pub fn raid_file(&self) -> String {
        format!("{}/raid.json", self.data_dir)
    }

    pub fn season_file(&self) -> String {
        format!("{}/season.json", self.data_dir)
    }

    pub fn season_dir(&self, season_name: &str) -> String {
        format!("{}/season/{season_name}", self.data_dir)
    }

    pub fn loot_log_file(&self, season_name: &str, raid_day: NaiveDate) -> String {
        format!(
            "{}/{}{LOOT_LOG_EXTENSION}",
            self.season_dir(season_name),
            raid_day.format(ISO_DATE_FORMAT)
        )
    }

    /// `2024-01-01.json` -> raid day; `None` for anything else.
    pub fn raid_day_of(file_name: &str) -> Option<NaiveDate> {
        let stem = file_name.strip_suffix(LOOT_LOG_EXTENSION)?;
        NaiveDate::parse_from_str(stem, ISO_DATE_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let l = StoreLayout::new("data/");
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(l.player_file(), "data/player.json");
        assert_eq!(l.loot_log_file("TWW S1", day), "data/season/TWW S1/2024-01-31.json");
        assert_eq!(StoreLayout::raid_day_of("2024-01-31.json"), Some(day));
        assert_eq!(StoreLayout::raid_day_of("notes.txt"), None);
    }
}

//! Scenario: a racing writer turns the service's write into a conflict
//!
//! The service reads a document, another writer commits first, the service's
//! write carries the stale version. The caller gets a retryable conflict,
//! the racing content stays, and a retry after re-reading succeeds.

use std::sync::{Arc, Mutex};

use dkp_config::ConfigHandle;
use dkp_runtime::DkpService;
use dkp_schemas::FixField;
use dkp_store::{
    codec, Document, DocumentStore, HistoryRecord, InMemoryDocumentStore, StoreError, StoreLayout, VersionTag,
};
use dkp_testkit::{fix, player, raid, raw_entry, season, ymd, ScriptedReportSource};

/// Commits a competing document right before the next write it sees.
struct RacingStore {
    inner: InMemoryDocumentStore,
    racing: Mutex<Option<String>>,
}

impl RacingStore {
    fn race_next_write(&self, content: String) {
        *self.racing.lock().unwrap() = Some(content);
    }
}

impl DocumentStore for RacingStore {
    fn read(&self, path: &str) -> Result<Document, StoreError> {
        self.inner.read(path)
    }

    fn write(&self, path: &str, content: &str, expected: &VersionTag, message: &str) -> Result<VersionTag, StoreError> {
        let racing = self.racing.lock().unwrap().take();
        if let Some(racing) = racing {
            let current = self.inner.read(path)?;
            self.inner.write(path, &racing, &current.version, "Update")?;
        }
        self.inner.write(path, content, expected, message)
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<VersionTag, StoreError> {
        self.inner.create(path, content, message)
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list(dir)
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        self.inner.history()
    }
}

fn setup() -> (DkpService, Arc<RacingStore>) {
    let layout = StoreLayout::default();
    let inner = InMemoryDocumentStore::new()
        .with_document(
            &layout.season_file(),
            codec::encode_seasons(&[season(1, "S1", ymd(2024, 9, 1))]).unwrap(),
        )
        .with_document(
            &layout.player_file(),
            codec::encode_players(&[player(1, "Zelma", &["Zelma"])]).unwrap(),
        )
        .with_document(
            &layout.raid_file(),
            codec::encode_raids(&[raid(1, ymd(2024, 9, 10), &["Zelma"])]).unwrap(),
        );
    let store = Arc::new(RacingStore {
        inner,
        racing: Mutex::new(None),
    });
    let config = ConfigHandle::from_strings(Vec::<String>::new()).unwrap();
    let service = DkpService::new(config, store.clone(), Arc::new(ScriptedReportSource::new()));
    (service, store)
}

#[test]
fn scenario_stale_fix_is_a_conflict_and_retry_succeeds() {
    let (service, store) = setup();
    let day = ymd(2024, 9, 10);
    let entry = raw_entry("1").day(day).character("Zelma");
    service.import_loot_log(&[entry.clone().bid("40").build()]).unwrap();

    store.race_next_write(codec::encode_raw_loot(&[entry.bid("50").build()]).unwrap());
    let err = service
        .apply_fix("S1", day, &[fix("1", &[(FixField::Note, "30")])], "typo")
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {err}");
    assert!(!err.is_validation());

    // The competing edit is what is stored now.
    let stored = service.read_raw_loot_log("S1", day).unwrap();
    assert_eq!(stored[0].note, "50");

    // Re-read and retry: the fix applies on top of the new content.
    let retried = service
        .apply_fix("S1", day, &[fix("1", &[(FixField::Note, "30")])], "typo")
        .unwrap();
    assert_eq!(retried.changes[0].before, "50");
    assert_eq!(service.read_raw_loot_log("S1", day).unwrap()[0].note, "30");
}

#[test]
fn scenario_stale_roster_edit_is_a_conflict() {
    let (service, store) = setup();

    store.race_next_write(
        codec::encode_players(&[player(1, "Zelma", &["Zelma"]), player(2, "Kim", &["Kimi"])]).unwrap(),
    );
    let err = service.add_player("Olli", ["Moppi"]).unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {err}");

    // The retry sees the racing player and takes the next id.
    let olli = service.add_player("Olli", ["Moppi"]).unwrap();
    assert_eq!(olli.id, 3);
    let names: Vec<String> = service
        .repository()
        .load_players()
        .unwrap()
        .value
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Kim", "Olli", "Zelma"]);
}

//! Request-scoped service over store, configuration and report source.
//!
//! Every call reads what it needs (cached collections, fresh loot logs),
//! computes a full replacement document with the pure crates and writes it
//! with the version it read. A stale version comes back as a conflict.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use dkp_config::{ConfigHandle, DkpConfig};
use dkp_ledger::BalanceRules;
use dkp_loot::{sort_latest_first, Normalizer};
use dkp_reconcile::{
    apply_fixes, check_batch_content, check_batch_shape, filter_new, merge_with_report,
    preview_fixes, FieldChange, MergeReport,
};
use dkp_report::ReportSource;
use dkp_schemas::{Fix, LootEntry, Raid, RawLootEntry, Season};
use dkp_store::{DkpRepository, DocumentStore, StoreLayout, VersionTag};
use dkp_view::{assemble_admin_view, assemble_balance_view, AdminView, BalanceView, ViewSettings};

use crate::cache::{CachedData, DataCache};
use crate::DkpError;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one loot log upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub season: String,
    pub raid_day: NaiveDate,
    pub report: MergeReport,
    /// Version written; `None` when nothing was new.
    pub version: Option<VersionTag>,
    /// The raid day had no stored log before this upload.
    pub created: bool,
}

impl ImportOutcome {
    pub fn is_noop(&self) -> bool {
        self.version.is_none()
    }
}

/// Result of one fix submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub changes: Vec<FieldChange>,
    /// Version of the log after the call (unchanged when nothing changed).
    pub version: VersionTag,
}

impl FixOutcome {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DkpService
// ---------------------------------------------------------------------------

/// Cloneable handle; clones share configuration and cache.
///
/// `store.data_dir` is read once at construction.
#[derive(Clone)]
pub struct DkpService {
    config: ConfigHandle,
    repo: DkpRepository,
    reports: Arc<dyn ReportSource>,
    cache: DataCache,
}

impl DkpService {
    pub fn new(config: ConfigHandle, store: Arc<dyn DocumentStore>, reports: Arc<dyn ReportSource>) -> Self {
        let layout = StoreLayout::new(config.current().config.store.data_dir.clone());
        info!(
            data_dir = layout.data_dir(),
            report_source = reports.name(),
            "dkp service ready"
        );
        Self {
            config,
            repo: DkpRepository::new(store, layout),
            reports,
            cache: DataCache::new(),
        }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn repository(&self) -> &DkpRepository {
        &self.repo
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    /// Create the player/raid/season documents a fresh store lacks.
    pub fn init_store(&self) -> Result<Vec<String>, DkpError> {
        let created = self.repo.ensure_collections()?;
        if !created.is_empty() {
            info!(paths = ?created, "collections created");
            self.cache.invalidate();
        }
        Ok(created)
    }

    /// Cached roster, raids and seasons, loading them on first use.
    pub fn data(&self) -> Result<Arc<CachedData>, DkpError> {
        self.cache.get_or_load(&self.repo)
    }

    /// Re-read roster, raids and seasons from the store.
    pub fn reload(&self) -> Result<Arc<CachedData>, DkpError> {
        self.cache.reload(&self.repo)
    }

    /// Re-read the configuration layers. On failure the previous snapshot
    /// stays current.
    pub fn reload_config(&self) -> Result<u64, DkpError> {
        Ok(self.config.reload()?.generation)
    }

    fn settings(&self) -> ViewSettings {
        view_settings(&self.config.current().config)
    }

    // -----------------------------------------------------------------------
    // Seasons and raid days
    // -----------------------------------------------------------------------

    /// Seasons, the current one first.
    pub fn seasons(&self) -> Result<Vec<Season>, DkpError> {
        let data = self.data()?;
        let seasons = data.calendar.latest_first().into_iter().cloned().collect();
        Ok(seasons)
    }

    pub fn current_season(&self) -> Result<Season, DkpError> {
        let data = self.data()?;
        let current = data.calendar.latest_first().first().map(|s| (*s).clone());
        current.ok_or(DkpError::NoSeasons)
    }

    fn season_named(data: &CachedData, name: &str) -> Result<Season, DkpError> {
        data.calendar
            .by_name(name)
            .cloned()
            .ok_or_else(|| DkpError::UnknownSeason {
                name: name.to_string(),
            })
    }

    /// Raid days with a stored loot log, ascending.
    pub fn list_raid_days(&self, season_name: &str) -> Result<Vec<NaiveDate>, DkpError> {
        let data = self.data()?;
        let season = Self::season_named(&data, season_name)?;
        Ok(self.repo.list_raid_days(&season.name)?)
    }

    // -----------------------------------------------------------------------
    // Loot logs
    // -----------------------------------------------------------------------

    /// Stored raw entries of one raid day, in stored order.
    pub fn read_raw_loot_log(&self, season_name: &str, raid_day: NaiveDate) -> Result<Vec<RawLootEntry>, DkpError> {
        let data = self.data()?;
        let season = Self::season_named(&data, season_name)?;
        let log = self
            .repo
            .load_loot_log(&season.name, raid_day)?
            .ok_or_else(|| DkpError::LootLogNotFound {
                season: season.name.clone(),
                raid_day,
            })?;
        Ok(log.value)
    }

    /// Player-resolved entries of one raid day (every response), newest first.
    pub fn read_loot_log(&self, season_name: &str, raid_day: NaiveDate) -> Result<Vec<LootEntry>, DkpError> {
        let raw = self.read_raw_loot_log(season_name, raid_day)?;
        let data = self.data()?;
        let mut loot = self.settings().normalizer.normalize_all(&raw, &data.roster)?;
        sort_latest_first(&mut loot);
        Ok(loot)
    }

    /// Merge an uploaded export into the stored log of its raid day.
    ///
    /// The batch must be well formed as a whole; only entries not stored yet
    /// are checked against the roster and note rule. Re-uploading a stored
    /// batch writes nothing.
    pub fn import_loot_log(&self, batch: &[RawLootEntry]) -> Result<ImportOutcome, DkpError> {
        if let Err(e) = check_batch_shape(batch) {
            warn!(error = %e, entries = batch.len(), "import rejected");
            return Err(e.into());
        }
        let raid_day = batch[0].raid_day()?;

        let data = self.data()?;
        let season = data
            .calendar
            .season_for(raid_day)
            .cloned()
            .ok_or(DkpError::NoSeasonFor { raid_day })?;

        let stored = self.repo.load_loot_log(&season.name, raid_day)?;
        let existing: &[RawLootEntry] = stored.as_ref().map(|v| v.value.as_slice()).unwrap_or(&[]);

        let new_entries = filter_new(existing, batch);
        if let Err(e) = check_batch_content(&new_entries, &data.roster) {
            warn!(error = %e, %raid_day, "import rejected");
            return Err(e.into());
        }

        let report = merge_with_report(existing, batch);
        if report.has_drift() {
            warn!(
                %raid_day,
                diffs = report.diffs.len(),
                "re-uploaded entries disagree with stored log; stored entries kept"
            );
        }

        if report.is_noop() {
            info!(season = %season.name, %raid_day, "import is a no-op");
            return Ok(ImportOutcome {
                season: season.name,
                raid_day,
                report,
                version: None,
                created: false,
            });
        }

        let (version, created) = match &stored {
            None => (self.repo.create_loot_log(&season.name, raid_day, &report.merged)?, true),
            Some(log) => (
                self.repo
                    .update_loot_log(&season.name, raid_day, &report.merged, &log.version)?,
                false,
            ),
        };
        info!(
            season = %season.name,
            %raid_day,
            appended = report.appended.len(),
            already_stored = report.already_stored.len(),
            created,
            "loot log imported"
        );

        Ok(ImportOutcome {
            season: season.name,
            raid_day,
            report,
            version: Some(version),
            created,
        })
    }

    /// Correct stored entries of one raid day.
    ///
    /// All fixes apply or none do. Every changed entry must still pass the
    /// import gate's content checks. The reason is recorded with the write.
    pub fn apply_fix(
        &self,
        season_name: &str,
        raid_day: NaiveDate,
        fixes: &[Fix],
        reason: &str,
    ) -> Result<FixOutcome, DkpError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DkpError::BlankFixReason);
        }

        let data = self.data()?;
        let season = Self::season_named(&data, season_name)?;
        let log = self
            .repo
            .load_loot_log(&season.name, raid_day)?
            .ok_or_else(|| DkpError::LootLogNotFound {
                season: season.name.clone(),
                raid_day,
            })?;

        let changes = preview_fixes(&log.value, fixes)?;
        if changes.is_empty() {
            info!(season = %season.name, %raid_day, "fix changes nothing");
            return Ok(FixOutcome {
                changes,
                version: log.version,
            });
        }

        let patched = apply_fixes(&log.value, fixes)?;
        let touched: Vec<RawLootEntry> = patched
            .iter()
            .filter(|e| changes.iter().any(|c| c.id == e.id))
            .cloned()
            .collect();
        if let Err(e) = check_batch_content(&touched, &data.roster) {
            warn!(error = %e, season = %season.name, %raid_day, "fix rejected");
            return Err(DkpError::FixContent(e));
        }

        let version = self
            .repo
            .fix_loot_log(&season.name, raid_day, &patched, &log.version, reason)?;
        info!(
            season = %season.name,
            %raid_day,
            changes = changes.len(),
            reason,
            "loot log fixed"
        );

        Ok(FixOutcome { changes, version })
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn balance_view(&self, season_name: &str) -> Result<BalanceView, DkpError> {
        let data = self.data()?;
        let season = Self::season_named(&data, season_name)?;
        let loot = self.repo.load_season_logs(&season.name)?;
        let view = assemble_balance_view(
            &self.settings(),
            &data.calendar,
            &season,
            &data.roster,
            &data.raids,
            &loot,
        )?;
        if !view.is_valid() {
            warn!(season = %season.name, problems = view.validations.len(), "stored loot needs fixing");
        }
        Ok(view)
    }

    /// Attendance of an external report, resolved onto players.
    ///
    /// The report link is built from `report.report_url_base`.
    pub fn admin_view(&self, report_id: &str) -> Result<AdminView, DkpError> {
        let attendance = self.reports.fetch_attendance(report_id)?;
        let data = self.data()?;
        let mut view = assemble_admin_view(report_id, &attendance, &data.roster);
        let snapshot = self.config.current();
        view.report_url = format!("{}{}", snapshot.config.report.report_url_base, report_id.trim());
        Ok(view)
    }

    /// Link to the report a stored raid was registered from.
    pub fn report_url(&self, raid: &Raid) -> Option<String> {
        let snapshot = self.config.current();
        raid.report_url(&snapshot.config.report.report_url_base)
    }
}

/// Ledger rules and link base from the typed configuration.
pub fn view_settings(config: &DkpConfig) -> ViewSettings {
    ViewSettings {
        rules: BalanceRules {
            initial_balance: config.ledger.initial_balance,
            attendance_bonus: config.ledger.attendance_bonus,
        },
        normalizer: Normalizer::new(config.loot.item_link_base.clone()),
    }
}

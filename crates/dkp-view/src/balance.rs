use serde::Serialize;

use dkp_ledger::{calculate_with, sort_by_name, BalanceError, BalanceRules};
use dkp_loot::{bids_only, last_update, sort_latest_first, LastUpdate, Normalizer};
use dkp_reconcile::audit_stored;
use dkp_schemas::{Balance, LootEntry, Raid, RawLootEntry, Roster, Season, SeasonCalendar};

/// Rules and link settings the view is assembled with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSettings {
    pub rules: BalanceRules,
    pub normalizer: Normalizer,
}

/// Season balance page.
///
/// Either `validations` is empty and the data fields are filled, or
/// `validations` lists every problem and the data fields are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub season_name: String,
    pub last_update: Option<LastUpdate>,
    /// Sorted by player name.
    pub balances: Vec<Balance>,
    /// Bids only, newest first.
    pub loot_history: Vec<LootEntry>,
    pub validations: Vec<String>,
}

impl BalanceView {
    pub fn is_valid(&self) -> bool {
        self.validations.is_empty()
    }

    fn invalid(season: &Season, validations: Vec<String>) -> Self {
        Self {
            season_name: season.name.clone(),
            last_update: None,
            balances: Vec::new(),
            loot_history: Vec::new(),
            validations,
        }
    }
}

/// Assemble the balance view of `season`.
///
/// `raids` may span several seasons; only those inside `season` count.
/// `season_loot` is every stored raw entry of the season.
pub fn assemble_balance_view(
    settings: &ViewSettings,
    calendar: &SeasonCalendar,
    season: &Season,
    roster: &Roster,
    raids: &[Raid],
    season_loot: &[RawLootEntry],
) -> Result<BalanceView, BalanceError> {
    let problems: Vec<String> = audit_stored(season_loot, roster)
        .iter()
        .map(ToString::to_string)
        .collect();
    if !problems.is_empty() {
        return Ok(BalanceView::invalid(season, problems));
    }

    let loot = match settings.normalizer.normalize_all(season_loot, roster) {
        Ok(loot) => loot,
        Err(e) => return Ok(BalanceView::invalid(season, vec![e.to_string()])),
    };

    let season_raids = calendar.raids_in(season, raids);
    let mut history = bids_only(&loot);
    let mut balances = calculate_with(&settings.rules, roster.players(), &season_raids, &history)?;
    sort_by_name(&mut balances);
    sort_latest_first(&mut history);

    Ok(BalanceView {
        season_name: season.name.clone(),
        // Header matches the top row of the bid history.
        last_update: last_update(&history),
        balances,
        loot_history: history,
        validations: Vec::new(),
    })
}

//! Balance calculation.
//!
//! 1. every player starts at `initial_balance` income
//! 2. each raid a player attended (matched by player name) adds `attendance_bonus`
//! 3. each loot entry with a non-blank note is charged to the player owning
//!    its character
//!
//! No response filtering happens here; callers pass bids only.

use std::collections::BTreeMap;

use dkp_schemas::{parse_note, Balance, LootEntry, NoteError, Player, Raid};

/// Starting points of every player.
pub const INITIAL_BALANCE: i64 = 100;
/// Points per attended raid.
pub const ATTENDANCE_BONUS: i64 = 50;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    /// A note reached the calculation without passing loot validation.
    UnparsableNote {
        id: String,
        note: String,
        problem: NoteError,
    },
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnparsableNote { id, note, problem } => write!(
                f,
                "balance invariant: note of loot entry \"{id}\" is not a bid amount ({problem}): \"{note}\""
            ),
        }
    }
}

impl std::error::Error for BalanceError {}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRules {
    pub initial_balance: i64,
    pub attendance_bonus: i64,
}

impl Default for BalanceRules {
    fn default() -> Self {
        Self {
            initial_balance: INITIAL_BALANCE,
            attendance_bonus: ATTENDANCE_BONUS,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

struct Account {
    income: i64,
    cost: i64,
}

/// [`calculate_with`] under the default rules.
pub fn calculate(players: &[Player], raids: &[Raid], loot: &[LootEntry]) -> Result<Vec<Balance>, BalanceError> {
    calculate_with(&BalanceRules::default(), players, raids, loot)
}

/// One balance per player, in `players` order.
///
/// Loot on a character no player owns is ignored. A note that does not
/// parse returns [`BalanceError::UnparsableNote`].
pub fn calculate_with(
    rules: &BalanceRules,
    players: &[Player],
    raids: &[Raid],
    loot: &[LootEntry],
) -> Result<Vec<Balance>, BalanceError> {
    let mut accounts: Vec<Account> = players
        .iter()
        .map(|_| Account {
            income: rules.initial_balance,
            cost: 0,
        })
        .collect();

    let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_character: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, p) in players.iter().enumerate() {
        by_name.entry(p.name.as_str()).or_insert(idx);
        for c in &p.characters {
            by_character.entry(c.as_str()).or_insert(idx);
        }
    }

    for raid in raids {
        for attendee in &raid.attendees {
            if let Some(&idx) = by_name.get(attendee.as_str()) {
                accounts[idx].income += rules.attendance_bonus;
            }
        }
    }

    for entry in loot {
        let Some(&idx) = by_character.get(entry.character.as_str()) else {
            continue;
        };
        let amount = parse_note(&entry.note).map_err(|problem| BalanceError::UnparsableNote {
            id: entry.id.clone(),
            note: entry.note.clone(),
            problem,
        })?;
        if let Some(amount) = amount {
            let amount = i64::try_from(amount).unwrap_or(i64::MAX);
            accounts[idx].cost = accounts[idx].cost.saturating_sub(amount);
        }
    }

    Ok(players
        .iter()
        .zip(accounts)
        .map(|(p, a)| Balance {
            name: p.name.clone(),
            value: a.income + a.cost,
            income: a.income,
            cost: a.cost,
            characters: p.characters.iter().cloned().collect(),
        })
        .collect())
}

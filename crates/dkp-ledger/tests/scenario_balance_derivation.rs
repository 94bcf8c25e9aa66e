//! Scenario: balances are derived from roster, attendance and bid costs
//!
//! value = income + cost, income = 100 + 50 per attended raid, cost is the
//! negative sum of bid notes charged to the player's characters.

use chrono::NaiveDate;
use dkp_ledger::{
    active_in_season, calculate, players_with_negative_balance, sort_by_name, BalanceError,
};
use dkp_schemas::{LootEntry, NoteError, Player, Raid};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn loot(id: &str, character: &str, note: &str) -> LootEntry {
    LootEntry {
        id: id.to_string(),
        timestamp: day(1).and_hms_opt(20, 0, 0).unwrap(),
        player: "ignored".to_string(),
        note: note.to_string(),
        item_name: "Ring".to_string(),
        item_link: "https://www.wowhead.com/item=1".to_string(),
        item_id: "1".to_string(),
        boss: "Fyrakk".to_string(),
        difficulty: "Heroic".to_string(),
        instance: "Amirdrassil".to_string(),
        character: character.to_string(),
        response: "Gebot".to_string(),
    }
}

#[test]
fn scenario_conservation_without_raids_or_loot() {
    let players = vec![
        Player::new(1, "Olli", ["Moppi"]),
        Player::new(2, "Zelma", ["Zelma"]),
    ];
    let balances = calculate(&players, &[], &[]).unwrap();
    for b in &balances {
        assert_eq!((b.value, b.income, b.cost), (100, 100, 0), "{b:?}");
    }
}

#[test]
fn scenario_attendance_is_additive() {
    let players = vec![Player::new(1, "Olli", ["Moppi"])];
    let raids = vec![
        Raid::new(1, day(1), "a", ["Olli"]),
        Raid::new(2, day(8), "b", ["Olli", "Zelma"]),
    ];
    let b = &calculate(&players, &raids, &[]).unwrap()[0];
    assert_eq!(b.income, 200);
    assert_eq!(b.value, 200);
}

#[test]
fn scenario_cost_is_charged_to_character_owner() {
    let players = vec![
        Player::new(1, "Olli", ["Moppi", "Zelmadin"]),
        Player::new(2, "Zelma", ["Zelma"]),
    ];
    let entries = vec![loot("1", "Zelmadin", "30")];
    let balances = calculate(&players, &[], &entries).unwrap();
    assert_eq!((balances[0].value, balances[0].cost), (70, -30));
    assert_eq!((balances[1].value, balances[1].cost), (100, 0));
}

#[test]
fn scenario_end_to_end_single_raid_single_bid() {
    let players = vec![Player::new(1, "Olli", ["Moppi"])];
    let raids = vec![Raid::new(1, day(1), "", ["Olli"])];
    let entries = vec![loot("1", "Moppi", "20")];

    let balances = calculate(&players, &raids, &entries).unwrap();

    assert_eq!(balances.len(), 1);
    let b = &balances[0];
    assert_eq!(b.name, "Olli");
    assert_eq!(b.value, 130);
    assert_eq!(b.income, 150);
    assert_eq!(b.cost, -20);
    assert_eq!(b.characters, vec!["Moppi".to_string()]);
}

#[test]
fn scenario_order_of_inputs_does_not_matter() {
    let players = vec![Player::new(1, "Olli", ["Moppi"])];
    let raids = vec![
        Raid::new(1, day(1), "", ["Olli"]),
        Raid::new(2, day(2), "", ["Olli"]),
    ];
    let entries = vec![loot("1", "Moppi", "20"), loot("2", "Moppi", "50")];

    let forward = calculate(&players, &raids, &entries).unwrap();
    let mut raids_rev = raids.clone();
    raids_rev.reverse();
    let mut entries_rev = entries.clone();
    entries_rev.reverse();
    let backward = calculate(&players, &raids_rev, &entries_rev).unwrap();

    assert_eq!(forward, backward);
}

#[test]
fn scenario_blank_note_costs_nothing_and_bad_note_is_contract_error() {
    let players = vec![Player::new(1, "Olli", ["Moppi"])];
    let b = calculate(&players, &[], &[loot("1", "Moppi", "")]).unwrap();
    assert_eq!(b[0].cost, 0);

    let err = calculate(&players, &[], &[loot("2", "Moppi", "abc")]).unwrap_err();
    assert_eq!(
        err,
        BalanceError::UnparsableNote {
            id: "2".to_string(),
            note: "abc".to_string(),
            problem: NoteError::NotInteger
        }
    );
}

#[test]
fn scenario_queries_over_balances() {
    let players = vec![
        Player::new(1, "Zelma", ["Zelma"]),
        Player::new(2, "Olli", ["Moppi"]),
        Player::new(3, "Anna", ["Annabell"]),
    ];
    let raids = vec![Raid::new(1, day(1), "", ["Olli"])];
    let entries = vec![loot("1", "Zelma", "150")];

    let mut balances = calculate(&players, &raids, &entries).unwrap();
    sort_by_name(&mut balances);
    let names: Vec<&str> = balances.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Olli", "Zelma"]);

    let negative = players_with_negative_balance(&balances);
    assert_eq!(negative.len(), 1);
    assert_eq!(negative[0].name, "Zelma");
    assert_eq!(negative[0].value, -50);

    let active: Vec<&str> = active_in_season(&players, &raids)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(active, vec!["Olli"]);
}

#[test]
fn scenario_large_bid_is_charged_in_full() {
    let players = vec![Player::new(1, "Olli", ["Moppi"])];
    let b = &calculate(&players, &[], &[loot("1", "Moppi", "5000000000")]).unwrap()[0];
    assert_eq!(b.cost, -5_000_000_000);
    assert_eq!(b.value, 100 - 5_000_000_000);
}

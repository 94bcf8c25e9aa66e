use dkp_schemas::{Balance, Player, Raid};

/// Balances ordered by player name, ascending.
pub fn sort_by_name(balances: &mut [Balance]) {
    balances.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Balances below zero, in input order.
pub fn players_with_negative_balance(balances: &[Balance]) -> Vec<&Balance> {
    balances.iter().filter(|b| b.is_negative()).collect()
}

/// Players attending at least one of `season_raids`, in roster order.
pub fn active_in_season<'a>(players: &'a [Player], season_raids: &[Raid]) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|p| season_raids.iter().any(|r| r.attended_by(&p.name)))
        .collect()
}

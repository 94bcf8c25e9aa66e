//! dkp-ledger
//!
//! Per-player point balances derived from roster, raid attendance and bid
//! costs. Balances are never stored; every query recomputes them.
//!
//! Deterministic and pure: the result does not depend on the order of raids
//! or loot entries.

mod balance;
mod queries;

pub use balance::{
    calculate, calculate_with, BalanceError, BalanceRules, ATTENDANCE_BONUS, INITIAL_BALANCE,
};
pub use queries::{active_in_season, players_with_negative_balance, sort_by_name};

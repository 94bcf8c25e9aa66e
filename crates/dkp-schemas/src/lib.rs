//! dkp-schemas
//!
//! Domain model of the DKP ledger: players and their characters, raids,
//! seasons, raw and clean loot entries, fixes and balances.
//!
//! Every type here rejects structurally invalid values when it is built
//! (see [`ValidationError`]). Pure data, no IO.

pub mod date;

mod balance;
mod error;
mod fix;
mod loot;
mod player;
mod raid;
mod season;

pub use balance::Balance;
pub use error::{NoteError, ValidationError};
pub use fix::{Fix, FixEntry, FixField};
pub use loot::{parse_note, validate_note, LootEntry, RawLootEntry, BID_RESPONSE};
pub use player::{Player, Roster};
pub use raid::Raid;
pub use season::{Season, SeasonCalendar};

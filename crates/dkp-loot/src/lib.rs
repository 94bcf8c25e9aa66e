//! dkp-loot
//!
//! Raw export entries -> player-resolved [`LootEntry`] values, and the
//! orderings the loot history is shown in.
//!
//! It does **not**:
//! - check uploads (that is `dkp-reconcile`'s import gate)
//! - compute balances
//!
//! [`LootEntry`]: dkp_schemas::LootEntry

pub mod history;
pub mod normalizer;

pub use history::{bids_only, last_update, sort_latest_first, LastUpdate};
pub use normalizer::{normalize, NormalizeError, Normalizer, DEFAULT_ITEM_LINK_BASE};

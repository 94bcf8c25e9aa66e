//! dkp-runtime
//!
//! Wires the pure crates to a document store, a configuration handle and a
//! report source. [`DkpService`] is what an embedding process (web page,
//! CLI) calls; it owns no global state.
//!
//! - Roster, raids and seasons are cached explicitly and reloaded on demand
//! - Loot logs are read per request
//! - Writes always carry the full document and the version it was read at;
//!   conflicts are returned, never retried
//!
//! Installing a `tracing` subscriber is left to the embedding process.

mod admin;
mod cache;
mod error;
mod service;

pub use cache::{CachedData, DataCache};
pub use error::DkpError;
pub use service::{view_settings, DkpService, FixOutcome, ImportOutcome};

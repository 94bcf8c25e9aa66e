//! dkp-testkit
//!
//! Shared fixtures for scenario tests: entity builders with defaults, a
//! scripted report source and a service harness over an in-memory store.
//! The cross-crate scenarios themselves live in `tests/`.

pub mod fixtures;

mod harness;
mod report;

pub use fixtures::*;
pub use harness::Harness;
pub use report::ScriptedReportSource;

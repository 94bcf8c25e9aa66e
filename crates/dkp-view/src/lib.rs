//! dkp-view
//!
//! Read-only presentation objects assembled from roster, raids, seasons and
//! stored loot logs.
//!
//! Data problems a user can fix (unknown characters, malformed notes) are
//! returned as validation messages inside the view. Only broken invariants
//! are errors.
//!
//! Pure composition. No IO.

mod admin;
mod balance;

pub use admin::{assemble_admin_view, AdminView};
pub use balance::{assemble_balance_view, BalanceView, ViewSettings};

//! dkp-reconcile
//!
//! Raw loot log reconciliation.
//!
//! - Merge is a union keyed by entry id; the stored entry always wins
//! - Re-uploading the same batch is a no-op
//! - Fixes patch single fields by clean name and produce a new collection
//! - A fix naming an unknown id aborts the whole fix set
//! - Uploaded batches pass the import gate before they may merge
//!
//! Deterministic, pure logic. No IO.

mod engine;
mod fix;
mod gate;
mod types;

pub use engine::{filter_new, merge, merge_with_report};
pub use fix::{apply_fixes, preview_fixes};
pub use gate::{
    audit_stored, check_batch_content, check_batch_shape, unknown_characters, validate_import,
};
pub use types::*;

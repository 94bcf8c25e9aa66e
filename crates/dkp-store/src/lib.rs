//! dkp-store
//!
//! Persistence boundary: an opaque document store keyed by path, with
//! optimistic concurrency by content hash.
//!
//! - Every write names the version it replaces; a stale version is a
//!   [`StoreError::Conflict`] and is never retried here
//! - Every write carries a message (`Create`, `Update`, `Fix: <reason>`)
//!   recorded in an append-only history
//! - Documents are JSON arrays in a stable order, so equal collections
//!   encode to equal bytes
//!
//! [`DkpRepository`] maps the domain collections onto paths.

pub mod codec;

mod document;
mod error;
mod fs;
mod memory;
mod paths;
mod repository;

pub use document::{Document, DocumentStore, HistoryRecord, VersionTag};
pub use error::StoreError;
pub use fs::FsDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use paths::{StoreLayout, DEFAULT_DATA_DIR};
pub use repository::{DkpRepository, Versioned, MESSAGE_CREATE, MESSAGE_UPDATE};

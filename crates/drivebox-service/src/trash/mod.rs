//! Trash policy: soft delete, permanent purge, and restore.

pub(crate) mod purge;
pub mod service;

use serde::{Deserialize, Serialize};

pub use service::TrashService;

/// What a delete request did to its target.
///
/// The first delete of an active entry trashes it; a delete against an
/// already-trashed entry purges it permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOutcome {
    /// The entry was moved to the bin and can still be restored.
    Trashed,
    /// The entry and any exclusively-owned content are gone for good.
    Purged,
}

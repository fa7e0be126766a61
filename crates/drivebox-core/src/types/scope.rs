//! Listing scope: active entries vs. trashed entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which lifecycle state a listing or search should return.
///
/// Readers never see both states mixed: a folder view shows active entries,
/// the bin view shows trashed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    /// Entries that are not soft-deleted.
    Active,
    /// Entries inside the bin.
    Trashed,
}

impl ListScope {
    /// The soft-delete flag value this scope matches.
    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Trashed)
    }
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Trashed => write!(f, "trashed"),
        }
    }
}

impl FromStr for ListScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            // "bin" is the spelling the listing endpoint historically used.
            "trashed" | "bin" => Ok(Self::Trashed),
            other => Err(AppError::validation(format!(
                "Unknown listing scope '{other}'"
            ))),
        }
    }
}

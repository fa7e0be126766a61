//! # drivebox-service
//!
//! Business logic for Drivebox. Services compose the repositories inside
//! single all-or-nothing transactions, consult the trash policy for
//! delete/restore semantics, and defer blob erasure to after commit.

pub mod context;
pub mod file;
pub mod folder;
pub mod trash;

use drivebox_core::error::{AppError, ErrorKind};

/// Map a failed `begin` into an [`AppError`].
pub(crate) fn begin_error(e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
}

/// Map a failed `commit` into an [`AppError`].
///
/// A commit can itself lose a serialization race; that surfaces as a
/// retryable `Conflict` rather than a plain database error.
pub(crate) fn commit_error(e: sqlx::Error) -> AppError {
    let retryable = matches!(
        &e,
        sqlx::Error::Database(db)
            if matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
    );
    if retryable {
        AppError::with_source(
            ErrorKind::Conflict,
            "Transaction aborted by a concurrent conflicting mutation",
            e,
        )
    } else {
        AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
    }
}

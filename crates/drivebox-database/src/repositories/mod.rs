//! Repository implementations.

pub mod content;
pub mod file;
pub mod folder;

use drivebox_core::error::{AppError, ErrorKind};

/// Map a sqlx error into an [`AppError`] with the given context message.
///
/// Serialization failures and deadlocks become `Conflict` so callers know
/// the transaction lost a race and can retry; everything else is `Database`.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
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
            AppError::with_source(ErrorKind::Database, context, e)
        }
    }
}

/// Escape LIKE metacharacters in a user-supplied prefix.
pub(crate) fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

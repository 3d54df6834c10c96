//! Repository Module
//!
//! Free async functions per relation, all taking `&SqlitePool`.
//!
//! Delete guards run the reference count and the delete inside one
//! transaction; `ON DELETE RESTRICT` foreign keys are the backstop and a
//! violation there is reported with the same business error.

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod report;

use shared::error::AppError;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::core::ServiceError;

/// Begin a transaction that holds the write lock from its first statement
///
/// A deferred transaction that reads before writing fails with
/// `SQLITE_BUSY` when another writer commits in between; `IMMEDIATE`
/// waits on `busy_timeout` instead.
pub(crate) async fn begin_write(pool: &SqlitePool) -> sqlx::Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Map a foreign-key failure on delete to the guard's business error
pub(crate) fn guard_violation(e: sqlx::Error, guard: AppError) -> ServiceError {
    if let sqlx::Error::Database(db) = &e
        && db.is_foreign_key_violation()
    {
        return ServiceError::App(guard);
    }
    e.into()
}

/// Map a unique-index failure to a business error
pub(crate) fn unique_violation(e: sqlx::Error, err: AppError) -> ServiceError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return ServiceError::App(err);
    }
    e.into()
}

//! SQLite-backed implementations of the store traits.

pub mod budget;
pub mod expense;

pub use budget::SQLiteBudgetStore;
pub use expense::SQLiteExpenseStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// Creates expense and budget stores that share `connection`.
///
/// This function will modify the database by adding the tables for the domain
/// models if they do not exist yet.
///
/// The stores keep the one connection alive for the life of the process and
/// guard it with a mutex. Each statement runs in its own implicit
/// transaction, so a failed write rolls back without affecting later calls.
pub fn create_stores(
    connection: Connection,
) -> Result<(SQLiteExpenseStore, SQLiteBudgetStore), Error> {
    initialize(&connection)?;

    let connection = Arc::new(Mutex::new(connection));

    Ok((
        SQLiteExpenseStore::new(connection.clone()),
        SQLiteBudgetStore::new(connection),
    ))
}

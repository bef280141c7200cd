//! Spendlog is a library for tracking personal expenses and category budgets.
//!
//! It owns the persistence layer (a two-table SQLite schema with idempotent
//! initialization), a fixed set of read/write and aggregation operations over
//! that schema, and pure derived-metric functions (budget status, spending
//! insights, input validation) that operate on already-fetched records.
//!
//! Page rendering and chart generation are left to the consuming application,
//! which talks to this crate through the [stores] traits, [metrics] and
//! [export].

#![warn(missing_docs)]

use time::Date;

use crate::validation::MAX_EXPENSE_AGE_DAYS;

pub mod db;
pub mod export;
pub mod metrics;
pub mod models;
pub mod stores;
pub mod validation;

pub use db::initialize as initialize_db;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for an expense description.
    ///
    /// Every expense records what the money was spent on, so blank
    /// descriptions are rejected before anything touches the database.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A zero or negative amount was used for an expense or budget.
    #[error("amount must be greater than zero, but got {0}")]
    NonPositiveAmount(f64),

    /// An empty string was used for a category name.
    ///
    /// Categories are free-form text, but they must be present.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A date string could not be parsed as a calendar date.
    ///
    /// Callers should pass in the original string so the user can see what
    /// was rejected.
    #[error("could not parse \"{0}\" as a date in YYYY-MM-DD format")]
    InvalidDateFormat(String),

    /// A date in the future was used for an expense.
    ///
    /// Expenses record money that has already been spent, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A date more than [MAX_EXPENSE_AGE_DAYS] days in the past was used for
    /// an expense.
    #[error("{0} is more than {MAX_EXPENSE_AGE_DAYS} days in the past")]
    DateTooOld(Date),

    /// A string that is neither `"Monthly"` nor `"Weekly"` was used for a
    /// budget period.
    #[error("\"{0}\" is not a valid budget period")]
    InvalidPeriod(String),

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Records could not be serialized as CSV.
    #[error("could not serialize as CSV: {0}")]
    CSVSerializationError(String),

    /// Records could not be serialized as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

//! Defines the expense store trait and the row types its aggregation
//! operations return.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Expense, NewExpense},
};

/// The category names offered when no expenses have been recorded yet, so the
/// caller always has selectable options.
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Travel",
    "Education",
    "Other",
];

/// One row of [ExpenseStore::summary]: per-category aggregates over the
/// selected date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// The category the row aggregates over.
    pub category: String,
    /// How many expenses fell in the window.
    pub transaction_count: i64,
    /// The sum of the matching expense amounts.
    pub total_amount: f64,
    /// The mean of the matching expense amounts.
    pub avg_amount: f64,
    /// The smallest matching expense amount.
    pub min_amount: f64,
    /// The largest matching expense amount.
    pub max_amount: f64,
}

/// One row of [ExpenseStore::monthly_totals]: spending aggregated over one
/// calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The calendar month in `YYYY-MM` form.
    pub month: String,
    /// The sum of the month's expense amounts.
    pub total_amount: f64,
    /// How many expenses were recorded in the month.
    pub transaction_count: i64,
}

/// Handles the creation, mutation and retrieval of expenses.
///
/// Read operations never fail: on a storage error they log a warning and
/// report "no data", which callers must treat as a display concern rather
/// than a guarantee that the table is empty.
pub trait ExpenseStore {
    /// Create a new expense in the store and return it with its assigned ID
    /// and creation timestamp.
    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error>;

    /// Replace every mutable field of the expense with ID `id`.
    ///
    /// Implementers must fail with [Error::UpdateMissingExpense] when no
    /// expense has that ID.
    fn update(&mut self, id: DatabaseID, expense: NewExpense) -> Result<Expense, Error>;

    /// Remove the expense with ID `id` from the store.
    ///
    /// Implementers must fail with [Error::DeleteMissingExpense] when no
    /// expense has that ID.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Every expense, ordered by date descending with ties broken by creation
    /// time descending (most recent activity first).
    fn get_all(&self) -> Vec<Expense>;

    /// The distinct categories present in the store, alphabetically ordered.
    ///
    /// Returns [DEFAULT_CATEGORIES] when no expenses exist.
    fn categories(&self) -> Vec<String>;

    /// Expenses whose description, notes or category contains `term`,
    /// case-insensitively. An empty term is equivalent to [ExpenseStore::get_all].
    /// Same ordering as [ExpenseStore::get_all].
    fn search(&self, term: &str) -> Vec<Expense>;

    /// Per-category aggregates, ordered by total amount descending.
    ///
    /// The date bounds are inclusive and independently optional: either, both
    /// or neither may be supplied.
    fn summary(&self, start_date: Option<Date>, end_date: Option<Date>) -> Vec<CategorySummary>;

    /// Spending totals grouped by calendar month, most recent month first.
    fn monthly_totals(&self) -> Vec<MonthlyTotal>;
}

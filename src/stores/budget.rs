//! Defines the budget store trait.

use crate::{
    Error,
    models::{Budget, DatabaseID, NewBudget},
};

/// Handles the creation, replacement and retrieval of category budgets.
pub trait BudgetStore {
    /// Insert a budget for the category, or replace the existing one.
    ///
    /// Exactly one budget per category holds after this call, and the
    /// returned budget carries a refreshed `updated_at`.
    fn upsert(&mut self, budget: NewBudget) -> Result<Budget, Error>;

    /// Remove the budget with ID `id` from the store.
    ///
    /// Implementers must fail with [Error::DeleteMissingBudget] when no
    /// budget has that ID.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Every budget, ordered by category name ascending.
    ///
    /// Follows the same swallow-and-report-empty policy as
    /// [ExpenseStore::get_all](crate::stores::ExpenseStore::get_all) on
    /// storage errors.
    fn get_all(&self) -> Vec<Budget>;
}

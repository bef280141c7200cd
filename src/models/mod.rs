//! This module defines the domain data types.

pub use budget::{Budget, BudgetPeriod, NewBudget};
pub use expense::{Expense, NewExpense};

mod budget;
mod expense;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

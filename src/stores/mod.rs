//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod budget;
mod expense;

pub mod sqlite;

pub use budget::BudgetStore;
pub use expense::{CategorySummary, DEFAULT_CATEGORIES, ExpenseStore, MonthlyTotal};

//! Implements a SQLite backed budget store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Budget, BudgetPeriod, DatabaseID, NewBudget},
    stores::BudgetStore,
};

/// Stores category budgets in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn try_get_all(&self) -> Result<Vec<Budget>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, category, amount, period, description, created_at, updated_at
                 FROM budgets ORDER BY category",
            )?
            .query_map([], Self::map_row)?
            .map(|maybe_budget| maybe_budget.map_err(Error::SqlError))
            .collect()
    }
}

impl BudgetStore for SQLiteBudgetStore {
    /// Insert a budget for the category, or replace the existing one.
    ///
    /// An existing row keeps its ID and creation timestamp; the amount,
    /// period and description are overwritten and `updated_at` is refreshed.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn upsert(&mut self, budget: NewBudget) -> Result<Budget, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        let budget = connection
            .prepare(
                "INSERT INTO budgets (category, amount, period, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(category) DO UPDATE SET
                     amount = excluded.amount,
                     period = excluded.period,
                     description = excluded.description,
                     updated_at = excluded.updated_at
                 RETURNING id, category, amount, period, description, created_at, updated_at",
            )?
            .query_row(
                (
                    budget.category(),
                    budget.amount(),
                    budget.period().to_string(),
                    budget.description(),
                    now,
                ),
                Self::map_row,
            )?;

        Ok(budget)
    }

    /// Remove the budget with ID `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingBudget] if `id` does not refer to a budget,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM budgets WHERE id = ?1", (id,))?;

        if rows_deleted == 0 {
            return Err(Error::DeleteMissingBudget);
        }

        Ok(())
    }

    fn get_all(&self) -> Vec<Budget> {
        self.try_get_all().unwrap_or_else(|error| {
            tracing::warn!("could not list budgets, reporting no data: {error}");
            Vec::new()
        })
    }
}

impl CreateTable for SQLiteBudgetStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS budgets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    category TEXT NOT NULL UNIQUE,
                    amount REAL NOT NULL,
                    period TEXT NOT NULL DEFAULT 'Monthly',
                    description TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteBudgetStore {
    type ReturnType = Budget;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let category = row.get(offset + 1)?;
        let amount = row.get(offset + 2)?;

        let raw_period: String = row.get(offset + 3)?;
        let period: BudgetPeriod = raw_period.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 3,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        let description = row.get(offset + 4)?;
        let created_at = row.get(offset + 5)?;
        let updated_at = row.get(offset + 6)?;

        Ok(Budget::new_unchecked(
            id,
            category,
            amount,
            period,
            description,
            created_at,
            updated_at,
        ))
    }
}

#[cfg(test)]
mod sqlite_budget_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{BudgetPeriod, NewBudget},
        stores::BudgetStore,
    };

    use super::SQLiteBudgetStore;

    fn get_test_store() -> SQLiteBudgetStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteBudgetStore::new(Arc::new(Mutex::new(connection)))
    }

    fn food_budget(amount: f64) -> NewBudget {
        NewBudget::new("Food & Dining", amount, BudgetPeriod::Monthly, None).unwrap()
    }

    #[test]
    fn upsert_creates_a_budget() {
        let mut store = get_test_store();

        let budget = store
            .upsert(
                NewBudget::new(
                    "Travel",
                    500.0,
                    BudgetPeriod::Weekly,
                    Some("holiday savings"),
                )
                .unwrap(),
            )
            .unwrap();

        assert!(budget.id() > 0);
        assert_eq!(budget.category(), "Travel");
        assert_eq!(budget.amount(), 500.0);
        assert_eq!(budget.period(), BudgetPeriod::Weekly);
        assert_eq!(budget.description(), Some("holiday savings"));
        assert_eq!(budget.created_at(), budget.updated_at());
    }

    #[test]
    fn upsert_replaces_budget_for_existing_category() {
        let mut store = get_test_store();
        let original = store.upsert(food_budget(300.0)).unwrap();

        let replaced = store.upsert(food_budget(450.0)).unwrap();

        assert_eq!(replaced.id(), original.id());
        assert_eq!(replaced.amount(), 450.0);
        assert_eq!(replaced.created_at(), original.created_at());
        assert!(replaced.updated_at() >= original.updated_at());

        let all = store.get_all();
        assert_eq!(all.len(), 1, "want exactly one budget per category");
        assert_eq!(all[0].amount(), 450.0);
    }

    #[test]
    fn delete_removes_the_budget() {
        let mut store = get_test_store();
        let budget = store.upsert(food_budget(300.0)).unwrap();

        store.delete(budget.id()).unwrap();

        assert!(store.get_all().is_empty());
    }

    #[test]
    fn delete_fails_on_missing_id() {
        let mut store = get_test_store();

        let result = store.delete(1337);

        assert_eq!(result, Err(Error::DeleteMissingBudget));
    }

    #[test]
    fn get_all_orders_by_category_ascending() {
        let mut store = get_test_store();
        store
            .upsert(NewBudget::new("Transportation", 80.0, BudgetPeriod::Monthly, None).unwrap())
            .unwrap();
        store.upsert(food_budget(300.0)).unwrap();

        let categories: Vec<String> = store
            .get_all()
            .iter()
            .map(|budget| budget.category().to_string())
            .collect();

        assert_eq!(categories, vec!["Food & Dining", "Transportation"]);
    }

    #[test]
    fn get_all_returns_empty_on_storage_error() {
        let store = get_test_store();
        store
            .connection
            .lock()
            .unwrap()
            .execute("DROP TABLE budgets", ())
            .unwrap();

        assert!(store.get_all().is_empty());
    }
}

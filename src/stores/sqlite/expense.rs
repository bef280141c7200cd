//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Expense, NewExpense},
    stores::{
        ExpenseStore,
        expense::{CategorySummary, DEFAULT_CATEGORIES, MonthlyTotal},
    },
};

/// Stores expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn try_get_all(&self) -> Result<Vec<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, description, amount, category, date, notes, created_at FROM expenses
                 ORDER BY date DESC, created_at DESC, id DESC",
            )?
            .query_map([], Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }

    fn try_categories(&self) -> Result<Vec<String>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT DISTINCT category FROM expenses ORDER BY category")?
            .query_map([], |row| row.get(0))?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }

    fn try_search(&self, term: &str) -> Result<Vec<Expense>, Error> {
        let pattern = format!("%{term}%");

        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, description, amount, category, date, notes, created_at FROM expenses
                 WHERE description LIKE ?1 OR notes LIKE ?1 OR category LIKE ?1
                 ORDER BY date DESC, created_at DESC, id DESC",
            )?
            .query_map((&pattern,), Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }

    fn try_summary(
        &self,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<Vec<CategorySummary>, Error> {
        let mut query_string_parts = vec![
            "SELECT category, COUNT(*) AS transaction_count, SUM(amount) AS total_amount, \
             AVG(amount) AS avg_amount, MIN(amount) AS min_amount, MAX(amount) AS max_amount \
             FROM expenses"
                .to_string(),
        ];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(start_date) = start_date {
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(start_date.to_string()));
        }

        if let Some(end_date) = end_date {
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(end_date.to_string()));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        query_string_parts.push("GROUP BY category ORDER BY total_amount DESC".to_string());

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, |row| {
                Ok(CategorySummary {
                    category: row.get(0)?,
                    transaction_count: row.get(1)?,
                    total_amount: row.get(2)?,
                    avg_amount: row.get(3)?,
                    min_amount: row.get(4)?,
                    max_amount: row.get(5)?,
                })
            })?
            .map(|maybe_summary| maybe_summary.map_err(Error::SqlError))
            .collect()
    }

    fn try_monthly_totals(&self) -> Result<Vec<MonthlyTotal>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT strftime('%Y-%m', date) AS month, SUM(amount) AS total_amount, \
                 COUNT(*) AS transaction_count \
                 FROM expenses GROUP BY strftime('%Y-%m', date) ORDER BY month DESC",
            )?
            .query_map([], |row| {
                Ok(MonthlyTotal {
                    month: row.get(0)?,
                    total_amount: row.get(1)?,
                    transaction_count: row.get(2)?,
                })
            })?
            .map(|maybe_total| maybe_total.map_err(Error::SqlError))
            .collect()
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// The creation timestamp is assigned here, at insert time.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        let connection = self.connection.lock().unwrap();
        let created_at = OffsetDateTime::now_utc();

        let expense = connection
            .prepare(
                "INSERT INTO expenses (description, amount, category, date, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, description, amount, category, date, notes, created_at",
            )?
            .query_row(
                (
                    expense.description(),
                    expense.amount(),
                    expense.category(),
                    expense.date(),
                    expense.notes(),
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(expense)
    }

    /// Replace every mutable field of the expense with ID `id`.
    ///
    /// The creation timestamp is not touched, so the expense keeps its place
    /// in tiebreak ordering.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingExpense] if `id` does not refer to an expense,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, id: DatabaseID, expense: NewExpense) -> Result<Expense, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "UPDATE expenses
                 SET description = ?1, amount = ?2, category = ?3, date = ?4, notes = ?5
                 WHERE id = ?6
                 RETURNING id, description, amount, category, date, notes, created_at",
            )?
            .query_row(
                (
                    expense.description(),
                    expense.amount(),
                    expense.category(),
                    expense.date(),
                    expense.notes(),
                    id,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
                error => error.into(),
            })
    }

    /// Remove the expense with ID `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingExpense] if `id` does not refer to an expense,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expenses WHERE id = ?1", (id,))?;

        if rows_deleted == 0 {
            return Err(Error::DeleteMissingExpense);
        }

        Ok(())
    }

    fn get_all(&self) -> Vec<Expense> {
        self.try_get_all().unwrap_or_else(|error| {
            tracing::warn!("could not list expenses, reporting no data: {error}");
            Vec::new()
        })
    }

    fn categories(&self) -> Vec<String> {
        let categories = self.try_categories().unwrap_or_else(|error| {
            tracing::warn!("could not list categories, falling back to defaults: {error}");
            Vec::new()
        });

        if categories.is_empty() {
            return DEFAULT_CATEGORIES
                .iter()
                .map(|category| category.to_string())
                .collect();
        }

        categories
    }

    fn search(&self, term: &str) -> Vec<Expense> {
        let term = term.trim();

        if term.is_empty() {
            return self.get_all();
        }

        self.try_search(term).unwrap_or_else(|error| {
            tracing::warn!("could not search expenses, reporting no data: {error}");
            Vec::new()
        })
    }

    fn summary(&self, start_date: Option<Date>, end_date: Option<Date>) -> Vec<CategorySummary> {
        self.try_summary(start_date, end_date).unwrap_or_else(|error| {
            tracing::warn!("could not summarise expenses, reporting no data: {error}");
            Vec::new()
        })
    }

    fn monthly_totals(&self) -> Vec<MonthlyTotal> {
        self.try_monthly_totals().unwrap_or_else(|error| {
            tracing::warn!("could not total expenses by month, reporting no data: {error}");
            Vec::new()
        })
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expenses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    date TEXT NOT NULL,
                    notes TEXT,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let description = row.get(offset + 1)?;
        let amount = row.get(offset + 2)?;
        let category = row.get(offset + 3)?;
        let date = row.get(offset + 4)?;
        let notes = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;

        Ok(Expense::new_unchecked(
            id,
            description,
            amount,
            category,
            date,
            notes,
            created_at,
        ))
    }
}

//! This file defines the type `Expense`, the core type of the application,
//! and the validating type used to create one.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, models::DatabaseID};

/// A single recorded transaction: an event where money was spent.
///
/// To create a new expense, build a [NewExpense] and pass it to
/// [ExpenseStore::create](crate::stores::ExpenseStore::create). Instances of
/// this type always come from the store, which is why there is no public
/// validating constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: DatabaseID,
    description: String,
    amount: f64,
    category: String,
    date: Date,
    notes: Option<String>,
    created_at: OffsetDateTime,
}

impl Expense {
    /// Create an expense without validating the fields.
    ///
    /// The caller should ensure the description and category are non-empty
    /// and the amount is positive. This function has `_unchecked` in the name
    /// but is not `unsafe`, because violating those invariants causes
    /// incorrect behaviour but does not affect memory safety.
    pub fn new_unchecked(
        id: DatabaseID,
        description: String,
        amount: f64,
        category: String,
        date: Date,
        notes: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            category,
            date,
            notes,
            created_at,
        }
    }

    /// The ID of the expense.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// A text description of what the money was spent on.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money spent, in currency units.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The user-defined category the expense belongs to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The calendar date the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Free-form notes attached to the expense, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// When the expense row was inserted. Used as a tiebreaker when ordering
    /// expenses that share a date.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// The validated field set for creating or replacing an expense.
///
/// Construction fails when the description or category is empty or the
/// amount is not positive, so a value of this type is always safe to write.
/// The date policy (no future dates, nothing older than ten years) is
/// enforced separately by [validate_expense](crate::validation::validate_expense),
/// not by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    description: String,
    amount: f64,
    category: String,
    date: Date,
    notes: Option<String>,
}

impl NewExpense {
    /// Create the field set for a new expense.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if `description` is empty or whitespace,
    /// - [Error::NonPositiveAmount] if `amount` is zero or negative,
    /// - or [Error::EmptyCategory] if `category` is empty or whitespace.
    pub fn new(
        description: &str,
        amount: f64,
        category: &str,
        date: Date,
        notes: Option<&str>,
    ) -> Result<Self, Error> {
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount(amount));
        }

        if category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        Ok(Self {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            date,
            notes: notes.map(|notes| notes.to_string()),
        })
    }

    /// A text description of what the money was spent on.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money spent, in currency units.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The user-defined category the expense belongs to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The calendar date the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Free-form notes attached to the expense, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

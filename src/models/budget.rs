//! This file defines the `Budget` type, a spending ceiling for one category,
//! and the types needed to create one.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, models::DatabaseID};

/// The renewal cadence of a budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetPeriod {
    /// The budget resets at the start of each calendar month.
    #[default]
    Monthly,
    /// The budget resets at the start of each week.
    Weekly,
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetPeriod::Monthly => write!(f, "Monthly"),
            BudgetPeriod::Weekly => write!(f, "Weekly"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "Monthly" => Ok(BudgetPeriod::Monthly),
            "Weekly" => Ok(BudgetPeriod::Weekly),
            _ => Err(Error::InvalidPeriod(text.to_string())),
        }
    }
}

/// A target spending ceiling for one category over one period.
///
/// There is at most one budget per category; setting a budget for a category
/// that already has one replaces it. Instances of this type always come from
/// [BudgetStore](crate::stores::BudgetStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    id: DatabaseID,
    category: String,
    amount: f64,
    period: BudgetPeriod,
    description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl Budget {
    /// Create a budget without validating the fields.
    ///
    /// The caller should ensure the category is non-empty and the amount is
    /// positive. This function has `_unchecked` in the name but is not
    /// `unsafe`, because violating those invariants causes incorrect
    /// behaviour but does not affect memory safety.
    pub fn new_unchecked(
        id: DatabaseID,
        category: String,
        amount: f64,
        period: BudgetPeriod,
        description: Option<String>,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            category,
            amount,
            period,
            description,
            created_at,
            updated_at,
        }
    }

    /// The ID of the budget.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The category this budget applies to. Unique across all budgets.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The spending ceiling, in currency units.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// How often the budget renews.
    pub fn period(&self) -> BudgetPeriod {
        self.period
    }

    /// An optional text description of the budget.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// When the budget row was first inserted.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the budget was last set. Refreshed on every upsert.
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}

/// The validated field set for creating or replacing a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    category: String,
    amount: f64,
    period: BudgetPeriod,
    description: Option<String>,
}

impl NewBudget {
    /// Create the field set for a new budget.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyCategory] if `category` is empty or whitespace,
    /// - or [Error::NonPositiveAmount] if `amount` is zero or negative.
    pub fn new(
        category: &str,
        amount: f64,
        period: BudgetPeriod,
        description: Option<&str>,
    ) -> Result<Self, Error> {
        if category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(Self {
            category: category.to_string(),
            amount,
            period,
            description: description.map(|description| description.to_string()),
        })
    }

    /// The category this budget applies to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The spending ceiling, in currency units.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// How often the budget renews.
    pub fn period(&self) -> BudgetPeriod {
        self.period
    }

    /// An optional text description of the budget.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod budget_period_tests {
    use crate::Error;

    use super::BudgetPeriod;

    #[test]
    fn round_trips_through_text() {
        for period in [BudgetPeriod::Monthly, BudgetPeriod::Weekly] {
            let parsed: BudgetPeriod = period.to_string().parse().unwrap();

            assert_eq!(parsed, period);
        }
    }

    #[test]
    fn defaults_to_monthly() {
        assert_eq!(BudgetPeriod::default(), BudgetPeriod::Monthly);
    }

    #[test]
    fn rejects_unknown_period() {
        let parsed = "Fortnightly".parse::<BudgetPeriod>();

        assert_eq!(parsed, Err(Error::InvalidPeriod("Fortnightly".to_string())));
    }
}

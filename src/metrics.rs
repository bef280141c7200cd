//! Pure functions that derive display metrics from already-fetched expense
//! and budget records. Nothing in this module touches storage.

use std::{collections::BTreeMap, fmt::Display, ops::RangeInclusive};

use time::{Date, Duration, OffsetDateTime};

use crate::models::{Budget, Expense};

/// How spending compares to a budget's ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetHealth {
    /// No positive budget amount has been set for the category.
    NoBudgetSet,
    /// Less than 75% of the budget has been used.
    Good,
    /// At least 75% of the budget has been used.
    OnTrack,
    /// At least 90% of the budget has been used.
    NearLimit,
    /// The budget has been met or exceeded.
    OverBudget,
}

impl Display for BudgetHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BudgetHealth::NoBudgetSet => "No Budget Set",
            BudgetHealth::Good => "Good",
            BudgetHealth::OnTrack => "On Track",
            BudgetHealth::NearLimit => "Near Limit",
            BudgetHealth::OverBudget => "Over Budget",
        };

        write!(f, "{label}")
    }
}

/// The state of one category's spending against its budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    /// Percentage of the budget used, capped at 100 for display. The raw
    /// (uncapped) ratio determines [BudgetStatus::health].
    pub percentage: f64,
    /// The budget amount minus the spent amount. May be negative.
    pub remaining: f64,
    /// The status label derived from the uncapped percentage.
    pub health: BudgetHealth,
}

/// Compute how `spent_amount` compares to `budget_amount`.
///
/// A non-positive budget amount yields [BudgetHealth::NoBudgetSet] with zero
/// percentage and zero remaining.
pub fn budget_status(spent_amount: f64, budget_amount: f64) -> BudgetStatus {
    if budget_amount <= 0.0 {
        return BudgetStatus {
            percentage: 0.0,
            remaining: 0.0,
            health: BudgetHealth::NoBudgetSet,
        };
    }

    let percentage = (spent_amount / budget_amount) * 100.0;
    let remaining = budget_amount - spent_amount;

    let health = if percentage >= 100.0 {
        BudgetHealth::OverBudget
    } else if percentage >= 90.0 {
        BudgetHealth::NearLimit
    } else if percentage >= 75.0 {
        BudgetHealth::OnTrack
    } else {
        BudgetHealth::Good
    };

    BudgetStatus {
        percentage: percentage.min(100.0),
        remaining,
        health,
    }
}

/// The category with the largest spending total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The summed amount spent in the category.
    pub amount: f64,
}

/// The category with the most recorded expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFrequency {
    /// The category name.
    pub category: String,
    /// How many expenses were recorded in the category.
    pub count: usize,
}

/// The single largest recorded expense.
#[derive(Debug, Clone, PartialEq)]
pub struct LargestExpense {
    /// What the money was spent on.
    pub description: String,
    /// The amount spent.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
}

/// Whether spending went up or down between the two trailing 30-day windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    /// The trailing 30-day sum is higher than the preceding one.
    Increasing,
    /// The trailing 30-day sum is the same or lower.
    Decreasing,
}

impl Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Spending in the trailing 30 days compared to the 30 days before that.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingTrend {
    /// The sum of amounts in the trailing 30-day window.
    pub current_period: f64,
    /// The sum of amounts in the 30 days preceding that window.
    pub previous_period: f64,
    /// Percentage change from the previous to the current window.
    pub change_percentage: f64,
    /// Whether the change is an increase or a decrease.
    pub direction: TrendDirection,
}

/// Headline observations over a set of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingInsights {
    /// The category with the largest spending total. Ties go to the
    /// alphabetically first category.
    pub highest_category: CategoryTotal,
    /// The category with the most expenses. Ties go to the alphabetically
    /// first category.
    pub most_frequent_category: CategoryFrequency,
    /// The single largest expense. Ties go to the earliest-listed expense.
    pub largest_expense: LargestExpense,
    /// Total spending divided by the number of days between the earliest and
    /// latest expense date, or the plain total when all expenses share one
    /// date.
    pub daily_average: f64,
    /// The 30-day spending trend. `None` when the preceding window has no
    /// spending, to avoid dividing by zero.
    pub trend: Option<SpendingTrend>,
}

/// Generate [SpendingInsights] over `expenses`, with the trend windows
/// anchored at the current UTC date. Returns `None` when `expenses` is empty.
pub fn spending_insights(expenses: &[Expense]) -> Option<SpendingInsights> {
    spending_insights_as_of(expenses, OffsetDateTime::now_utc().date())
}

/// The same observations as [spending_insights] with the trend windows
/// anchored at `today`.
pub fn spending_insights_as_of(expenses: &[Expense], today: Date) -> Option<SpendingInsights> {
    if expenses.is_empty() {
        return None;
    }

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category()).or_default() += expense.amount();
        *counts.entry(expense.category()).or_default() += 1;
    }

    // BTreeMap iteration is alphabetical, so keeping only strictly greater
    // values resolves ties in favour of the first category name.
    let highest_category = totals
        .iter()
        .fold(None::<CategoryTotal>, |best, (&category, &amount)| {
            match best {
                Some(best) if best.amount >= amount => Some(best),
                _ => Some(CategoryTotal {
                    category: category.to_string(),
                    amount,
                }),
            }
        })?;

    let most_frequent_category =
        counts
            .iter()
            .fold(None::<CategoryFrequency>, |best, (&category, &count)| {
                match best {
                    Some(best) if best.count >= count => Some(best),
                    _ => Some(CategoryFrequency {
                        category: category.to_string(),
                        count,
                    }),
                }
            })?;

    let largest = expenses
        .iter()
        .fold(None::<&Expense>, |best, expense| match best {
            Some(best) if best.amount() >= expense.amount() => Some(best),
            _ => Some(expense),
        })?;

    let total: f64 = expenses.iter().map(Expense::amount).sum();
    let min_date = expenses.iter().map(Expense::date).min()?;
    let max_date = expenses.iter().map(Expense::date).max()?;
    let span_days = (max_date - min_date).whole_days();
    let daily_average = if span_days > 0 {
        total / span_days as f64
    } else {
        total
    };

    let current_start = today - Duration::days(30);
    let previous_start = today - Duration::days(60);
    let current_period: f64 = expenses
        .iter()
        .filter(|expense| expense.date() >= current_start)
        .map(Expense::amount)
        .sum();
    let previous_period: f64 = expenses
        .iter()
        .filter(|expense| expense.date() >= previous_start && expense.date() < current_start)
        .map(Expense::amount)
        .sum();

    let trend = if previous_period > 0.0 {
        let change_percentage = ((current_period - previous_period) / previous_period) * 100.0;

        Some(SpendingTrend {
            current_period,
            previous_period,
            change_percentage,
            direction: if change_percentage > 0.0 {
                TrendDirection::Increasing
            } else {
                TrendDirection::Decreasing
            },
        })
    } else {
        None
    };

    Some(SpendingInsights {
        highest_category,
        most_frequent_category,
        largest_expense: LargestExpense {
            description: largest.description().to_string(),
            amount: largest.amount(),
            date: largest.date(),
        },
        daily_average,
        trend,
    })
}

/// A snapshot of the current month's spending against the combined budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialMetrics {
    /// The sum of this calendar month's expense amounts.
    pub total_spent_current_month: f64,
    /// How many expenses were recorded this calendar month.
    pub transactions_current_month: usize,
    /// The mean expense amount this calendar month, or zero when there are
    /// none.
    pub average_transaction_current_month: f64,
    /// The sum of every budget's amount, across periods.
    pub total_budget: f64,
    /// The total budget minus this month's spending. May be negative.
    pub remaining_budget: f64,
    /// This month's spending as a percentage of the total budget, or zero
    /// when no budget is set.
    pub budget_utilisation: f64,
}

/// Compute [FinancialMetrics] for the current UTC month. Returns `None` when
/// `expenses` is empty.
pub fn financial_metrics(expenses: &[Expense], budgets: &[Budget]) -> Option<FinancialMetrics> {
    financial_metrics_as_of(expenses, budgets, OffsetDateTime::now_utc().date())
}

/// The same snapshot as [financial_metrics] with "the current month" taken
/// from `today`.
pub fn financial_metrics_as_of(
    expenses: &[Expense],
    budgets: &[Budget],
    today: Date,
) -> Option<FinancialMetrics> {
    if expenses.is_empty() {
        return None;
    }

    let this_month: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| {
            expense.date().year() == today.year() && expense.date().month() == today.month()
        })
        .collect();

    let total_spent_current_month: f64 = this_month.iter().map(|expense| expense.amount()).sum();
    let transactions_current_month = this_month.len();
    let average_transaction_current_month = if transactions_current_month > 0 {
        total_spent_current_month / transactions_current_month as f64
    } else {
        0.0
    };

    let total_budget: f64 = budgets.iter().map(Budget::amount).sum();
    let remaining_budget = total_budget - total_spent_current_month;
    let budget_utilisation = if total_budget > 0.0 {
        (total_spent_current_month / total_budget) * 100.0
    } else {
        0.0
    };

    Some(FinancialMetrics {
        total_spent_current_month,
        transactions_current_month,
        average_transaction_current_month,
        total_budget,
        remaining_budget,
        budget_utilisation,
    })
}

/// Descriptive statistics over a (possibly filtered) set of expense amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseStatistics {
    /// How many expenses matched the filters.
    pub count: usize,
    /// The sum of the matching amounts.
    pub total: f64,
    /// The mean of the matching amounts.
    pub mean: f64,
    /// The median of the matching amounts.
    pub median: f64,
    /// The sample standard deviation, or `None` with fewer than two samples.
    pub std_dev: Option<f64>,
    /// The smallest matching amount.
    pub min: f64,
    /// The largest matching amount.
    pub max: f64,
    /// The 25th percentile (linear interpolation).
    pub q25: f64,
    /// The 75th percentile (linear interpolation).
    pub q75: f64,
}

/// Compute [ExpenseStatistics] over `expenses`, optionally restricted to one
/// category and an inclusive date range. Returns `None` when nothing matches.
pub fn expense_statistics(
    expenses: &[Expense],
    category: Option<&str>,
    date_range: Option<RangeInclusive<Date>>,
) -> Option<ExpenseStatistics> {
    let mut amounts: Vec<f64> = expenses
        .iter()
        .filter(|expense| category.is_none_or(|category| expense.category() == category))
        .filter(|expense| {
            date_range
                .as_ref()
                .is_none_or(|range| range.contains(&expense.date()))
        })
        .map(Expense::amount)
        .collect();

    if amounts.is_empty() {
        return None;
    }

    amounts.sort_by(f64::total_cmp);

    let count = amounts.len();
    let total: f64 = amounts.iter().sum();
    let mean = total / count as f64;

    let std_dev = if count > 1 {
        let variance = amounts
            .iter()
            .map(|amount| (amount - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    Some(ExpenseStatistics {
        count,
        total,
        mean,
        median: quantile(&amounts, 0.5),
        std_dev,
        min: amounts[0],
        max: amounts[count - 1],
        q25: quantile(&amounts, 0.25),
        q75: quantile(&amounts, 0.75),
    })
}

/// Linear-interpolated quantile of an already-sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let index = position.floor() as usize;
    let fraction = position - index as f64;

    if index + 1 < sorted.len() {
        sorted[index] + (sorted[index + 1] - sorted[index]) * fraction
    } else {
        sorted[index]
    }
}

#[cfg(test)]
mod budget_status_tests {
    use super::{BudgetHealth, budget_status};

    #[test]
    fn ninety_percent_is_near_limit() {
        let status = budget_status(90.0, 100.0);

        assert_eq!(status.percentage, 90.0);
        assert_eq!(status.remaining, 10.0);
        assert_eq!(status.health, BudgetHealth::NearLimit);
        assert_eq!(status.health.to_string(), "Near Limit");
    }

    #[test]
    fn one_hundred_percent_is_over_budget() {
        let status = budget_status(100.0, 100.0);

        assert_eq!(status.percentage, 100.0);
        assert_eq!(status.remaining, 0.0);
        assert_eq!(status.health, BudgetHealth::OverBudget);
    }

    #[test]
    fn percentage_is_capped_but_health_uses_raw_ratio() {
        let status = budget_status(150.0, 100.0);

        assert_eq!(status.percentage, 100.0);
        assert_eq!(status.remaining, -50.0);
        assert_eq!(status.health, BudgetHealth::OverBudget);
    }

    #[test]
    fn seventy_five_percent_is_on_track() {
        let status = budget_status(75.0, 100.0);

        assert_eq!(status.health, BudgetHealth::OnTrack);
    }

    #[test]
    fn below_seventy_five_percent_is_good() {
        let status = budget_status(74.9, 100.0);

        assert_eq!(status.health, BudgetHealth::Good);
    }

    #[test]
    fn zero_budget_means_no_budget_set() {
        let status = budget_status(0.0, 0.0);

        assert_eq!(status.percentage, 0.0);
        assert_eq!(status.remaining, 0.0);
        assert_eq!(status.health, BudgetHealth::NoBudgetSet);
        assert_eq!(status.health.to_string(), "No Budget Set");
    }
}

#[cfg(test)]
mod spending_insights_tests {
    use time::{Date, OffsetDateTime, macros::date};

    use crate::models::Expense;

    use super::{TrendDirection, spending_insights_as_of};

    const TODAY: Date = date!(2024 - 06 - 15);

    fn expense(description: &str, amount: f64, category: &str, date: Date) -> Expense {
        Expense::new_unchecked(
            1,
            description.to_string(),
            amount,
            category.to_string(),
            date,
            None,
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn empty_input_yields_no_insights() {
        assert_eq!(spending_insights_as_of(&[], TODAY), None);
    }

    #[test]
    fn identifies_headline_categories_and_largest_expense() {
        let expenses = [
            expense("Coffee", 4.0, "Food & Dining", date!(2024 - 06 - 10)),
            expense("Lunch", 12.0, "Food & Dining", date!(2024 - 06 - 11)),
            expense("Flight", 250.0, "Travel", date!(2024 - 06 - 12)),
        ];

        let insights = spending_insights_as_of(&expenses, TODAY).unwrap();

        assert_eq!(insights.highest_category.category, "Travel");
        assert_eq!(insights.highest_category.amount, 250.0);
        assert_eq!(insights.most_frequent_category.category, "Food & Dining");
        assert_eq!(insights.most_frequent_category.count, 2);
        assert_eq!(insights.largest_expense.description, "Flight");
        assert_eq!(insights.largest_expense.amount, 250.0);
        assert_eq!(insights.largest_expense.date, date!(2024 - 06 - 12));
    }

    #[test]
    fn daily_average_divides_by_observed_span() {
        let expenses = [
            expense("a", 10.0, "Other", date!(2024 - 06 - 01)),
            expense("b", 30.0, "Other", date!(2024 - 06 - 05)),
        ];

        let insights = spending_insights_as_of(&expenses, TODAY).unwrap();

        // 40.0 over a 4-day span.
        assert_eq!(insights.daily_average, 10.0);
    }

    #[test]
    fn daily_average_is_the_total_for_a_single_day() {
        let expenses = [
            expense("a", 10.0, "Other", date!(2024 - 06 - 01)),
            expense("b", 30.0, "Other", date!(2024 - 06 - 01)),
        ];

        let insights = spending_insights_as_of(&expenses, TODAY).unwrap();

        assert_eq!(insights.daily_average, 40.0);
    }

    #[test]
    fn trend_compares_trailing_windows() {
        let expenses = [
            // Within 30 days of TODAY.
            expense("recent", 150.0, "Other", date!(2024 - 06 - 01)),
            // Between 30 and 60 days before TODAY.
            expense("older", 100.0, "Other", date!(2024 - 04 - 25)),
        ];

        let trend = spending_insights_as_of(&expenses, TODAY)
            .unwrap()
            .trend
            .unwrap();

        assert_eq!(trend.current_period, 150.0);
        assert_eq!(trend.previous_period, 100.0);
        assert_eq!(trend.change_percentage, 50.0);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.direction.to_string(), "increasing");
    }

    #[test]
    fn trend_is_omitted_when_previous_window_is_empty() {
        let expenses = [expense("recent", 150.0, "Other", date!(2024 - 06 - 01))];

        let insights = spending_insights_as_of(&expenses, TODAY).unwrap();

        assert_eq!(insights.trend, None);
    }

    #[test]
    fn falling_spend_is_a_decreasing_trend() {
        let expenses = [
            expense("recent", 50.0, "Other", date!(2024 - 06 - 01)),
            expense("older", 100.0, "Other", date!(2024 - 04 - 25)),
        ];

        let trend = spending_insights_as_of(&expenses, TODAY)
            .unwrap()
            .trend
            .unwrap();

        assert_eq!(trend.change_percentage, -50.0);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }
}


#[cfg(test)]
mod expense_statistics_tests {
    use time::{Date, OffsetDateTime, macros::date};

    use crate::models::Expense;

    use super::expense_statistics;

    fn expense(amount: f64, category: &str, date: Date) -> Expense {
        Expense::new_unchecked(
            1,
            "test".to_string(),
            amount,
            category.to_string(),
            date,
            None,
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn computes_descriptive_statistics() {
        let expenses = [
            expense(1.0, "Other", date!(2024 - 06 - 01)),
            expense(2.0, "Other", date!(2024 - 06 - 02)),
            expense(3.0, "Other", date!(2024 - 06 - 03)),
            expense(4.0, "Other", date!(2024 - 06 - 04)),
        ];

        let stats = expense_statistics(&expenses, None, None).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, 10.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.q25, 1.75);
        assert_eq!(stats.q75, 3.25);
        // Sample standard deviation of 1..=4.
        let std_dev = stats.std_dev.unwrap();
        assert!((std_dev - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_no_standard_deviation() {
        let expenses = [expense(5.0, "Other", date!(2024 - 06 - 01))];

        let stats = expense_statistics(&expenses, None, None).unwrap();

        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn filters_by_category_and_date_range() {
        let expenses = [
            expense(10.0, "Travel", date!(2024 - 06 - 01)),
            expense(20.0, "Travel", date!(2024 - 06 - 20)),
            expense(99.0, "Other", date!(2024 - 06 - 02)),
        ];

        let stats = expense_statistics(
            &expenses,
            Some("Travel"),
            Some(date!(2024 - 06 - 01)..=date!(2024 - 06 - 10)),
        )
        .unwrap();

        assert_eq!(stats.count, 1);
        assert_eq!(stats.total, 10.0);
    }

    #[test]
    fn no_matches_yield_no_statistics() {
        let expenses = [expense(10.0, "Travel", date!(2024 - 06 - 01))];

        let stats = expense_statistics(&expenses, Some("Healthcare"), None);

        assert_eq!(stats, None);
    }
}

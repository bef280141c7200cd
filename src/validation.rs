//! Input validation for expense data.
//!
//! The storage layer only checks that fields are present and amounts are
//! positive (via [NewExpense](crate::models::NewExpense)); the date policy
//! lives here so that callers can collect every violated rule at once and
//! show them all to the user, rather than failing on the first.

use time::{Date, Duration, OffsetDateTime, macros::format_description};

use crate::Error;

/// How far in the past an expense date may lie, in days. Roughly ten years.
pub const MAX_EXPENSE_AGE_DAYS: i64 = 3650;

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
/// Returns an [Error::InvalidDateFormat] holding the rejected text if it is
/// not a valid date in that form.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let format = format_description!("[year]-[month]-[day]");

    Date::parse(text, &format).map_err(|_| Error::InvalidDateFormat(text.to_string()))
}

/// Check expense input against every validation rule and return the full
/// list of violations. An empty list means the input is valid.
///
/// "Today" is the current UTC date. The rules are:
/// - description must not be empty,
/// - amount must be greater than zero,
/// - category must not be empty,
/// - date must parse as `YYYY-MM-DD`,
/// - date must not be in the future,
/// - date must not be more than [MAX_EXPENSE_AGE_DAYS] days in the past.
pub fn validate_expense(description: &str, amount: f64, category: &str, date: &str) -> Vec<Error> {
    validate_expense_as_of(
        description,
        amount,
        category,
        date,
        OffsetDateTime::now_utc().date(),
    )
}

/// The same checks as [validate_expense] with "today" fixed to `today`.
pub fn validate_expense_as_of(
    description: &str,
    amount: f64,
    category: &str,
    date: &str,
    today: Date,
) -> Vec<Error> {
    let mut errors = Vec::new();

    if description.trim().is_empty() {
        errors.push(Error::EmptyDescription);
    }

    if amount <= 0.0 {
        errors.push(Error::NonPositiveAmount(amount));
    }

    if category.trim().is_empty() {
        errors.push(Error::EmptyCategory);
    }

    match parse_date(date) {
        Ok(parsed) => {
            if parsed > today {
                errors.push(Error::FutureDate(parsed));
            } else if parsed < today - Duration::days(MAX_EXPENSE_AGE_DAYS) {
                errors.push(Error::DateTooOld(parsed));
            }
        }
        Err(error) => errors.push(error),
    }

    errors
}

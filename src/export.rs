//! Serializes already-fetched record sequences to CSV and JSON download
//! payloads. Dates are rendered as ISO `YYYY-MM-DD` strings and timestamps
//! as RFC 3339; no storage access happens here.

use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::{
    Error,
    models::{Budget, DatabaseID, Expense},
};

#[derive(Serialize)]
struct ExpenseRecord<'a> {
    id: DatabaseID,
    description: &'a str,
    amount: f64,
    category: &'a str,
    date: String,
    notes: Option<&'a str>,
    created_at: String,
}

impl<'a> ExpenseRecord<'a> {
    fn from_expense(expense: &'a Expense) -> Result<Self, Error> {
        Ok(Self {
            id: expense.id(),
            description: expense.description(),
            amount: expense.amount(),
            category: expense.category(),
            date: expense.date().to_string(),
            notes: expense.notes(),
            created_at: format_timestamp(expense.created_at())?,
        })
    }
}

#[derive(Serialize)]
struct BudgetRecord<'a> {
    id: DatabaseID,
    category: &'a str,
    amount: f64,
    period: String,
    description: Option<&'a str>,
    created_at: String,
    updated_at: String,
}

impl<'a> BudgetRecord<'a> {
    fn from_budget(budget: &'a Budget) -> Result<Self, Error> {
        Ok(Self {
            id: budget.id(),
            category: budget.category(),
            amount: budget.amount(),
            period: budget.period().to_string(),
            description: budget.description(),
            created_at: format_timestamp(budget.created_at())?,
            updated_at: format_timestamp(budget.updated_at())?,
        })
    }
}

fn format_timestamp(timestamp: time::OffsetDateTime) -> Result<String, Error> {
    timestamp
        .format(&Rfc3339)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))
}

/// Render `expenses` as CSV with a header row, one row per expense.
///
/// The columns match the record fields. The notes column is omitted when
/// `include_notes` is false.
///
/// # Errors
/// Returns an [Error::CSVSerializationError] if a record could not be
/// written.
pub fn expenses_to_csv(expenses: &[Expense], include_notes: bool) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: &[&str] = if include_notes {
        &["id", "description", "amount", "category", "date", "notes", "created_at"]
    } else {
        &["id", "description", "amount", "category", "date", "created_at"]
    };
    writer
        .write_record(header)
        .map_err(|error| Error::CSVSerializationError(error.to_string()))?;

    for expense in expenses {
        let record = ExpenseRecord::from_expense(expense)?;
        let mut fields = vec![
            record.id.to_string(),
            record.description.to_string(),
            record.amount.to_string(),
            record.category.to_string(),
            record.date,
        ];

        if include_notes {
            fields.push(record.notes.unwrap_or_default().to_string());
        }

        fields.push(record.created_at);

        writer
            .write_record(&fields)
            .map_err(|error| Error::CSVSerializationError(error.to_string()))?;
    }

    finish_csv(writer)
}

/// Render `budgets` as CSV with a header row, one row per budget.
///
/// # Errors
/// Returns an [Error::CSVSerializationError] if a record could not be
/// written.
pub fn budgets_to_csv(budgets: &[Budget]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for budget in budgets {
        let record = BudgetRecord::from_budget(budget)?;
        writer
            .serialize(record)
            .map_err(|error| Error::CSVSerializationError(error.to_string()))?;
    }

    finish_csv(writer)
}

/// Render `expenses` as a JSON array of objects, one per expense, dates as
/// ISO strings.
///
/// # Errors
/// Returns an [Error::JSONSerializationError] if the records could not be
/// serialized.
pub fn expenses_to_json(expenses: &[Expense]) -> Result<String, Error> {
    let records = expenses
        .iter()
        .map(ExpenseRecord::from_expense)
        .collect::<Result<Vec<_>, _>>()?;

    serde_json::to_string_pretty(&records)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))
}

/// Render `budgets` as a JSON array of objects, one per budget.
///
/// # Errors
/// Returns an [Error::JSONSerializationError] if the records could not be
/// serialized.
pub fn budgets_to_json(budgets: &[Budget]) -> Result<String, Error> {
    let records = budgets
        .iter()
        .map(BudgetRecord::from_budget)
        .collect::<Result<Vec<_>, _>>()?;

    serde_json::to_string_pretty(&records)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CSVSerializationError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CSVSerializationError(error.to_string()))
}

#[cfg(test)]
mod export_tests {
    use time::macros::{datetime, date};

    use crate::models::{Budget, BudgetPeriod, Expense};

    use super::{budgets_to_csv, budgets_to_json, expenses_to_csv, expenses_to_json};

    fn test_expenses() -> Vec<Expense> {
        vec![
            Expense::new_unchecked(
                1,
                "Coffee".to_string(),
                4.5,
                "Food & Dining".to_string(),
                date!(2024 - 01 - 05),
                Some("oat milk".to_string()),
                datetime!(2024-01-05 09:00:00 UTC),
            ),
            Expense::new_unchecked(
                2,
                "Bus pass".to_string(),
                60.0,
                "Transportation".to_string(),
                date!(2024 - 01 - 01),
                None,
                datetime!(2024-01-01 08:30:00 UTC),
            ),
        ]
    }

    #[test]
    fn expenses_csv_has_header_and_one_row_per_record() {
        let csv = expenses_to_csv(&test_expenses(), true).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,description,amount,category,date,notes,created_at"
        );
        assert_eq!(
            lines[1],
            "1,Coffee,4.5,Food & Dining,2024-01-05,oat milk,2024-01-05T09:00:00Z"
        );
        assert_eq!(
            lines[2],
            "2,Bus pass,60,Transportation,2024-01-01,,2024-01-01T08:30:00Z"
        );
    }

    #[test]
    fn expenses_csv_can_omit_notes() {
        let csv = expenses_to_csv(&test_expenses(), false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,description,amount,category,date,created_at");
        assert!(!csv.contains("oat milk"));
    }

    #[test]
    fn empty_expense_csv_is_just_the_header() {
        let csv = expenses_to_csv(&[], true).unwrap();

        assert_eq!(
            csv.trim_end(),
            "id,description,amount,category,date,notes,created_at"
        );
    }

    #[test]
    fn expenses_json_round_trips_the_visible_fields() {
        let json = expenses_to_json(&test_expenses()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], 1);
        assert_eq!(records[0]["description"], "Coffee");
        assert_eq!(records[0]["amount"], 4.5);
        assert_eq!(records[0]["date"], "2024-01-05");
        assert_eq!(records[0]["notes"], "oat milk");
        assert_eq!(records[1]["notes"], serde_json::Value::Null);
    }

    #[test]
    fn budgets_export_includes_period_as_text() {
        let budgets = vec![Budget::new_unchecked(
            1,
            "Food & Dining".to_string(),
            300.0,
            BudgetPeriod::Monthly,
            None,
            datetime!(2024-01-01 00:00:00 UTC),
            datetime!(2024-02-01 00:00:00 UTC),
        )];

        let csv = budgets_to_csv(&budgets).unwrap();
        assert!(csv.starts_with(
            "id,category,amount,period,description,created_at,updated_at"
        ));
        assert!(csv.contains("Monthly"));

        let json: serde_json::Value =
            serde_json::from_str(&budgets_to_json(&budgets).unwrap()).unwrap();
        assert_eq!(json[0]["period"], "Monthly");
        assert_eq!(json[0]["updated_at"], "2024-02-01T00:00:00Z");
    }
}

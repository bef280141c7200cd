use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendlog::{
    models::{BudgetPeriod, NewBudget, NewExpense},
    stores::{BudgetStore, ExpenseStore, sqlite::create_stores},
};

/// A utility for creating a test database for spendlog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    tracing::info!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let (mut expense_store, mut budget_store) = create_stores(conn)?;

    tracing::info!("Creating test expenses...");
    let today = OffsetDateTime::now_utc().date();
    let test_expenses = [
        ("Coffee", 4.50, "Food & Dining", 1, Some("oat milk")),
        ("Groceries", 82.30, "Food & Dining", 2, None),
        ("Bus pass", 60.00, "Transportation", 3, Some("monthly top-up")),
        ("Cinema", 15.50, "Entertainment", 5, None),
        ("Electricity", 120.00, "Bills & Utilities", 8, None),
        ("Pharmacy", 23.10, "Healthcare", 12, None),
        ("Paperback", 12.99, "Shopping", 20, None),
        ("Weekend trip", 240.00, "Travel", 35, Some("split with flatmate")),
    ];

    for (description, amount, category, days_ago, notes) in test_expenses {
        let date = today - Duration::days(days_ago);
        let expense = NewExpense::new(description, amount, category, date, notes)?;
        expense_store.create(expense)?;
    }

    tracing::info!("Creating test budgets...");
    let test_budgets = [
        ("Food & Dining", 400.0, BudgetPeriod::Monthly),
        ("Transportation", 80.0, BudgetPeriod::Monthly),
        ("Entertainment", 30.0, BudgetPeriod::Weekly),
    ];

    for (category, amount, period) in test_budgets {
        let budget = NewBudget::new(category, amount, period, None)?;
        budget_store.upsert(budget)?;
    }

    tracing::info!("Success!");

    Ok(())
}

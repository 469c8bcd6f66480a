use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatementLine {
    pub name: String,
    pub amount: f64,
    pub formatted: String,
}

/// Printable summary of the current month.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub generated_on: NaiveDate,
    pub currency: String,
    pub working_days: u32,
    pub bills: Vec<StatementLine>,
    pub total_expenses: StatementLine,
    pub profit: StatementLine,
    pub savings: StatementLine,
    pub daily_earnings: StatementLine,
}

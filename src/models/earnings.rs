use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bill::CreateBill;
use super::input::{lenient_f64, lenient_i64};

/// Ad-hoc calculation request; nothing is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarningsRequest {
    #[serde(default)]
    pub bills: Vec<CreateBill>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub profit: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub savings: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub off_days: i64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Any day of the month to plan for; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Raw result of the daily earnings formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarningsBreakdown {
    pub total_expenses: f64,
    pub profit: f64,
    pub savings: f64,
    pub required_total: f64,
    pub days_in_month: u32,
    pub off_days: u32,
    pub working_days: u32,
    pub daily_earnings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedEarnings {
    pub total_expenses: String,
    pub profit: String,
    pub savings: String,
    pub required_total: String,
    pub daily_earnings: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsSummary {
    #[serde(flatten)]
    pub breakdown: EarningsBreakdown,
    pub currency: String,
    pub currency_symbol: String,
    pub formatted: FormattedEarnings,
}

use serde::{Deserialize, Serialize};

use super::bill::{default_bills, Bill};
use super::input::{lenient_f64, lenient_opt_f64, lenient_opt_i64, lenient_u32, non_negative};

pub const DEFAULT_PROFIT: f64 = 1000.0;
pub const DEFAULT_SAVINGS: f64 = 500.0;
pub const DEFAULT_OFF_DAYS: u32 = 8;
pub const DEFAULT_CURRENCY: &str = "USD";

/// Everything the planner remembers between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub bills: Vec<Bill>,
    #[serde(deserialize_with = "lenient_f64")]
    pub profit: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub savings: f64,
    #[serde(deserialize_with = "lenient_u32")]
    pub off_days: u32,
    pub currency: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            bills: default_bills(),
            profit: DEFAULT_PROFIT,
            savings: DEFAULT_SAVINGS,
            off_days: DEFAULT_OFF_DAYS,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl PlannerSettings {
    /// Clamps every numeric field into its valid range for a month of `days_in_month` days.
    pub fn sanitized(mut self, days_in_month: u32) -> Self {
        for bill in &mut self.bills {
            bill.amount = non_negative(bill.amount);
        }
        self.profit = non_negative(self.profit);
        self.savings = non_negative(self.savings);
        self.off_days = self.off_days.min(days_in_month);
        self
    }

    pub fn bill_amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.bills.iter().map(|b| b.amount)
    }
}

/// Partial update of the scalar goals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoals {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub profit: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub savings: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub off_days: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl UpdateGoals {
    pub fn is_empty(&self) -> bool {
        self.profit.is_none() && self.savings.is_none() && self.off_days.is_none() && self.currency.is_none()
    }
}

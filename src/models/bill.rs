use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::input::{lenient_f64, lenient_opt_f64, non_negative};

// A named monthly expense. Insertion order is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
}

impl Bill {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: non_negative(amount),
        }
    }

    /// Bills shown on statements and sent to the advisor: named, with a positive amount.
    pub fn is_listed(&self) -> bool {
        !self.name.trim().is_empty() && self.amount > 0.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBill {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
}

impl From<CreateBill> for Bill {
    fn from(value: CreateBill) -> Self {
        Bill::new(value.name, value.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBill {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub amount: Option<f64>,
}

impl UpdateBill {
    pub fn apply(self, bill: &mut Bill) {
        if let Some(name) = self.name {
            bill.name = name;
        }
        if let Some(amount) = self.amount {
            bill.amount = non_negative(amount);
        }
    }
}

/// The bills a new planner starts with.
pub fn default_bills() -> Vec<Bill> {
    vec![
        Bill::new("Monthly Rent", 1200.0),
        Bill::new("Electricity Bill", 75.0),
        Bill::new("Internet", 60.0),
        Bill::new("Transport", 150.0),
    ]
}

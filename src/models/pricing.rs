use serde::{Deserialize, Serialize};

use super::input::{lenient_f64, lenient_i64};

/// Absent numeric fields read as 0; the demo values live in `Default` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_items: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub desired_profit: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub currency: Option<String>,
}

impl Default for PricingRequest {
    fn default() -> Self {
        Self {
            product_name: "50kg Bag of Rice".to_string(),
            total_cost: 200_000.0,
            total_items: 50,
            desired_profit: 40_000.0,
            unit: "kg".to_string(),
            currency: None,
        }
    }
}

/// Per-item figures for a bulk purchase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub cost_per_item: f64,
    pub profit_per_item: f64,
    pub selling_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedPricing {
    pub cost_per_item: String,
    pub profit_per_item: String,
    pub selling_price: String,
    pub desired_profit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResult {
    pub product_name: String,
    pub unit_label: String,
    pub total_cost: f64,
    pub total_items: i64,
    pub desired_profit: f64,
    #[serde(flatten)]
    pub breakdown: PricingBreakdown,
    pub currency: String,
    pub formatted: FormattedPricing,
}

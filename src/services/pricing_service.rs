use crate::models::input::non_negative;
use crate::models::{FormattedPricing, PricingBreakdown, PricingRequest, PricingResult, DEFAULT_CURRENCY};
use crate::services::currency_service;

/// Per-item cost and the price that spreads `desired_profit` across the lot.
/// A lot with no items prices everything at 0.
pub fn calculate(total_cost: f64, total_items: i64, desired_profit: f64) -> PricingBreakdown {
    if total_items <= 0 {
        return PricingBreakdown {
            cost_per_item: 0.0,
            profit_per_item: 0.0,
            selling_price: 0.0,
        };
    }

    let items = total_items as f64;
    let cost_per_item = non_negative(total_cost) / items;
    let profit_per_item = non_negative(desired_profit) / items;

    PricingBreakdown {
        cost_per_item,
        profit_per_item,
        selling_price: cost_per_item + profit_per_item,
    }
}

/// "pieces" -> "piece", "kg" -> "kg", "" -> "Item".
pub fn singular_unit(unit: &str) -> String {
    if unit.is_empty() {
        return "Item".to_string();
    }
    let mut chars = unit.chars();
    match chars.next_back() {
        Some('s' | 'S') if unit.chars().count() > 1 => chars.as_str().to_string(),
        _ => unit.to_string(),
    }
}

pub fn price(request: &PricingRequest) -> PricingResult {
    let total_cost = non_negative(request.total_cost);
    let total_items = request.total_items.max(0);
    let desired_profit = non_negative(request.desired_profit);
    let breakdown = calculate(total_cost, total_items, desired_profit);

    let currency = request
        .currency
        .clone()
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let per_item = |value: f64| currency_service::format_with_digits(value, &currency, 2, 4);
    let summary = |value: f64| currency_service::format_with_digits(value, &currency, 2, 2);

    PricingResult {
        product_name: request.product_name.clone(),
        unit_label: singular_unit(&request.unit),
        total_cost,
        total_items,
        desired_profit,
        formatted: FormattedPricing {
            cost_per_item: per_item(breakdown.cost_per_item),
            profit_per_item: per_item(breakdown.profit_per_item),
            selling_price: summary(breakdown.selling_price),
            desired_profit: summary(desired_profit),
        },
        breakdown,
        currency,
    }
}

use chrono::{Datelike, NaiveDate};

use crate::models::input::non_negative;
use crate::models::{EarningsBreakdown, EarningsRequest, EarningsSummary, FormattedEarnings, PlannerSettings};
use crate::services::currency_service;

/// Number of days in the calendar month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Returns `(clamped_off_days, working_days)`; working days never go negative.
pub fn working_days(days_in_month: u32, off_days: i64) -> (u32, u32) {
    let clamped = off_days.clamp(0, days_in_month as i64) as u32;
    (clamped, days_in_month - clamped)
}

/// Daily income needed to cover expenses, profit and savings over the
/// working days of the month containing `date`.
///
/// Invalid or negative amounts count as 0 and zero working days yield a daily
/// target of 0 rather than an error.
pub fn calculate<I>(amounts: I, profit: f64, savings: f64, off_days: i64, date: NaiveDate) -> EarningsBreakdown
where
    I: IntoIterator<Item = f64>,
{
    let days = days_in_month(date);
    let (off_days, working_days) = working_days(days, off_days);

    let total_expenses: f64 = amounts.into_iter().map(non_negative).sum();
    let profit = non_negative(profit);
    let savings = non_negative(savings);
    let required_total = total_expenses + profit + savings;

    let daily = if working_days > 0 {
        required_total / working_days as f64
    } else {
        0.0
    };

    EarningsBreakdown {
        total_expenses,
        profit,
        savings,
        required_total,
        days_in_month: days,
        off_days,
        working_days,
        daily_earnings: daily.max(0.0),
    }
}

pub fn summarize(breakdown: EarningsBreakdown, currency: &str) -> EarningsSummary {
    let fmt = |value: f64| currency_service::format(value, currency);
    EarningsSummary {
        formatted: FormattedEarnings {
            total_expenses: fmt(breakdown.total_expenses),
            profit: fmt(breakdown.profit),
            savings: fmt(breakdown.savings),
            required_total: fmt(breakdown.required_total),
            daily_earnings: fmt(breakdown.daily_earnings),
        },
        breakdown,
        currency: currency.to_string(),
        currency_symbol: currency_service::symbol(currency).to_string(),
    }
}

pub fn summarize_settings(settings: &PlannerSettings, date: NaiveDate) -> EarningsSummary {
    let breakdown = calculate(
        settings.bill_amounts(),
        settings.profit,
        settings.savings,
        settings.off_days as i64,
        date,
    );
    summarize(breakdown, &settings.currency)
}

pub fn summarize_request(request: &EarningsRequest, today: NaiveDate) -> EarningsSummary {
    let date = request.date.unwrap_or(today);
    let breakdown = calculate(
        request.bills.iter().map(|b| b.amount),
        request.profit,
        request.savings,
        request.off_days,
        date,
    );
    let currency = request.currency.as_deref().unwrap_or(crate::models::DEFAULT_CURRENCY);
    summarize(breakdown, currency)
}

mod advice;
mod bill;
mod currency;
mod earnings;
pub mod input;
mod planner;
mod pricing;
mod statement;

pub use advice::{
    AdviceState, FinancialAdvice, IncomeSuggestion, LatestAdvice, SavingsSuggestion, ADVICE_DISCLAIMER,
};
pub use bill::{default_bills, Bill, CreateBill, UpdateBill};
pub use currency::{Currency, CurrencyPreview};
pub use earnings::{EarningsBreakdown, EarningsRequest, EarningsSummary, FormattedEarnings};
pub use planner::{
    PlannerSettings, UpdateGoals, DEFAULT_CURRENCY, DEFAULT_OFF_DAYS, DEFAULT_PROFIT, DEFAULT_SAVINGS,
};
pub use pricing::{FormattedPricing, PricingBreakdown, PricingRequest, PricingResult};
pub use statement::{Statement, StatementLine};

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::errors::LlmError;
use crate::models::{
    AdviceState, EarningsSummary, FinancialAdvice, LatestAdvice, PlannerSettings, ADVICE_DISCLAIMER,
};
use crate::services::currency_service;
use crate::services::llm_service::LlmService;

/// Response schema handed to the model; field names match [`FinancialAdvice`].
pub fn advice_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallSummary": {
                "type": "STRING",
                "description": "A short, friendly assessment of the user's monthly budget and goals."
            },
            "savingsSuggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "suggestion": { "type": "STRING" },
                        "potentialSavings": {
                            "type": "NUMBER",
                            "description": "Estimated monthly savings in the user's currency."
                        }
                    },
                    "required": ["suggestion", "potentialSavings"]
                }
            },
            "incomeSuggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "idea": { "type": "STRING" },
                        "potentialIncome": {
                            "type": "NUMBER",
                            "description": "Estimated extra monthly income in the user's currency."
                        }
                    },
                    "required": ["idea", "potentialIncome"]
                }
            },
            "encouragement": {
                "type": "STRING",
                "description": "One or two motivating sentences."
            }
        },
        "required": ["overallSummary", "savingsSuggestions", "incomeSuggestions", "encouragement"]
    })
}

/// Builds the coaching prompt from the planner and its computed summary.
pub fn build_advice_prompt(settings: &PlannerSettings, summary: &EarningsSummary) -> String {
    let currency = &summary.currency;
    let fmt = |value: f64| currency_service::format(value, currency);
    let b = &summary.breakdown;

    let bills: Vec<String> = settings
        .bills
        .iter()
        .filter(|bill| bill.is_listed())
        .map(|bill| format!("- {}: {}", bill.name.trim(), fmt(bill.amount)))
        .collect();
    let bills = if bills.is_empty() {
        "- (no bills entered)".to_string()
    } else {
        bills.join("\n")
    };

    format!(
        "You are a friendly, practical personal finance coach. Review this person's monthly plan \
         and answer only with JSON that follows the provided schema.\n\n\
         Currency: {currency}\n\
         Working days this month: {working} ({off} days off out of {days})\n\
         Total monthly expenses: {expenses}\n\
         Desired monthly profit: {profit}\n\
         Monthly savings goal: {savings}\n\
         Required daily earnings: {daily} per working day\n\n\
         Monthly bills:\n{bills}\n\n\
         Give a brief overall summary of the plan, three specific ways to reduce these expenses \
         with the estimated monthly saving for each, three realistic ideas to earn extra income \
         with the estimated monthly income for each, and a short encouraging message. \
         Express every amount as a plain number in {currency}.",
        currency = currency,
        working = b.working_days,
        off = b.off_days,
        days = b.days_in_month,
        expenses = fmt(b.total_expenses),
        profit = fmt(b.profit),
        savings = fmt(b.savings),
        daily = fmt(b.daily_earnings),
        bills = bills,
    )
}

/// Parses the model's JSON text, tolerating a surrounding Markdown code fence.
pub fn parse_advice_response(raw: &str) -> Result<FinancialAdvice, LlmError> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let mut advice: FinancialAdvice =
        serde_json::from_str(cleaned).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    if advice.overall_summary.trim().is_empty()
        && advice.savings_suggestions.is_empty()
        && advice.income_suggestions.is_empty()
    {
        return Err(LlmError::InvalidResponse("Advice response was empty".to_string()));
    }
    // The model does not get to report errors through this field.
    advice.error = None;
    Ok(advice)
}

#[derive(Debug, Default)]
struct Displayed {
    ticket: u64,
    advice: Option<FinancialAdvice>,
    updated_at: Option<DateTime<Utc>>,
}

/// Decrements the in-flight counter even if the request future is dropped.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs advice requests and tracks what should be displayed.
///
/// Requests are not de-duplicated. Each caller gets its own result, while the
/// displayed advice only moves forward: a response is shown only if no later
/// request has already completed.
pub struct AdviceService {
    llm: Arc<LlmService>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
    displayed: RwLock<Displayed>,
}

impl AdviceService {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self {
            llm,
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            displayed: RwLock::new(Displayed::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.llm.is_enabled()
    }

    pub fn state(&self) -> AdviceState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            AdviceState::InFlight
        } else {
            AdviceState::Idle
        }
    }

    /// Asks the model for advice. Failures come back as advice carrying an
    /// error message; this never returns `Err`.
    ///
    /// The request runs on its own task, so it still completes and updates
    /// [`latest`](Self::latest) if the caller goes away.
    pub async fn request_advice(self: &Arc<Self>, settings: PlannerSettings, summary: EarningsSummary) -> FinancialAdvice {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let service = Arc::clone(self);
        let task = tokio::spawn(async move {
            let _guard = InFlightGuard::enter(&service.in_flight);
            service.run(ticket, &settings, &summary).await
        });

        match task.await {
            Ok(advice) => advice,
            Err(e) => {
                error!("Advice #{} task failed: {}", ticket, e);
                FinancialAdvice::from_error(LlmError::ApiError(e.to_string()).user_message())
            }
        }
    }

    async fn run(&self, ticket: u64, settings: &PlannerSettings, summary: &EarningsSummary) -> FinancialAdvice {
        let advice = match self.generate(settings, summary).await {
            Ok(advice) => {
                info!(
                    "Advice #{} ready: {} savings tips, {} income ideas",
                    ticket,
                    advice.savings_suggestions.len(),
                    advice.income_suggestions.len()
                );
                advice
            }
            Err(e) => {
                error!("Advice #{} failed: {}", ticket, e);
                FinancialAdvice::from_error(e.user_message())
            }
        };

        let mut displayed = self.displayed.write().await;
        if ticket > displayed.ticket {
            displayed.ticket = ticket;
            displayed.advice = Some(advice.clone());
            displayed.updated_at = Some(Utc::now());
        } else {
            warn!("Advice #{} finished after #{}; keeping the newer one", ticket, displayed.ticket);
        }

        advice
    }

    pub async fn latest(&self) -> LatestAdvice {
        let displayed = self.displayed.read().await;
        LatestAdvice {
            state: self.state(),
            advice: displayed.advice.clone(),
            updated_at: displayed.updated_at,
            disclaimer: ADVICE_DISCLAIMER.to_string(),
        }
    }

    async fn generate(&self, settings: &PlannerSettings, summary: &EarningsSummary) -> Result<FinancialAdvice, LlmError> {
        if !self.llm.is_enabled() {
            return Err(LlmError::Disabled);
        }
        let prompt = build_advice_prompt(settings, summary);
        let raw = self.llm.generate_json(prompt, advice_schema()).await?;
        parse_advice_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bill;
    use crate::services::earnings_service;
    use crate::services::llm_service::LlmProvider;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tokio::sync::Notify;

    const SAMPLE: &str = r#"{
        "overallSummary": "Your plan is achievable.",
        "savingsSuggestions": [{"suggestion": "Switch internet plan", "potentialSavings": 15}],
        "incomeSuggestions": [{"idea": "Weekend deliveries", "potentialIncome": 200}],
        "encouragement": "You've got this!"
    }"#;

    struct FixedProvider(String);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn generate_json(&self, _prompt: String, _schema: Value) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn generate_json(&self, _prompt: String, _schema: Value) -> Result<String, LlmError> {
            Err(LlmError::NetworkError("connection refused".to_string()))
        }
    }

    /// Answers "slow" for prompts listing the slow bill, only once `release` fires; "fast" otherwise.
    struct GatedProvider {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl LlmProvider for GatedProvider {
        async fn generate_json(&self, prompt: String, _schema: Value) -> Result<String, LlmError> {
            let slow = prompt.contains("Slow bill");
            if slow {
                self.release.notified().await;
            }
            let summary = if slow { "slow" } else { "fast" };
            Ok(format!(
                r#"{{"overallSummary": "{}", "savingsSuggestions": [], "incomeSuggestions": [], "encouragement": ""}}"#,
                summary
            ))
        }
    }

    struct SlowProvider {
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn generate_json(&self, _prompt: String, _schema: Value) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(SAMPLE.to_string())
        }
    }

    fn planner() -> (PlannerSettings, EarningsSummary) {
        let settings = PlannerSettings::default();
        let summary = earnings_service::summarize_settings(&settings, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        (settings, summary)
    }

    #[test]
    fn test_prompt_embeds_summary_and_listed_bills() {
        let (mut settings, _) = planner();
        settings.bills.push(Bill::new("", 99.0));
        let summary = earnings_service::summarize_settings(&settings, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        let prompt = build_advice_prompt(&settings, &summary);

        assert!(prompt.contains("Currency: USD"));
        assert!(prompt.contains("Working days this month: 22"));
        assert!(prompt.contains("- Monthly Rent: $1,200.00"));
        assert!(prompt.contains("Monthly savings goal: $500.00"));
        assert!(!prompt.contains("$99.00"));
    }

    #[test]
    fn test_prompt_without_bills() {
        let (mut settings, summary) = planner();
        settings.bills.clear();
        assert!(build_advice_prompt(&settings, &summary).contains("(no bills entered)"));
    }

    #[test]
    fn test_schema_requires_all_sections() {
        let schema = advice_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["properties"]["savingsSuggestions"]["items"]["properties"]["potentialSavings"]["type"], "NUMBER");
    }

    #[test]
    fn test_parse_plain_and_fenced_json() {
        let advice = parse_advice_response(SAMPLE).unwrap();
        assert_eq!(advice.savings_suggestions[0].potential_savings, 15.0);
        assert_eq!(advice.income_suggestions[0].idea, "Weekend deliveries");

        let fenced = format!("```json\n{}\n```", SAMPLE);
        assert_eq!(parse_advice_response(&fenced).unwrap(), advice);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_advice_response("not json"), Err(LlmError::InvalidResponse(_))));
        assert!(matches!(parse_advice_response("{}"), Err(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_successful_request_is_displayed() {
        let service = Arc::new(AdviceService::new(Arc::new(LlmService::with_provider(Arc::new(
            FixedProvider(SAMPLE.to_string()),
        )))));
        let (settings, summary) = planner();

        let advice = service.request_advice(settings.clone(), summary.clone()).await;
        assert!(!advice.is_error());

        let latest = service.latest().await;
        assert_eq!(latest.state, AdviceState::Idle);
        assert_eq!(latest.advice, Some(advice));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_advice() {
        let service = Arc::new(AdviceService::new(Arc::new(LlmService::with_provider(Arc::new(FailingProvider)))));
        let (settings, summary) = planner();

        let advice = service.request_advice(settings.clone(), summary.clone()).await;
        assert!(advice.is_error());
        assert!(advice.savings_suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_service_reports_configuration() {
        let service = Arc::new(AdviceService::new(Arc::new(LlmService::disabled())));
        let (settings, summary) = planner();
        let advice = service.request_advice(settings.clone(), summary.clone()).await;
        assert!(advice.error.unwrap().contains("API key"));
    }

    #[tokio::test]
    async fn test_stale_response_does_not_replace_newer_one() {
        let release = Arc::new(Notify::new());
        let service = Arc::new(AdviceService::new(Arc::new(LlmService::with_provider(Arc::new(
            GatedProvider { release: release.clone() },
        )))));
        let (settings, summary) = planner();

        let mut slow_settings = settings.clone();
        slow_settings.bills.push(Bill::new("Slow bill", 1.0));

        let slow = {
            let service = service.clone();
            let summary = summary.clone();
            tokio::spawn(async move { service.request_advice(slow_settings, summary).await })
        };

        // Let the slow request register itself before issuing the fast one.
        while service.state() != AdviceState::InFlight {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let fast = service.request_advice(settings.clone(), summary.clone()).await;
        assert_eq!(fast.overall_summary, "fast");
        assert_eq!(service.state(), AdviceState::InFlight);

        release.notify_one();
        let slow = slow.await.unwrap();
        assert_eq!(slow.overall_summary, "slow");

        let latest = service.latest().await;
        assert_eq!(latest.state, AdviceState::Idle);
        assert_eq!(latest.advice.unwrap().overall_summary, "fast");
    }

    #[tokio::test]
    async fn test_abandoned_request_still_updates_latest() {
        let finished = Arc::new(AtomicUsize::new(0));
        let service = Arc::new(AdviceService::new(Arc::new(LlmService::with_provider(Arc::new(
            SlowProvider { finished: finished.clone() },
        )))));
        let (settings, summary) = planner();

        let caller = tokio::time::timeout(Duration::from_millis(10), service.request_advice(settings, summary)).await;
        assert!(caller.is_err());
        assert_eq!(service.state(), AdviceState::InFlight);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);

        let latest = service.latest().await;
        assert_eq!(latest.state, AdviceState::Idle);
        assert_eq!(latest.advice.unwrap().overall_summary, "Your plan is achievable.");
    }
}

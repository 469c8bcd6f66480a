use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Field names follow the JSON schema handed to the model, hence camelCase.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSuggestion {
    pub suggestion: String,
    #[serde(default)]
    pub potential_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSuggestion {
    pub idea: String,
    #[serde(default)]
    pub potential_income: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAdvice {
    #[serde(default)]
    pub overall_summary: String,
    #[serde(default)]
    pub savings_suggestions: Vec<SavingsSuggestion>,
    #[serde(default)]
    pub income_suggestions: Vec<IncomeSuggestion>,
    #[serde(default)]
    pub encouragement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FinancialAdvice {
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceState {
    Idle,
    InFlight,
}

/// What the advice panel should currently show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestAdvice {
    pub state: AdviceState,
    pub advice: Option<FinancialAdvice>,
    pub updated_at: Option<DateTime<Utc>>,
    pub disclaimer: String,
}

pub const ADVICE_DISCLAIMER: &str =
    "Disclaimer: This is AI-generated advice and should not be considered professional financial guidance.";

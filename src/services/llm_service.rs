use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::LlmError;

/// Configuration for the hosted generative model
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub enabled: bool,
    pub provider: String,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "gemini".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Reads `GEMINI_API_KEY` (or `API_KEY`), `GEMINI_MODEL`, `GEMINI_BASE_URL`,
    /// `ADVICE_ENABLED` and `ADVICE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            enabled: std::env::var("ADVICE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(api_key.is_some()),
            provider: std::env::var("LLM_PROVIDER").unwrap_or(defaults.provider),
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            temperature: defaults.temperature,
            timeout_secs: std::env::var("ADVICE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends `prompt` and returns the raw JSON text the model produced for `schema`.
    async fn generate_json(&self, prompt: String, schema: Value) -> Result<String, LlmError>;
}

/// Gemini `generateContent` request/response structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

/// Google Gemini provider implementation
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn call_gemini(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_json(&self, prompt: String, schema: Value) -> Result<String, LlmError> {
        info!("Requesting structured completion (model: {})", self.model);

        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
                temperature: self.temperature,
            },
        };

        let response = self.call_gemini(&request).await?;

        if let Some(usage) = &response.usage_metadata {
            info!(
                "Completion generated. Tokens: {} prompt + {} completion = {} total",
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
                usage.total_token_count.unwrap_or(0)
            );
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(LlmError::InvalidResponse(format!("Empty completion (finish reason: {})", reason)));
        }

        Ok(text)
    }
}

/// Provider selection and the enabled/disabled switch
pub struct LlmService {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        let provider = if !config.enabled {
            info!("AI advice is disabled in configuration");
            None
        } else {
            match (config.provider.as_str(), config.api_key.clone()) {
                ("gemini", Some(api_key)) => match GeminiProvider::new(api_key, &config) {
                    Ok(provider) => {
                        info!("Initializing AI advice with provider: gemini ({})", config.model);
                        Some(Arc::new(provider) as Arc<dyn LlmProvider>)
                    }
                    Err(e) => {
                        warn!("Failed to create Gemini client: {}. AI advice disabled.", e);
                        None
                    }
                },
                (_, None) => {
                    warn!("AI API key not configured. AI advice disabled.");
                    None
                }
                (other, Some(_)) => {
                    warn!("Unknown LLM provider: {}. AI advice disabled.", other);
                    None
                }
            }
        };

        Self { provider }
    }

    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate_json(&self, prompt: String, schema: Value) -> Result<String, LlmError> {
        let provider = self.provider.as_ref().ok_or(LlmError::Disabled)?;
        provider.generate_json(prompt, schema).await
    }
}

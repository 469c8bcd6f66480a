use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response(),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response(),
        }
    }
}

/// Failures of the settings persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of the hosted generative model call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI advice is not configured")]
    Disabled,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Request to the AI service timed out")]
    Timeout,
    #[error("Rate limited by the AI service")]
    RateLimited,
    #[error("AI service error: {0}")]
    ApiError(String),
    #[error("Invalid response from the AI service: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Message shown to the user in place of advice.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::Disabled => {
                "AI advice is not available: no API key has been configured for the AI service.".to_string()
            }
            LlmError::RateLimited => {
                "The AI service quota has been reached. Please wait a moment before asking again.".to_string()
            }
            LlmError::Timeout => {
                "The AI coach took too long to respond. Please try again.".to_string()
            }
            _ => "Sorry, I couldn't generate financial advice at this time. Please try again later.".to_string(),
        }
    }
}

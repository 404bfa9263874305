//! Error types for the auditor service.
//!
//! - `AppError`: everything an audit or recommendation request can fail with
//! - `ApiError`: HTTP wrapper that turns an `AppError` into a JSON response
//! - `Result<T>`: alias using `AppError`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable request input. Raised before any network activity.
    #[error("{0}")]
    InvalidInput(String),

    /// Transport failure on the primary fetch.
    #[error("{message}")]
    Fetch { url: String, message: String },

    #[error("request to {url} timed out")]
    FetchTimeout { url: String },

    /// Primary fetch answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    /// Analyzer execution failed outside a single check.
    #[error("{0}")]
    Analysis(String),

    #[error("LLM request timed out. The AI server may be busy.")]
    LlmTimeout,

    #[error("Could not connect to AI server. Please check if the Ollama service is running.")]
    LlmUnavailable,

    #[error("LLM service returned status {0}")]
    LlmStatus(u16),

    #[error("AI recommendation failed: {0}")]
    Llm(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Primary-fetch failures, as opposed to internal ones.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::FetchTimeout { .. } | Self::FetchStatus { .. }
        )
    }

    fn is_llm(&self) -> bool {
        matches!(
            self,
            Self::LlmTimeout | Self::LlmUnavailable | Self::LlmStatus(_) | Self::Llm(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            e if e.is_fetch() => StatusCode::BAD_REQUEST,
            Self::LlmTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::LlmUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// API ERROR (FOR AXUM)
// ============================================================================

/// An `AppError` plus the URL the request was about, when there was one.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub url: Option<String>,
}

impl ApiError {
    pub fn new(error: AppError) -> Self {
        Self { error, url: None }
    }

    pub fn with_url(error: AppError, url: impl Into<String>) -> Self {
        Self {
            error,
            url: Some(url.into()),
        }
    }

    fn body(&self) -> serde_json::Value {
        let e = &self.error;
        if e.is_llm() {
            return json!({ "status": "error", "error": e.to_string() });
        }
        let message = match e {
            AppError::InvalidInput(_) => return json!({ "error": e.to_string() }),
            e if e.is_fetch() => format!("Failed to fetch URL: {e}"),
            e => format!("Analysis failed: {e}"),
        };
        json!({ "error": message, "url": self.url })
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::error!("[HTTP] {} -> {}", status, self.error);
        } else {
            tracing::warn!("[HTTP] {} -> {}", status, self.error);
        }
        (status, Json(self.body())).into_response()
    }
}

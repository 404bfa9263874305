use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::commands::AppState;
use crate::domain::{AuditReport, CategoryKey};
use crate::error::{ApiError, AppError};
use crate::service::normalize_url;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
    /// All nine categories when omitted. Unknown keys are ignored.
    pub categories: Option<Vec<String>>,
}

impl AnalyzeRequest {
    pub fn category_keys(&self) -> Vec<CategoryKey> {
        match &self.categories {
            Some(requested) => CategoryKey::select(requested),
            None => CategoryKey::ALL.to_vec(),
        }
    }
}

/// `POST /api/analyze`
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AuditReport>, ApiError> {
    if request.url.trim().is_empty() {
        return Err(AppError::invalid_input("URL is required").into());
    }
    let url = normalize_url(&request.url);
    let keys = request.category_keys();
    let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    tracing::info!("[HTTP] analyze {} [{}]", url, names.join(", "));

    state
        .auditor
        .analyze(&url, &keys)
        .await
        .map(Json)
        .map_err(|e| ApiError::with_url(e, url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> AnalyzeRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn categories_default_to_all() {
        assert_eq!(request(r#"{"url":"e.com"}"#).category_keys(), CategoryKey::ALL.to_vec());
    }

    #[test]
    fn explicit_empty_list_selects_nothing() {
        assert!(request(r#"{"url":"e.com","categories":[]}"#).category_keys().is_empty());
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let keys = request(r#"{"url":"e.com","categories":["local","nope"]}"#).category_keys();
        assert_eq!(keys, vec![CategoryKey::Local]);
    }

    #[test]
    fn missing_url_reads_as_empty() {
        assert_eq!(request("{}").url, "");
    }
}

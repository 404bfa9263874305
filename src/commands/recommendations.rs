use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::commands::AppState;
use crate::domain::AuditReport;
use crate::error::{ApiError, AppError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub audit_results: Option<serde_json::Value>,
    #[serde(default)]
    pub url: String,
}

impl RecommendationRequest {
    /// The submitted report. Absent, null or `{}` all count as missing.
    pub fn report(&self) -> Result<AuditReport, AppError> {
        let missing = || AppError::invalid_input("Audit results required");
        let value = self.audit_results.as_ref().ok_or_else(missing)?;
        if value.is_null() || value.as_object().is_some_and(|o| o.is_empty()) {
            return Err(missing());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| AppError::invalid_input(format!("Invalid audit results: {e}")))
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub status: &'static str,
    pub recommendations: String,
    pub model: String,
}

/// `POST /api/ai-recommendations`
pub async fn recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let report = request.report()?;
    let recommendations = state.recommender.recommend(&report, &request.url).await?;
    Ok(Json(RecommendationResponse {
        status: "success",
        recommendations,
        model: state.recommender.model_family().to_string(),
    }))
}

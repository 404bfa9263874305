//! Natural-language recommendations from an external text-generation service.
//!
//! The audit's failing and warning checks are summarised into a prompt, posted
//! to `{base_url}/generate`, and the generated text is handed back verbatim.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{FetchSettings, LlmSettings};
use crate::domain::AuditReport;
use crate::error::{AppError, Result};
use crate::service::http::{create_client, ClientType};

/// Issues listed per category in the prompt.
pub const MAX_ISSUES_PER_CATEGORY: usize = 5;
pub const EMPTY_RESPONSE: &str = "No recommendations generated";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    stream: bool,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Per-category issue lines: a header with the category score, then up to
/// five `fail`/`warning` checks with their recommendation.
pub fn issue_lines(report: &AuditReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, category) in &report.categories {
        let issues: Vec<_> = category
            .checks
            .iter()
            .filter(|c| c.status.is_issue())
            .take(MAX_ISSUES_PER_CATEGORY)
            .collect();
        if issues.is_empty() {
            continue;
        }
        lines.push(format!(
            "\n{} ({:.0}% score):",
            key.as_str().to_uppercase(),
            category.score
        ));
        lines.extend(issues.iter().map(|c| {
            format!(
                "  - {}: {} (Recommendation: {})",
                c.name, c.value, c.recommendation
            )
        }));
    }
    lines
}

pub fn build_prompt(report: &AuditReport, url: &str) -> String {
    let issues_text = issue_lines(report).join("\n");
    format!(
        "You are an expert SEO consultant. Analyze these SEO audit results and provide actionable recommendations.

Website: {url}
Overall Score: {score:.0}%
Passed: {passed}/{total} checks

ISSUES FOUND:
{issues_text}

Provide a response with:
1. PRIORITY FIXES (top 5 most impactful changes to make immediately)
2. QUICK WINS (easy fixes that can be done in under 30 minutes)
3. CONTENT RECOMMENDATIONS (specific suggestions for improving content for AI/search visibility)
4. TECHNICAL CODE SNIPPETS (provide actual code for the most critical fixes like schema markup, meta tags, etc.)

Be specific and actionable. Include actual code examples where helpful.",
        score = report.overall_score,
        passed = report.total_passed,
        total = report.total_checks,
    )
}

pub struct RecommendationClient {
    client: Client,
    settings: LlmSettings,
}

impl RecommendationClient {
    pub fn new(fetch: &FetchSettings, settings: LlmSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: create_client(ClientType::Llm, fetch)?,
            settings,
        })
    }

    /// Model name without its tag, as reported to API callers.
    pub fn model_family(&self) -> &str {
        self.settings
            .model
            .split(':')
            .next()
            .unwrap_or(&self.settings.model)
    }

    /// Single POST, no retries. Timeouts, refused connections and non-200
    /// answers each map to their own error.
    pub async fn recommend(&self, report: &AuditReport, url: &str) -> Result<String> {
        let prompt = build_prompt(report, url);
        let endpoint = format!("{}/generate", self.settings.base_url);
        info!(
            "[LLM] Requesting recommendations for {} from {} ({} prompt chars)",
            url,
            endpoint,
            prompt.len()
        );

        let response = self
            .client
            .post(&endpoint)
            .json(&GenerateRequest {
                model: &self.settings.model,
                stream: false,
                prompt: &prompt,
            })
            .send()
            .await
            .map_err(|e| {
                warn!("[LLM] {} failed: {}", endpoint, e);
                if e.is_timeout() {
                    AppError::LlmTimeout
                } else if e.is_connect() {
                    AppError::LlmUnavailable
                } else {
                    AppError::Llm(e.to_string())
                }
            })?;

        if response.status() != StatusCode::OK {
            warn!("[LLM] {} answered {}", endpoint, response.status());
            return Err(AppError::LlmStatus(response.status().as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;
        let text = body.response.unwrap_or_else(|| EMPTY_RESPONSE.to_string());
        info!("[LLM] Received {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryKey, CategoryResult, CheckRecord, CheckStatus, Impact};

    fn record(name: &str, status: CheckStatus) -> CheckRecord {
        CheckRecord::new(name, status, "d", "seen", format!("fix {name}"), Impact::High, None)
    }

    fn report() -> AuditReport {
        let mut report = AuditReport::new("https://example.com");
        let mut checks = vec![record("Fine", CheckStatus::Pass), record("Meh", CheckStatus::Info)];
        checks.extend((0..7).map(|i| record(&format!("Bad {i}"), CheckStatus::Fail)));
        report.insert(CategoryKey::Technical, CategoryResult::from_checks(checks));
        report.insert(
            CategoryKey::Social,
            CategoryResult::from_checks(vec![record("Fine", CheckStatus::Pass)]),
        );
        report
    }

    #[test]
    fn only_first_five_issues_per_category() {
        let lines = issue_lines(&report());
        assert_eq!(lines[0], "\nTECHNICAL (11% score):");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "  - Bad 0: seen (Recommendation: fix Bad 0)");
        assert_eq!(lines[5], "  - Bad 4: seen (Recommendation: fix Bad 4)");
    }

    #[test]
    fn categories_without_issues_are_omitted() {
        let lines = issue_lines(&report());
        assert!(lines.iter().all(|l| !l.contains("SOCIAL")));
    }

    #[test]
    fn prompt_carries_totals() {
        let prompt = build_prompt(&report(), "https://example.com");
        assert!(prompt.starts_with("You are an expert SEO consultant."));
        assert!(prompt.contains("Website: https://example.com\n"));
        assert!(prompt.contains("Overall Score: 56%\n"));
        assert!(prompt.contains("Passed: 2/10 checks\n"));
        assert!(prompt.contains("ISSUES FOUND:\n\nTECHNICAL (11% score):\n  - Bad 0"));
        assert!(prompt.ends_with("Include actual code examples where helpful."));
    }
}

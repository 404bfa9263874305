//! Audit entities - checks, category results and the top-level report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Evidence strings longer than this are cut to keep reports bounded.
pub const MAX_VALUE_CHARS: usize = 200;

/// Category label used when a check does not name one.
pub const DEFAULT_GROUP: &str = "General";

// ====== Enums ======

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
    /// Commentary only. Counts toward the total but is never a pass.
    Info,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Warning => "warning",
            CheckStatus::Info => "info",
        }
    }

    /// Fail and warning are what the recommendation prompt reports on.
    pub fn is_issue(&self) -> bool {
        matches!(self, CheckStatus::Fail | CheckStatus::Warning)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

/// The nine top-level categories, declared in canonical evaluation order.
///
/// `Ord` follows declaration order so a `BTreeMap<CategoryKey, _>` iterates
/// in the same order the orchestrator runs analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Technical,
    Onpage,
    Content,
    Mobile,
    Performance,
    Security,
    Social,
    Local,
    Geo,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 9] = [
        CategoryKey::Technical,
        CategoryKey::Onpage,
        CategoryKey::Content,
        CategoryKey::Mobile,
        CategoryKey::Performance,
        CategoryKey::Security,
        CategoryKey::Social,
        CategoryKey::Local,
        CategoryKey::Geo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Technical => "technical",
            CategoryKey::Onpage => "onpage",
            CategoryKey::Content => "content",
            CategoryKey::Mobile => "mobile",
            CategoryKey::Performance => "performance",
            CategoryKey::Security => "security",
            CategoryKey::Social => "social",
            CategoryKey::Local => "local",
            CategoryKey::Geo => "geo",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryKey::Technical => "Technical SEO",
            CategoryKey::Onpage => "On-Page SEO",
            CategoryKey::Content => "Content SEO",
            CategoryKey::Mobile => "Mobile SEO",
            CategoryKey::Performance => "Performance",
            CategoryKey::Security => "Security",
            CategoryKey::Social => "Social SEO",
            CategoryKey::Local => "Local SEO",
            CategoryKey::Geo => "GEO/AEO",
        }
    }

    /// Published number of checks per category. Changing one of these is a
    /// breaking change to `/api/health`.
    pub fn contract_check_count(&self) -> usize {
        match self {
            CategoryKey::Technical => 35,
            CategoryKey::Onpage => 25,
            CategoryKey::Content => 20,
            CategoryKey::Mobile => 15,
            CategoryKey::Performance => 18,
            CategoryKey::Security => 12,
            CategoryKey::Social => 10,
            CategoryKey::Local => 15,
            CategoryKey::Geo => 30,
        }
    }

    /// Canonical-order, de-duplicated selection of known keys. Unknown keys
    /// are dropped without error.
    pub fn select<S: AsRef<str>>(requested: &[S]) -> Vec<CategoryKey> {
        Self::ALL
            .into_iter()
            .filter(|k| requested.iter().any(|r| r.as_ref() == k.as_str()))
            .collect()
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ====== Check Record ======

/// One evaluated check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub name: String,
    pub status: CheckStatus,
    #[serde(default)]
    pub description: String,
    pub value: String,
    pub recommendation: String,
    #[serde(default)]
    pub impact: Impact,
    #[serde(default = "default_group")]
    pub category: String,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

impl CheckRecord {
    /// Build a record, stringifying `value` and bounding it to
    /// [`MAX_VALUE_CHARS`]. `group` falls back to [`DEFAULT_GROUP`].
    pub fn new(
        name: impl Into<String>,
        status: CheckStatus,
        description: impl Into<String>,
        value: impl fmt::Display,
        recommendation: impl Into<String>,
        impact: Impact,
        group: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            description: description.into(),
            value: truncate_chars(&value.to_string(), MAX_VALUE_CHARS),
            recommendation: recommendation.into(),
            impact,
            category: group.unwrap_or(DEFAULT_GROUP).to_string(),
        }
    }
}

/// Keep the first `max` characters. Never splits a UTF-8 sequence and is a
/// no-op for shorter input.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ====== Category Result ======

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub checks: Vec<CheckRecord>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub passed: usize,
}

impl CategoryResult {
    pub fn from_checks(checks: Vec<CheckRecord>) -> Self {
        let total = checks.len();
        let passed = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();
        let score = if total == 0 {
            0.0
        } else {
            round1(passed as f64 / total as f64 * 100.0)
        };
        Self {
            score,
            checks,
            total,
            passed,
        }
    }

    pub fn check(&self, name: &str) -> Option<&CheckRecord> {
        self.checks.iter().find(|c| c.name == name)
    }
}

// ====== Audit Report ======

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    #[serde(default)]
    pub url: String,
    #[serde(default = "success_status")]
    pub status: String,
    #[serde(default)]
    pub categories: BTreeMap<CategoryKey, CategoryResult>,
    #[serde(default)]
    pub total_checks: usize,
    #[serde(default)]
    pub total_passed: usize,
    #[serde(default)]
    pub overall_score: f64,
}

fn success_status() -> String {
    "success".to_string()
}

impl AuditReport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: success_status(),
            categories: BTreeMap::new(),
            total_checks: 0,
            total_passed: 0,
            overall_score: 0.0,
        }
    }

    pub fn insert(&mut self, key: CategoryKey, result: CategoryResult) {
        if let Some(prev) = self.categories.insert(key, result) {
            self.total_checks -= prev.total;
            self.total_passed -= prev.passed;
        }
        let added = &self.categories[&key];
        self.total_checks += added.total;
        self.total_passed += added.passed;
        self.overall_score = overall_score(self.categories.values());
    }

    pub fn category(&self, key: CategoryKey) -> Option<&CategoryResult> {
        self.categories.get(&key)
    }
}

/// Unweighted mean of category scores, one decimal. Every category weighs the
/// same regardless of how many checks it has. Zero categories score 0.
pub fn overall_score<'a>(results: impl IntoIterator<Item = &'a CategoryResult>) -> f64 {
    let scores: Vec<f64> = results.into_iter().map(|r| r.score).collect();
    if scores.is_empty() {
        return 0.0;
    }
    round1(scores.iter().sum::<f64>() / scores.len() as f64)
}

// ====== Health ======

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub total_checks: usize,
    pub categories: BTreeMap<CategoryKey, usize>,
}

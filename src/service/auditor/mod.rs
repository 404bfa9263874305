//! The check evaluation engine.
//!
//! Each category module holds a declarative table of [`CheckSpec`] rows. The
//! engine picks the tables for the requested categories, runs them against one
//! shared [`PageContext`] and folds the results into an [`AuditReport`].
//! [`PageAuditor`] wraps that with the network side: one primary fetch and the
//! probes the selected categories need.

pub mod check;
pub mod content;
pub mod geo;
pub mod local;
pub mod mobile;
pub mod onpage;
pub mod performance;
pub mod security;
pub mod social;
pub mod technical;

pub use check::{run_checks, CheckSpec, Verdict};

use async_trait::async_trait;
use futures::future;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::FetchSettings;
use crate::domain::{
    AuditReport, CategoryKey, HealthReport, PageContext, ProbeResults, ResourceStatus, TargetUrl,
};
use crate::error::{AppError, Result};
use crate::service::fetcher::{PageFetcher, ResourceChecker};

/// The check table behind a category key.
pub fn table(key: CategoryKey) -> &'static [CheckSpec] {
    match key {
        CategoryKey::Technical => technical::CHECKS,
        CategoryKey::Onpage => onpage::CHECKS,
        CategoryKey::Content => content::CHECKS,
        CategoryKey::Mobile => mobile::CHECKS,
        CategoryKey::Performance => performance::CHECKS,
        CategoryKey::Security => security::CHECKS,
        CategoryKey::Social => social::CHECKS,
        CategoryKey::Local => local::CHECKS,
        CategoryKey::Geo => geo::CHECKS,
    }
}

/// Run the tables for `keys` against `ctx`. Pure: the same context and keys
/// always give the same report.
pub fn evaluate(ctx: &PageContext, keys: &[CategoryKey]) -> AuditReport {
    let mut report = AuditReport::new(ctx.target.as_str());
    for &key in keys {
        let result = run_checks(ctx, table(key));
        debug!(
            "[AUDIT] {}: {}/{} passed ({}%)",
            key, result.passed, result.total, result.score
        );
        report.insert(key, result);
    }
    report
}

/// Check counts straight from the tables.
pub fn health_report() -> HealthReport {
    let categories: BTreeMap<CategoryKey, usize> = CategoryKey::ALL
        .into_iter()
        .map(|k| (k, table(k).len()))
        .collect();
    HealthReport {
        status: "ok",
        total_checks: categories.values().sum(),
        categories,
    }
}

/// Strategy trait for single-URL audits.
#[async_trait]
pub trait Auditor: Send + Sync {
    /// Audit `url` for the given categories. `url` must already carry a
    /// scheme; categories are evaluated in canonical order.
    async fn analyze(&self, url: &str, categories: &[CategoryKey]) -> Result<AuditReport>;

    /// Human-readable name for this auditor.
    fn name(&self) -> &'static str;
}

/// Fetches the page over HTTP and runs the static checks on it.
pub struct PageAuditor {
    fetcher: PageFetcher,
    resources: ResourceChecker,
}

impl PageAuditor {
    pub fn new(settings: &FetchSettings) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new(settings)?,
            resources: ResourceChecker::new(settings)?,
        })
    }

    /// Probe only what the selected categories read, concurrently.
    async fn probe(&self, target: &TargetUrl, keys: &[CategoryKey]) -> ProbeResults {
        let technical = keys.contains(&CategoryKey::Technical);
        let geo = keys.contains(&CategoryKey::Geo);

        let robots = async {
            if technical {
                self.resources.check_robots_txt(target).await
            } else {
                ResourceStatus::NotFound
            }
        };
        let sitemap = async {
            if technical {
                self.resources.check_sitemap_xml(target).await
            } else {
                ResourceStatus::NotFound
            }
        };
        let llms = async {
            if geo {
                self.resources.check_llms_txt(target).await
            } else {
                ResourceStatus::NotFound
            }
        };

        let (robots_txt, sitemap_xml, llms_txt) = future::join3(robots, sitemap, llms).await;
        debug!(
            "[PROBE] robots.txt: {}, sitemap.xml: {}, llms.txt: {}",
            robots_txt.exists(),
            sitemap_xml.exists(),
            llms_txt.exists()
        );
        ProbeResults {
            robots_txt,
            sitemap_xml,
            llms_txt,
        }
    }
}

#[async_trait]
impl Auditor for PageAuditor {
    async fn analyze(&self, url: &str, categories: &[CategoryKey]) -> Result<AuditReport> {
        info!("[AUDIT] Starting audit of {} ({} categories)", url, categories.len());

        let target = TargetUrl::parse(url)
            .map_err(|e| AppError::fetch(url, format!("Invalid URL '{url}': {e}")))?;
        let page = self.fetcher.fetch(target).await?;
        let probes = self.probe(&page.target, categories).await;

        // `Html` is not `Send`; the whole snapshot lives on the blocking pool.
        let keys = categories.to_vec();
        let report = tokio::task::spawn_blocking(move || {
            let ctx = PageContext::new(page, probes);
            evaluate(&ctx, &keys)
        })
        .await
        .map_err(|e| AppError::analysis(e.to_string()))?;

        info!(
            "[AUDIT] Finished {}: overall {}%, {}/{} checks passed",
            report.url, report.overall_score, report.total_passed, report.total_checks
        );
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "Page Auditor"
    }
}

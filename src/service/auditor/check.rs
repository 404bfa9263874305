//! Declarative check descriptors and the runner that evaluates them.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::domain::{CategoryResult, CheckRecord, CheckStatus, Impact, PageContext};

/// A check predicate: pure function of the page snapshot.
pub type Predicate = fn(&PageContext) -> Verdict;

/// Status plus the evidence shown next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: CheckStatus,
    pub value: String,
    /// Replaces the table's recommendation for this outcome only.
    pub recommendation: Option<&'static str>,
}

impl Verdict {
    pub fn new(status: CheckStatus, value: impl fmt::Display) -> Self {
        Self {
            status,
            value: value.to_string(),
            recommendation: None,
        }
    }

    pub fn recommending(mut self, recommendation: &'static str) -> Self {
        self.recommendation = Some(recommendation);
        self
    }

    pub fn pass(value: impl fmt::Display) -> Self {
        Self::new(CheckStatus::Pass, value)
    }

    pub fn fail(value: impl fmt::Display) -> Self {
        Self::new(CheckStatus::Fail, value)
    }

    pub fn warning(value: impl fmt::Display) -> Self {
        Self::new(CheckStatus::Warning, value)
    }

    pub fn info(value: impl fmt::Display) -> Self {
        Self::new(CheckStatus::Info, value)
    }

    /// `Pass` when `ok`, otherwise `otherwise`.
    pub fn check(ok: bool, otherwise: CheckStatus, value: impl fmt::Display) -> Self {
        Self::new(if ok { CheckStatus::Pass } else { otherwise }, value)
    }
}

/// One row of an analyzer's check table.
#[derive(Clone, Copy)]
pub struct CheckSpec {
    pub name: &'static str,
    pub group: &'static str,
    pub impact: Impact,
    pub description: &'static str,
    pub recommendation: &'static str,
    pub eval: Predicate,
}

/// Table-row constructor; keeps the check tables to one entry per line group.
pub const fn check(
    name: &'static str,
    group: &'static str,
    impact: Impact,
    description: &'static str,
    recommendation: &'static str,
    eval: Predicate,
) -> CheckSpec {
    CheckSpec {
        name,
        group,
        impact,
        description,
        recommendation,
        eval,
    }
}

impl CheckSpec {
    /// Evaluate against `ctx`. A panicking predicate is contained here and
    /// reported as an `info` record so the rest of the table still runs.
    pub fn evaluate(&self, ctx: &PageContext) -> CheckRecord {
        let verdict = panic::catch_unwind(AssertUnwindSafe(|| (self.eval)(ctx)))
            .unwrap_or_else(|_| {
                tracing::warn!("[AUDIT] Check '{}' panicked; reporting as info", self.name);
                Verdict::info("Check could not be evaluated")
            });

        CheckRecord::new(
            self.name,
            verdict.status,
            self.description,
            verdict.value,
            verdict.recommendation.unwrap_or(self.recommendation),
            self.impact,
            Some(self.group),
        )
    }
}

impl fmt::Debug for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSpec")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("impact", &self.impact)
            .finish()
    }
}

/// Evaluate a whole table in order.
pub fn run_checks(ctx: &PageContext, table: &[CheckSpec]) -> CategoryResult {
    let records = table.iter().map(|spec| spec.evaluate(ctx)).collect();
    CategoryResult::from_checks(records)
}

/// `part / whole`, zero when `whole` is zero.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// "Found" / "Not found" style evidence.
pub fn found(present: bool) -> &'static str {
    if present {
        "Found"
    } else {
        "Not found"
    }
}

/// "Present" / "Not found" style evidence.
pub fn present(present: bool) -> &'static str {
    if present {
        "Present"
    } else {
        "Not found"
    }
}

/// "Set" / "Not set" style evidence.
pub fn set(is_set: bool) -> &'static str {
    if is_set {
        "Set"
    } else {
        "Not set"
    }
}

/// "Yes" / "No" style evidence.
pub fn yes_no(yes: bool) -> &'static str {
    if yes {
        "Yes"
    } else {
        "No"
    }
}

use axum::Json;

use crate::domain::HealthReport;
use crate::service::auditor::health_report;

/// `GET /api/health`
pub async fn health() -> Json<HealthReport> {
    Json(health_report())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_reports_every_category() {
        let Json(report) = tokio_test::block_on(health());
        assert_eq!(report.categories.len(), 9);
        assert_eq!(report.total_checks, 180);
    }
}

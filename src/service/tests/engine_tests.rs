use std::collections::HashSet;

use crate::domain::{CategoryKey, CheckStatus, MAX_VALUE_CHARS};
use crate::service::auditor::{evaluate, health_report, table};
use crate::test_utils::{PageFixture, BARE_PAGE, RICH_PAGE};

#[test]
fn every_table_matches_its_published_count() {
    for key in CategoryKey::ALL {
        assert_eq!(table(key).len(), key.contract_check_count(), "{key}");
    }
}

#[test]
fn check_names_are_unique_within_a_category() {
    for key in CategoryKey::ALL {
        let names: HashSet<&str> = table(key).iter().map(|c| c.name).collect();
        assert_eq!(names.len(), table(key).len(), "{key}");
    }
}

#[test]
fn health_counts_come_from_the_tables() {
    let health = health_report();
    assert_eq!(health.status, "ok");
    assert_eq!(health.total_checks, 180);
    assert_eq!(health.categories[&CategoryKey::Technical], 35);
    assert_eq!(health.categories[&CategoryKey::Geo], 30);

    let json = serde_json::to_value(&health).unwrap();
    assert_eq!(json["totalChecks"], 180);
    assert_eq!(json["categories"]["onpage"], 25);
}

#[test]
fn bare_http_page_scenario() {
    let ctx = PageFixture::new(BARE_PAGE).url("http://example.com/").build();
    let report = evaluate(&ctx, &[CategoryKey::Technical, CategoryKey::Onpage]);

    let onpage = report.category(CategoryKey::Onpage).unwrap();
    assert_eq!(onpage.check("Title Tag Present").unwrap().status, CheckStatus::Fail);
    assert_eq!(onpage.check("Meta Description").unwrap().status, CheckStatus::Fail);
    assert_eq!(onpage.check("H1 Tag").unwrap().status, CheckStatus::Fail);
    assert_eq!(onpage.check("Image Alt Text").unwrap().status, CheckStatus::Warning);

    let technical = report.category(CategoryKey::Technical).unwrap();
    assert_eq!(technical.check("HTTPS").unwrap().status, CheckStatus::Fail);
}

#[test]
fn structured_page_scenario() {
    let ctx = PageFixture::new(RICH_PAGE).build();
    let report = evaluate(&ctx, &[CategoryKey::Geo]);
    let geo = report.category(CategoryKey::Geo).unwrap();
    assert_eq!(geo.check("JSON-LD Structured Data").unwrap().status, CheckStatus::Pass);
    assert_eq!(geo.check("Question Headings").unwrap().status, CheckStatus::Pass);
}

#[test]
fn no_categories_means_empty_report() {
    let ctx = PageFixture::new(RICH_PAGE).build();
    let report = evaluate(&ctx, &CategoryKey::select::<&str>(&[]));
    assert!(report.categories.is_empty());
    assert_eq!(report.overall_score, 0.0);
    assert_eq!(report.total_checks, 0);

    let report = evaluate(&ctx, &CategoryKey::select(&["seo", "speed"]));
    assert!(report.categories.is_empty());
}

#[test]
fn full_audit_respects_result_bounds() {
    for html in [BARE_PAGE, RICH_PAGE, "", "<html><body><<<>>></body>"] {
        let ctx = PageFixture::new(html).all_probes_found().build();
        let report = evaluate(&ctx, &CategoryKey::ALL);
        assert_eq!(report.total_checks, 180);
        assert_eq!(report.categories.len(), 9);
        for (key, result) in &report.categories {
            assert_eq!(result.total, key.contract_check_count());
            assert!(result.passed <= result.total);
            assert!((0.0..=100.0).contains(&result.score));
            for check in &result.checks {
                assert!(check.value.chars().count() <= MAX_VALUE_CHARS);
                assert_ne!(check.value, "Check could not be evaluated", "{}", check.name);
            }
        }
    }
}

#[test]
fn evaluation_is_idempotent() {
    let ctx = PageFixture::new(RICH_PAGE).build();
    assert_eq!(evaluate(&ctx, &CategoryKey::ALL), evaluate(&ctx, &CategoryKey::ALL));
}

#[test]
fn categories_come_out_in_canonical_order() {
    let ctx = PageFixture::new(RICH_PAGE).build();
    let keys = CategoryKey::select(&["geo", "social", "technical"]);
    let report = evaluate(&ctx, &keys);
    let order: Vec<CategoryKey> = report.categories.keys().copied().collect();
    assert_eq!(order, vec![CategoryKey::Technical, CategoryKey::Social, CategoryKey::Geo]);
    assert_eq!(report.url, "https://example.com/");
}

//! Social SEO: Open Graph, Twitter cards and social integration.

use super::check::{check, set, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const OG_TITLE_PREVIEW_CHARS: usize = 50;

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // Open Graph
    check("OG Title", "Open Graph", Impact::High,
        "Open Graph title", "Add og:title meta tag", og_title),
    check("OG Description", "Open Graph", Impact::High,
        "Open Graph description", "Add og:description meta tag", og_description),
    check("OG Image", "Open Graph", Impact::High,
        "Open Graph image", "Add og:image (1200x630px recommended)", og_image),
    check("OG URL", "Open Graph", Impact::Medium,
        "Open Graph URL", "Add og:url meta tag", og_url),
    check("OG Type", "Open Graph", Impact::Low,
        "Open Graph type", "Add og:type meta tag", og_type),
    // Twitter
    check("Twitter Card", "Twitter", Impact::Medium,
        "Twitter card type", "Add twitter:card meta tag", twitter_card),
    check("Twitter Title", "Twitter", Impact::Medium,
        "Twitter title", "Add twitter:title or og:title", twitter_title),
    check("Twitter Image", "Twitter", Impact::Medium,
        "Twitter image", "Add twitter:image or og:image", twitter_image),
    // Social Integration
    check("Social Profile Links", "Social Integration", Impact::Low,
        "Social media links", "Link to social profiles", social_profiles),
    check("Share Buttons", "Social Integration", Impact::Low,
        "Share functionality", "Add social share buttons", share_buttons),
];

fn has_og(ctx: &PageContext, property: &str) -> bool {
    PageExtractor::meta_by_property(&ctx.document, property).is_some()
}

fn has_twitter(ctx: &PageContext, name: &str) -> bool {
    PageExtractor::meta_by_name(&ctx.document, name).is_some()
}

/// Twitter falls back to the matching Open Graph tag when its own is absent.
fn twitter_with_fallback(own: bool, og: bool) -> Verdict {
    let value = if own {
        "Set"
    } else if og {
        "Falls back to OG"
    } else {
        "Not set"
    };
    Verdict::check(own || og, CheckStatus::Warning, value)
}

fn og_title(ctx: &PageContext) -> Verdict {
    match PageExtractor::meta_by_property(&ctx.document, "og:title") {
        Some(el) => {
            let content = el.value().attr("content").unwrap_or_default();
            Verdict::pass(content.chars().take(OG_TITLE_PREVIEW_CHARS).collect::<String>())
        }
        None => Verdict::warning("Not set"),
    }
}

fn og_description(ctx: &PageContext) -> Verdict {
    let has = has_og(ctx, "og:description");
    Verdict::check(has, CheckStatus::Warning, set(has))
}

fn og_image(ctx: &PageContext) -> Verdict {
    let has = has_og(ctx, "og:image");
    Verdict::check(has, CheckStatus::Warning, set(has))
}

fn og_url(ctx: &PageContext) -> Verdict {
    let has = has_og(ctx, "og:url");
    Verdict::check(has, CheckStatus::Info, set(has))
}

fn og_type(ctx: &PageContext) -> Verdict {
    match PageExtractor::meta_by_property(&ctx.document, "og:type") {
        Some(el) => Verdict::pass(el.value().attr("content").unwrap_or_default()),
        None => Verdict::info("Not set"),
    }
}

fn twitter_card(ctx: &PageContext) -> Verdict {
    match PageExtractor::meta_by_name(&ctx.document, "twitter:card") {
        Some(el) => Verdict::pass(el.value().attr("content").unwrap_or_default()),
        None => Verdict::warning("Not set"),
    }
}

fn twitter_title(ctx: &PageContext) -> Verdict {
    twitter_with_fallback(has_twitter(ctx, "twitter:title"), has_og(ctx, "og:title"))
}

fn twitter_image(ctx: &PageContext) -> Verdict {
    twitter_with_fallback(has_twitter(ctx, "twitter:image"), has_og(ctx, "og:image"))
}

fn social_profiles(ctx: &PageContext) -> Verdict {
    let n = ctx
        .links()
        .iter()
        .filter(|l| regex!(r"(?i)facebook|twitter|linkedin|instagram|youtube|tiktok").is_match(&l.href))
        .count();
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} found"))
}

fn share_buttons(ctx: &PageContext) -> Verdict {
    let n = ctx
        .document
        .select(selector!("[class]"))
        .filter(|el| el.value().classes().any(|c| regex!(r"(?i)share|social").is_match(c)))
        .count();
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryKey;
    use crate::service::auditor::check::run_checks;
    use crate::test_utils::{PageFixture, RICH_PAGE};

    #[test]
    fn table_matches_published_count() {
        assert_eq!(CHECKS.len(), CategoryKey::Social.contract_check_count());
    }

    #[test]
    fn twitter_falls_back_to_open_graph() {
        let ctx = PageFixture::new(RICH_PAGE).build();
        let result = run_checks(&ctx, CHECKS);
        let title = result.check("Twitter Title").unwrap();
        assert_eq!(title.status, CheckStatus::Pass);
        assert_eq!(title.value, "Falls back to OG");
        assert_eq!(result.check("Twitter Image").unwrap().value, "Falls back to OG");
        assert_eq!(result.check("OG Title").unwrap().value, "What is SEO?");
        assert_eq!(result.check("OG Description").unwrap().status, CheckStatus::Warning);
        assert_eq!(result.check("Twitter Card").unwrap().status, CheckStatus::Warning);
    }

    #[test]
    fn nothing_social_at_all() {
        let ctx = PageFixture::new("<p>x</p>").build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.passed, 0);
        assert_eq!(result.check("Twitter Title").unwrap().value, "Not set");
        assert_eq!(result.check("OG URL").unwrap().status, CheckStatus::Info);
    }

    #[test]
    fn social_links_and_share_widgets() {
        let html = r#"
            <a href="https://www.LinkedIn.com/company/x">in</a>
            <a href="https://youtube.com/@x">yt</a>
            <div class="post Share-bar"><button class="btn">share</button></div>"#;
        let ctx = PageFixture::new(html).build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.check("Social Profile Links").unwrap().value, "2 found");
        assert_eq!(result.check("Share Buttons").unwrap().value, "1 found");
    }

    #[test]
    fn card_type_is_reported() {
        let html = r#"<head><meta name="twitter:card" content="summary_large_image"><meta property="og:type" content="article"></head>"#;
        let ctx = PageFixture::new(html).build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.check("Twitter Card").unwrap().value, "summary_large_image");
        assert_eq!(result.check("OG Type").unwrap().value, "article");
    }
}

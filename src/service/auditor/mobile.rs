//! Mobile SEO: viewport, responsiveness, touch UX and mobile weight.

use super::check::{check, found, yes_no, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const VIEWPORT_PREVIEW_CHARS: usize = 50;
const SMALL_TARGET_RATIO: f64 = 0.1;
const MAX_SMALL_FONTS: usize = 3;
const LAZY_EXEMPT_IMAGES: usize = 3;
const MAX_PAGE_KB: f64 = 100.0;

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // Viewport
    check("Viewport Meta Tag", "Viewport", Impact::Critical,
        "Viewport defined", "Add viewport meta tag", viewport_tag),
    check("Viewport Width", "Viewport", Impact::Critical,
        "Width specified", "Set width=device-width", viewport_width),
    check("Initial Scale", "Viewport", Impact::High,
        "Initial scale set", "Set initial-scale=1", initial_scale),
    check("Zoom Enabled", "Viewport", Impact::Medium,
        "User can zoom", "Allow user zooming for accessibility", zoom_enabled),
    // Responsiveness
    check("Media Queries", "Responsiveness", Impact::High,
        "Responsive CSS", "Use CSS media queries", media_queries),
    // Touch UX
    check("Touch Targets", "Touch UX", Impact::Medium,
        "Touch-friendly buttons", "Use 48px minimum touch targets", touch_targets),
    // Mobile Compatibility
    check("No Flash Content", "Mobile Compatibility", Impact::Critical,
        "Flash elements", "Remove Flash content", no_flash),
    check("No Frames", "Mobile Compatibility", Impact::High,
        "Frame elements", "Remove frames", no_frames),
    // Responsiveness
    check("No Fixed Width", "Responsiveness", Impact::Medium,
        "Fixed width elements", "Use responsive widths", no_fixed_width),
    // Readability
    check("Readable Font Size", "Readability", Impact::Medium,
        "Small fonts", "Use 16px+ base font size", readable_fonts),
    // Mobile Performance
    check("Image Lazy Loading", "Mobile Performance", Impact::High,
        "Lazy loaded", "Add loading=\"lazy\" for mobile", image_lazy_loading),
    check("Page Weight", "Mobile Performance", Impact::Medium,
        "HTML size", "Keep HTML under 100KB", page_weight),
    check("AMP Version", "Mobile Performance", Impact::Low,
        "AMP available", "Consider AMP for mobile", amp_version),
    // Mobile Integration
    check("App Deep Links", "Mobile Integration", Impact::Low,
        "App links", "Add app deep links if applicable", app_deep_links),
    // Mobile UX
    check("Click-to-Call", "Mobile UX", Impact::Medium,
        "Phone links", "Add tel: links for mobile", click_to_call),
];

/// `content` of the viewport meta, empty when the tag or attribute is
/// missing.
fn viewport_content(ctx: &PageContext) -> String {
    PageExtractor::meta_content(PageExtractor::meta_by_name(&ctx.document, "viewport"))
        .unwrap_or_default()
}

pub(crate) fn tel_link_count(ctx: &PageContext) -> usize {
    ctx.count(selector!("a[href^='tel:']"))
}

// ====== Viewport ======

fn viewport_tag(ctx: &PageContext) -> Verdict {
    match PageExtractor::meta_by_name(&ctx.document, "viewport") {
        Some(el) => {
            let content = el.value().attr("content").unwrap_or_default();
            Verdict::pass(content.chars().take(VIEWPORT_PREVIEW_CHARS).collect::<String>())
        }
        None => Verdict::fail("Missing"),
    }
}

fn viewport_width(ctx: &PageContext) -> Verdict {
    let has = viewport_content(ctx).contains("width=");
    Verdict::check(has, CheckStatus::Fail, yes_no(has))
}

fn initial_scale(ctx: &PageContext) -> Verdict {
    let has = viewport_content(ctx).contains("initial-scale");
    Verdict::check(has, CheckStatus::Warning, yes_no(has))
}

fn zoom_enabled(ctx: &PageContext) -> Verdict {
    let content = viewport_content(ctx);
    let locked = content.contains("user-scalable=no") || content.contains("maximum-scale=1");
    Verdict::check(!locked, CheckStatus::Warning, if locked { "Disabled" } else { "Yes" })
}

fn media_queries(ctx: &PageContext) -> Verdict {
    let has = ctx.html().contains("@media");
    Verdict::check(has, CheckStatus::Warning, found(has))
}

// ====== Touch & compatibility ======

fn touch_targets(ctx: &PageContext) -> Verdict {
    let mut total = 0usize;
    let mut small = 0usize;
    for el in ctx.document.select(selector!("button, a")) {
        total += 1;
        if el
            .value()
            .attr("style")
            .is_some_and(|s| s.contains("font-size: 1") || s.contains("padding: 0"))
        {
            small += 1;
        }
    }
    // A page with no targets at all does not pass: 0 < 0 is false.
    Verdict::check(
        (small as f64) < total as f64 * SMALL_TARGET_RATIO,
        CheckStatus::Warning,
        format!("{}/{total}", total - small),
    )
}

fn no_flash(ctx: &PageContext) -> Verdict {
    let n = ctx
        .document
        .select(selector!("object, embed"))
        .filter(|el| {
            let markup = el.html().to_lowercase();
            markup.contains("flash") || markup.contains("swf")
        })
        .count();
    Verdict::check(n == 0, CheckStatus::Fail, format!("{n} found"))
}

fn no_frames(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("frame, frameset"));
    Verdict::check(n == 0, CheckStatus::Fail, format!("{n} found"))
}

fn no_fixed_width(ctx: &PageContext) -> Verdict {
    let n = regex!(r"width:\s*\d{4,}px").find_iter(ctx.html()).count();
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} found"))
}

fn readable_fonts(ctx: &PageContext) -> Verdict {
    let n = regex!(r"font-size:\s*[0-9]px").find_iter(ctx.html()).count();
    Verdict::check(n < MAX_SMALL_FONTS, CheckStatus::Warning, format!("{n} found"))
}

// ====== Mobile Performance ======

fn image_lazy_loading(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let lazy = images.iter().filter(|i| i.is_lazy()).count();
    Verdict::check(
        lazy > 0 || images.len() <= LAZY_EXEMPT_IMAGES,
        CheckStatus::Warning,
        format!("{lazy}/{}", images.len()),
    )
}

fn page_weight(ctx: &PageContext) -> Verdict {
    let kb = ctx.response.size_kb();
    Verdict::check(kb < MAX_PAGE_KB, CheckStatus::Warning, format!("{kb:.1} KB"))
}

fn amp_version(ctx: &PageContext) -> Verdict {
    let has = !PageExtractor::links_with_rel(&ctx.document, "amphtml").is_empty();
    Verdict::info(yes_no(has))
}

fn app_deep_links(ctx: &PageContext) -> Verdict {
    let n = PageExtractor::count_attr_matching(&ctx.document, selector!("meta[property]"), "property", |p| {
        regex!(r"al:(ios|android)").is_match(p)
    });
    Verdict::info(format!("{n} found"))
}

fn click_to_call(ctx: &PageContext) -> Verdict {
    let n = tel_link_count(ctx);
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryKey;
    use crate::service::auditor::check::run_checks;
    use crate::test_utils::{PageFixture, RICH_PAGE};

    fn result_for(html: &str) -> crate::domain::CategoryResult {
        run_checks(&PageFixture::new(html).build(), CHECKS)
    }

    #[test]
    fn table_matches_published_count() {
        assert_eq!(CHECKS.len(), CategoryKey::Mobile.contract_check_count());
    }

    #[test]
    fn zero_images_pass_lazy_loading() {
        let result = result_for("<p>text only</p>");
        assert_eq!(result.check("Image Lazy Loading").unwrap().status, CheckStatus::Pass);
    }

    #[test]
    fn missing_viewport_fails() {
        let result = result_for("<p>plain</p>");
        let tag = result.check("Viewport Meta Tag").unwrap();
        assert_eq!(tag.status, CheckStatus::Fail);
        assert_eq!(tag.value, "Missing");
        assert_eq!(result.check("Viewport Width").unwrap().status, CheckStatus::Fail);
        assert_eq!(result.check("Initial Scale").unwrap().status, CheckStatus::Warning);
        assert_eq!(result.check("Zoom Enabled").unwrap().status, CheckStatus::Pass);
    }

    #[test]
    fn locked_zoom_is_flagged() {
        let result = result_for(
            r#"<head><meta name="viewport" content="width=device-width, maximum-scale=1"></head>"#,
        );
        let zoom = result.check("Zoom Enabled").unwrap();
        assert_eq!(zoom.status, CheckStatus::Warning);
        assert_eq!(zoom.value, "Disabled");
    }

    #[test]
    fn page_without_touch_targets_warns() {
        let result = result_for("<p>nothing clickable</p>");
        let touch = result.check("Touch Targets").unwrap();
        assert_eq!(touch.status, CheckStatus::Warning);
        assert_eq!(touch.value, "0/0");
    }

    #[test]
    fn small_inline_targets_are_counted() {
        let mut html = String::from(r#"<button style="padding: 0">x</button>"#);
        for i in 0..19 {
            html.push_str(&format!(r#"<a href="/{i}">link {i}</a>"#));
        }
        let touch = result_for(&html).check("Touch Targets").unwrap().clone();
        // 1 small out of 20: 1 < 2.0
        assert_eq!(touch.status, CheckStatus::Pass);
        assert_eq!(touch.value, "19/20");
    }

    #[test]
    fn legacy_plugins_fail() {
        let html = r#"<object data="movie.swf"></object><frameset><frame src="a.html"></frameset>"#;
        let result = result_for(html);
        assert_eq!(result.check("No Flash Content").unwrap().status, CheckStatus::Fail);
        assert_eq!(result.check("No Flash Content").unwrap().value, "1 found");
    }

    #[test]
    fn css_heuristics_read_raw_markup() {
        let html = "<style>.a{width: 1200px} .b{font-size: 8px} .c{font-size:9px} .d{font-size: 7px} @media (max-width: 600px){}</style>";
        let result = result_for(html);
        assert_eq!(result.check("No Fixed Width").unwrap().value, "1 found");
        assert_eq!(result.check("Readable Font Size").unwrap().status, CheckStatus::Warning);
        assert_eq!(result.check("Media Queries").unwrap().status, CheckStatus::Pass);
    }

    #[test]
    fn page_weight_uses_payload_size() {
        let ctx = PageFixture::new("<p>x</p>").body_len(150 * 1024).build();
        let result = run_checks(&ctx, CHECKS);
        let weight = result.check("Page Weight").unwrap();
        assert_eq!(weight.status, CheckStatus::Warning);
        assert_eq!(weight.value, "150.0 KB");
    }

    #[test]
    fn rich_page_has_viewport_and_tel_link() {
        let result = result_for(RICH_PAGE);
        assert_eq!(result.check("Viewport Width").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Initial Scale").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Click-to-Call").unwrap().value, "1 found");
        assert_eq!(result.check("AMP Version").unwrap().status, CheckStatus::Info);
    }
}

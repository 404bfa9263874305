//! Performance: static proxies for load speed, caching and resource weight.
//! Nothing here executes scripts or measures real Core Web Vitals.

use super::check::{check, set, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const LOAD_GOOD_SECS: f64 = 2.0;
const LOAD_SLOW_SECS: f64 = 4.0;
const HTML_GOOD_KB: f64 = 100.0;
const HTML_HEAVY_KB: f64 = 200.0;
const ASYNC_SCRIPT_RATIO: f64 = 0.5;
const COMPRESSED_ENCODINGS: &[&str] = &["gzip", "br", "deflate"];
const CACHE_PREVIEW_CHARS: usize = 50;
const MAX_STYLESHEETS: usize = 5;
const MAX_SCRIPTS: usize = 10;
const MAX_INLINE_STYLES: usize = 20;
const MAX_INLINE_SCRIPT_KB: f64 = 50.0;
const LAZY_EXEMPT_IMAGES: usize = 3;
const SRCSET_EXEMPT_IMAGES: usize = 2;

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // Core Web Vitals
    check("Page Load Time", "Core Web Vitals", Impact::Critical,
        "Server response time", "Optimize to under 2 seconds", load_time),
    check("HTML Size", "Core Web Vitals", Impact::High,
        "Document size", "Keep HTML under 100KB", html_size),
    check("CLS Prevention", "Core Web Vitals", Impact::High,
        "Images with dimensions", "Add width/height to prevent layout shift", cls_prevention),
    check("LCP Optimization", "Core Web Vitals", Impact::High,
        "Preload hints", "Preload LCP element", lcp_optimization),
    check("Non-blocking JS", "Core Web Vitals", Impact::High,
        "Async/defer scripts", "Add async/defer to scripts", non_blocking_js),
    // Compression
    check("Compression", "Compression", Impact::High,
        "Response compression", "Enable gzip/brotli compression", compression),
    // Caching
    check("Cache Headers", "Caching", Impact::Medium,
        "Cache-Control header", "Set cache headers", cache_headers),
    check("ETag Header", "Caching", Impact::Low,
        "ETag for caching", "Enable ETag", etag),
    check("Expires Header", "Caching", Impact::Low,
        "Expires header", "Set expiration for static assets", expires),
    // Resources
    check("CSS Files Count", "Resources", Impact::Medium,
        "Stylesheet count", "Combine CSS files", css_files),
    check("JS Files Count", "Resources", Impact::Medium,
        "Script count", "Combine/minimize JS files", js_files),
    check("Inline Styles", "Resources", Impact::Low,
        "Inline style attributes", "Move styles to CSS files", inline_styles),
    check("Inline Script Size", "Resources", Impact::Medium,
        "Inline JavaScript weight", "Move large inline scripts to cacheable files", inline_script_size),
    // Resource Hints
    check("Preconnect Hints", "Resource Hints", Impact::Medium,
        "Preconnect links", "Add preconnect for third-party domains", preconnect),
    check("DNS Prefetch", "Resource Hints", Impact::Low,
        "DNS prefetch", "Add dns-prefetch hints", dns_prefetch),
    // Images
    check("Lazy Loading", "Images", Impact::High,
        "Lazy loaded images", "Add loading=\"lazy\"", lazy_loading),
    check("Responsive Images", "Images", Impact::Medium,
        "Srcset images", "Use srcset for responsive images", responsive_images),
    check("WebP Images", "Images", Impact::Medium,
        "WebP format", "Use WebP for better compression", webp_images),
];

fn rel_count(ctx: &PageContext, token: &str) -> usize {
    PageExtractor::links_with_rel(&ctx.document, token).len()
}

// ====== Core Web Vitals ======

fn load_time(ctx: &PageContext) -> Verdict {
    let secs = ctx.load_time_secs();
    let status = if secs < LOAD_GOOD_SECS {
        CheckStatus::Pass
    } else if secs < LOAD_SLOW_SECS {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    Verdict::new(status, format!("{secs:.2}s"))
}

fn html_size(ctx: &PageContext) -> Verdict {
    let kb = ctx.response.size_kb();
    let status = if kb < HTML_GOOD_KB {
        CheckStatus::Pass
    } else if kb < HTML_HEAVY_KB {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    Verdict::new(status, format!("{kb:.1} KB"))
}

fn cls_prevention(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let sized = images.iter().filter(|i| i.has_dimensions()).count();
    Verdict::check(
        sized == images.len(),
        CheckStatus::Warning,
        format!("{sized}/{}", images.len()),
    )
}

fn lcp_optimization(ctx: &PageContext) -> Verdict {
    let n = rel_count(ctx, "preload");
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} preloads"))
}

fn non_blocking_js(ctx: &PageContext) -> Verdict {
    let mut total = 0usize;
    let mut deferred = 0usize;
    for script in ctx.document.select(selector!("script[src]")) {
        total += 1;
        let attrs = script.value();
        if attrs.attr("async").is_some() || attrs.attr("defer").is_some() {
            deferred += 1;
        }
    }
    Verdict::check(
        deferred as f64 >= total as f64 * ASYNC_SCRIPT_RATIO,
        CheckStatus::Warning,
        format!("{deferred}/{total}"),
    )
}

// ====== Compression & Caching ======

fn compression(ctx: &PageContext) -> Verdict {
    let encoding = ctx.response.header_or_empty("content-encoding");
    if COMPRESSED_ENCODINGS.contains(&encoding) {
        Verdict::pass(encoding)
    } else if encoding.is_empty() {
        Verdict::warning("None")
    } else {
        Verdict::warning(encoding)
    }
}

fn cache_headers(ctx: &PageContext) -> Verdict {
    let cache = ctx.response.header_or_empty("cache-control");
    if cache.is_empty() {
        Verdict::warning("Not set")
    } else {
        Verdict::pass(cache.chars().take(CACHE_PREVIEW_CHARS).collect::<String>())
    }
}

fn etag(ctx: &PageContext) -> Verdict {
    let has = !ctx.response.header_or_empty("etag").is_empty();
    Verdict::check(has, CheckStatus::Info, if has { "Present" } else { "Not set" })
}

fn expires(ctx: &PageContext) -> Verdict {
    let has_expires = !ctx.response.header_or_empty("expires").is_empty();
    let has_cache = !ctx.response.header_or_empty("cache-control").is_empty();
    Verdict::check(has_expires || has_cache, CheckStatus::Info, set(has_expires))
}

// ====== Resources ======

fn css_files(ctx: &PageContext) -> Verdict {
    let n = rel_count(ctx, "stylesheet");
    Verdict::check(n <= MAX_STYLESHEETS, CheckStatus::Warning, format!("{n} files"))
}

fn js_files(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("script[src]"));
    Verdict::check(n <= MAX_SCRIPTS, CheckStatus::Warning, format!("{n} files"))
}

fn inline_styles(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("[style]"));
    Verdict::check(n < MAX_INLINE_STYLES, CheckStatus::Warning, format!("{n} elements"))
}

fn inline_script_size(ctx: &PageContext) -> Verdict {
    let bytes: usize = ctx
        .document
        .select(selector!("script:not([src])"))
        .map(|s| s.text().map(str::len).sum::<usize>())
        .sum();
    let kb = bytes as f64 / 1024.0;
    Verdict::check(kb < MAX_INLINE_SCRIPT_KB, CheckStatus::Warning, format!("{kb:.1} KB"))
}

// ====== Resource Hints ======

fn preconnect(ctx: &PageContext) -> Verdict {
    let n = rel_count(ctx, "preconnect");
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} hints"))
}

fn dns_prefetch(ctx: &PageContext) -> Verdict {
    let n = rel_count(ctx, "dns-prefetch");
    Verdict::check(
        n > 0 || rel_count(ctx, "preconnect") > 0,
        CheckStatus::Info,
        format!("{n} hints"),
    )
}

// ====== Images ======

fn lazy_loading(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let lazy = images.iter().filter(|i| i.is_lazy()).count();
    Verdict::check(
        lazy > 0 || images.len() <= LAZY_EXEMPT_IMAGES,
        CheckStatus::Warning,
        format!("{lazy}/{}", images.len()),
    )
}

fn responsive_images(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let n = images.iter().filter(|i| i.has_srcset()).count();
    Verdict::check(
        n > 0 || images.len() <= SRCSET_EXEMPT_IMAGES,
        CheckStatus::Info,
        format!("{n}/{}", images.len()),
    )
}

fn webp_images(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let n = images.iter().filter(|i| i.is_webp()).count();
    Verdict::check(
        n > 0 || images.is_empty(),
        CheckStatus::Info,
        format!("{n}/{}", images.len()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryKey;
    use crate::service::auditor::check::run_checks;
    use crate::test_utils::PageFixture;

    #[test]
    fn table_matches_published_count() {
        assert_eq!(CHECKS.len(), CategoryKey::Performance.contract_check_count());
    }

    #[test]
    fn zero_images_pass_every_image_check() {
        let result = run_checks(&PageFixture::new("<p>text only</p>").build(), CHECKS);
        for name in ["CLS Prevention", "Lazy Loading", "Responsive Images", "WebP Images"] {
            let check = result.check(name).unwrap();
            assert_eq!(check.status, CheckStatus::Pass, "{name}");
            assert_eq!(check.value, "0/0", "{name}");
        }
    }

    #[test]
    fn load_time_tiers() {
        let status = |secs: f64| {
            let ctx = PageFixture::new("<p>x</p>").load_time_secs(secs).build();
            run_checks(&ctx, CHECKS).check("Page Load Time").unwrap().clone()
        };
        assert_eq!(status(1.5).status, CheckStatus::Pass);
        assert_eq!(status(1.5).value, "1.50s");
        assert_eq!(status(3.0).status, CheckStatus::Warning);
        assert_eq!(status(4.0).status, CheckStatus::Fail);
    }

    #[test]
    fn html_size_tiers() {
        let status = |kb: usize| {
            let ctx = PageFixture::new("<p>x</p>").body_len(kb * 1024).build();
            run_checks(&ctx, CHECKS).check("HTML Size").unwrap().status
        };
        assert_eq!(status(50), CheckStatus::Pass);
        assert_eq!(status(150), CheckStatus::Warning);
        assert_eq!(status(250), CheckStatus::Fail);
    }

    #[test]
    fn bare_async_and_defer_attributes_count() {
        let html = r#"<script src="a.js" async></script><script src="b.js" defer></script><script src="c.js"></script>"#;
        let ctx = PageFixture::new(html).build();
        let result = run_checks(&ctx, CHECKS);
        let js = result.check("Non-blocking JS").unwrap();
        assert_eq!(js.status, CheckStatus::Pass);
        assert_eq!(js.value, "2/3");
        assert_eq!(result.check("JS Files Count").unwrap().value, "3 files");
    }

    #[test]
    fn compression_requires_exact_token() {
        let verdict = |enc: &'static str| {
            let ctx = PageFixture::new("<p>x</p>").header("content-encoding", enc).build();
            run_checks(&ctx, CHECKS).check("Compression").unwrap().status
        };
        assert_eq!(verdict("gzip"), CheckStatus::Pass);
        assert_eq!(verdict("br"), CheckStatus::Pass);
        assert_eq!(verdict("gzip, br"), CheckStatus::Warning);

        let ctx = PageFixture::new("<p>x</p>").build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.check("Compression").unwrap().value, "None");
    }

    #[test]
    fn cache_control_satisfies_expires() {
        let ctx = PageFixture::new("<p>x</p>")
            .header("cache-control", "max-age=3600")
            .build();
        let result = run_checks(&ctx, CHECKS);
        let expires = result.check("Expires Header").unwrap();
        assert_eq!(expires.status, CheckStatus::Pass);
        assert_eq!(expires.value, "Not set");
        assert_eq!(result.check("Cache Headers").unwrap().value, "max-age=3600");
        assert_eq!(result.check("ETag Header").unwrap().status, CheckStatus::Info);
    }

    #[test]
    fn preconnect_satisfies_dns_prefetch() {
        let html = r#"<head><link rel="preconnect" href="https://cdn.example.net"></head>"#;
        let ctx = PageFixture::new(html).build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.check("DNS Prefetch").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Preconnect Hints").unwrap().value, "1 hints");
    }

    #[test]
    fn large_inline_script_warns() {
        let html = format!("<script>var x = '{}';</script>", "a".repeat(60 * 1024));
        let ctx = PageFixture::new(&html).build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.check("Inline Script Size").unwrap().status, CheckStatus::Warning);
    }
}

//! Technical SEO: crawlability, transport security, URL shape, linking,
//! structured data and document basics.

use super::check::{check, found, set, yes_no, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const MAX_URL_CHARS: usize = 75;
const MAX_URL_DEPTH: usize = 3;
const MAX_URL_PARAMS: usize = 2;
const MIN_INTERNAL_LINKS: usize = 3;
const MAX_PLACEHOLDER_LINKS: usize = 3;
const MAX_GENERIC_ANCHORS: usize = 2;
const CANONICAL_PREVIEW_CHARS: usize = 60;
const VIEWPORT_PREVIEW_CHARS: usize = 40;
const DOCTYPE_WINDOW: usize = 100;

const GENERIC_ANCHORS: &[&str] = &["click here", "read more", "learn more", "here", "link"];

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // Crawlability
    check("Robots.txt", "Crawlability", Impact::High,
        "Robots.txt accessibility", "Create robots.txt file", robots_txt),
    check("Meta Robots", "Crawlability", Impact::Critical,
        "Page indexability", "Remove noindex if needed", meta_robots),
    check("XML Sitemap", "Crawlability", Impact::High,
        "Sitemap availability", "Create XML sitemap", xml_sitemap),
    check("Canonical URL", "Crawlability", Impact::High,
        "Canonical tag presence", "Add canonical tag", canonical_url),
    check("Self-Referencing Canonical", "Crawlability", Impact::Medium,
        "Canonical points to self", "Use self-referencing canonical", self_canonical),
    check("Hreflang Tags", "Crawlability", Impact::Medium,
        "International targeting", "Add for multi-language sites", hreflang),
    check("X-Robots-Tag", "Crawlability", Impact::High,
        "HTTP header indexability", "Remove noindex from header", x_robots_tag),
    check("HTTP Status Code", "Crawlability", Impact::High,
        "Primary response status", "Serve the page with HTTP 200", http_status),
    check("Meta Refresh Redirect", "Crawlability", Impact::Medium,
        "Client-side refresh redirects", "Use server-side 301 redirects instead of meta refresh", meta_refresh),
    check("Pagination Tags", "Crawlability", Impact::Low,
        "rel=next/prev links", "Add rel=next/prev for paginated series", pagination),
    // Security
    check("HTTPS", "Security", Impact::Critical,
        "Secure protocol", "Enable SSL certificate", https),
    check("HSTS Header", "Security", Impact::Medium,
        "HTTP Strict Transport Security", "Enable HSTS", hsts),
    check("X-Content-Type-Options", "Security", Impact::Medium,
        "MIME sniffing protection", "Add nosniff header", x_content_type_options),
    check("X-Frame-Options", "Security", Impact::Medium,
        "Clickjacking protection", "Add X-Frame-Options", x_frame_options),
    check("Content-Security-Policy", "Security", Impact::Medium,
        "CSP header", "Implement CSP", content_security_policy),
    check("No Mixed Content", "Security", Impact::High,
        "All resources HTTPS", "Fix mixed content", mixed_content),
    check("Secure Password Fields", "Security", Impact::Critical,
        "Password fields on HTTPS", "Use HTTPS for login pages", password_fields),
    // URL Structure
    check("URL Length", "URL Structure", Impact::Medium,
        "URL characters", "Keep under 75 characters", url_length),
    check("URL Lowercase", "URL Structure", Impact::Medium,
        "Lowercase URL", "Use lowercase URLs", url_lowercase),
    check("URL Hyphens", "URL Structure", Impact::Medium,
        "Word separators", "Use hyphens not underscores", url_hyphens),
    check("URL Depth", "URL Structure", Impact::Medium,
        "Directory levels", "Keep within 3 levels", url_depth),
    check("URL Parameters", "URL Structure", Impact::Medium,
        "Query parameters", "Minimize URL parameters", url_parameters),
    check("Clean URL", "URL Structure", Impact::Medium,
        "Special characters", "Remove special characters", clean_url),
    // Internal Linking
    check("Internal Links", "Internal Linking", Impact::High,
        "Internal linking", "Add 3-10 internal links", internal_links),
    check("External Links", "Internal Linking", Impact::Medium,
        "Outbound links", "Link to authority sites", external_links),
    check("Valid Link Hrefs", "Internal Linking", Impact::Medium,
        "Empty/placeholder links", "Fix empty href attributes", valid_hrefs),
    check("Internal Nofollow", "Internal Linking", Impact::Medium,
        "Nofollow on internal links", "Remove nofollow from internal links", internal_nofollow),
    check("Descriptive Anchors", "Internal Linking", Impact::Medium,
        "Generic anchor text", "Use descriptive anchor text", descriptive_anchors),
    // Structured Data
    check("Schema.org JSON-LD", "Structured Data", Impact::High,
        "Structured data", "Add Schema.org markup", json_ld),
    check("Microdata", "Structured Data", Impact::Low,
        "Microdata markup", "Consider adding microdata", microdata),
    // Technical
    check("Viewport Meta", "Technical", Impact::Critical,
        "Mobile viewport", "Add viewport meta tag", viewport),
    check("DOCTYPE Declaration", "Technical", Impact::Medium,
        "HTML DOCTYPE", "Add DOCTYPE declaration", doctype),
    check("Character Encoding", "Technical", Impact::High,
        "Charset declaration", "Declare character encoding", charset),
    check("Content-Type Header", "Technical", Impact::Medium,
        "Served as HTML", "Send Content-Type: text/html with a charset", content_type),
    check("Deprecated HTML Tags", "Technical", Impact::Low,
        "Obsolete presentational tags", "Replace font/center/marquee tags with CSS", deprecated_tags),
];

/// `href` of the first `<link rel=canonical>`, `None` when there is no such
/// element. A canonical element without `href` reads as an empty string.
pub(crate) fn canonical_href(ctx: &PageContext) -> Option<String> {
    PageExtractor::links_with_rel(&ctx.document, "canonical")
        .first()
        .map(|el| el.value().attr("href").unwrap_or_default().to_string())
}

pub(crate) fn json_ld_count(ctx: &PageContext) -> usize {
    ctx.count(selector!("script[type='application/ld+json']"))
}

fn probe_verdict(exists: bool) -> Verdict {
    Verdict::check(exists, CheckStatus::Warning, found(exists))
}

// ====== Crawlability ======

fn robots_txt(ctx: &PageContext) -> Verdict {
    probe_verdict(ctx.probes.robots_txt.exists())
}

fn meta_robots(ctx: &PageContext) -> Verdict {
    let content = PageExtractor::meta_content(PageExtractor::meta_by_name(&ctx.document, "robots"))
        .unwrap_or_default()
        .to_lowercase();
    let value = if content.is_empty() {
        "Not set (indexable)".to_string()
    } else {
        content.clone()
    };
    Verdict::check(!content.contains("noindex"), CheckStatus::Fail, value)
}

fn xml_sitemap(ctx: &PageContext) -> Verdict {
    probe_verdict(ctx.probes.sitemap_xml.exists())
}

fn canonical_url(ctx: &PageContext) -> Verdict {
    match canonical_href(ctx) {
        Some(href) => Verdict::pass(href.chars().take(CANONICAL_PREVIEW_CHARS).collect::<String>()),
        None => Verdict::warning("Not set"),
    }
}

fn self_canonical(ctx: &PageContext) -> Verdict {
    let canonical = canonical_href(ctx);
    let href = canonical.as_deref().unwrap_or_default();
    let url = ctx.target.as_str();
    let is_self = href.contains(url) || url.contains(href);
    Verdict::check(is_self || canonical.is_none(), CheckStatus::Warning, yes_no(is_self))
}

fn hreflang(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("link[hreflang]"));
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} tags"))
}

fn x_robots_tag(ctx: &PageContext) -> Verdict {
    let header = ctx.response.header_or_empty("x-robots-tag");
    let value = if header.is_empty() { "Not set" } else { header };
    Verdict::check(!header.to_lowercase().contains("noindex"), CheckStatus::Fail, value)
}

fn http_status(ctx: &PageContext) -> Verdict {
    let status = ctx.response.status;
    Verdict::check(status == 200, CheckStatus::Warning, status)
}

fn meta_refresh(ctx: &PageContext) -> Verdict {
    let refresh = ctx
        .document
        .select(selector!("meta[http-equiv]"))
        .find(|el| {
            el.value()
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("refresh"))
        });
    match refresh {
        Some(el) => Verdict::warning(el.value().attr("content").unwrap_or("Present")),
        None => Verdict::pass("None"),
    }
}

fn pagination(ctx: &PageContext) -> Verdict {
    let n = PageExtractor::links_with_rel(&ctx.document, "next").len()
        + PageExtractor::links_with_rel(&ctx.document, "prev").len();
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} tags"))
}

// ====== Security ======

fn https(ctx: &PageContext) -> Verdict {
    Verdict::check(
        ctx.target.is_https(),
        CheckStatus::Fail,
        ctx.target.scheme().to_uppercase(),
    )
}

fn hsts(ctx: &PageContext) -> Verdict {
    let enabled = !ctx.response.header_or_empty("strict-transport-security").is_empty();
    Verdict::check(
        enabled,
        CheckStatus::Warning,
        if enabled { "Enabled" } else { "Not set" },
    )
}

fn header_present(ctx: &PageContext, name: &str) -> Verdict {
    let value = ctx.response.header_or_empty(name);
    if value.is_empty() {
        Verdict::warning("Not set")
    } else {
        Verdict::pass(value)
    }
}

fn x_content_type_options(ctx: &PageContext) -> Verdict {
    header_present(ctx, "x-content-type-options")
}

fn x_frame_options(ctx: &PageContext) -> Verdict {
    header_present(ctx, "x-frame-options")
}

fn content_security_policy(ctx: &PageContext) -> Verdict {
    let is_set = !ctx.response.header_or_empty("content-security-policy").is_empty();
    Verdict::check(is_set, CheckStatus::Info, set(is_set))
}

fn mixed_content(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("[src^='http://']"));
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} insecure resources"))
}

fn password_fields(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("input[type='password']"));
    Verdict::check(
        ctx.target.is_https() || n == 0,
        CheckStatus::Fail,
        format!("{n} fields"),
    )
}

// ====== URL Structure ======

fn url_length(ctx: &PageContext) -> Verdict {
    let len = ctx.target.as_str().chars().count();
    Verdict::check(len < MAX_URL_CHARS, CheckStatus::Warning, format!("{len} chars"))
}

fn url_lowercase(ctx: &PageContext) -> Verdict {
    let url = ctx.target.as_str();
    let lower = url == url.to_lowercase();
    Verdict::check(
        lower,
        CheckStatus::Warning,
        if lower { "Yes" } else { "Has uppercase" },
    )
}

fn url_hyphens(ctx: &PageContext) -> Verdict {
    let clean = !ctx.target.path().contains('_');
    Verdict::check(
        clean,
        CheckStatus::Warning,
        if clean { "Hyphens" } else { "Has underscores" },
    )
}

fn url_depth(ctx: &PageContext) -> Verdict {
    let depth = ctx.target.path().split('/').filter(|s| !s.is_empty()).count();
    Verdict::check(depth <= MAX_URL_DEPTH, CheckStatus::Warning, format!("{depth} levels"))
}

fn url_parameters(ctx: &PageContext) -> Verdict {
    let n = match ctx.target.query() {
        Some(q) if !q.is_empty() => q.split('&').count(),
        _ => 0,
    };
    Verdict::check(n <= MAX_URL_PARAMS, CheckStatus::Warning, format!("{n} parameters"))
}

fn clean_url(ctx: &PageContext) -> Verdict {
    let n = regex!(r"[^a-zA-Z0-9\-_/.:]").find_iter(ctx.target.path()).count();
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} found"))
}

// ====== Internal Linking ======

fn internal_links(ctx: &PageContext) -> Verdict {
    let n = ctx.internal_links().len();
    Verdict::check(n >= MIN_INTERNAL_LINKS, CheckStatus::Warning, format!("{n} links"))
}

fn external_links(ctx: &PageContext) -> Verdict {
    let n = ctx.external_links().len();
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} links"))
}

fn valid_hrefs(ctx: &PageContext) -> Verdict {
    let n = ctx.links().iter().filter(|l| l.is_placeholder()).count();
    Verdict::check(n < MAX_PLACEHOLDER_LINKS, CheckStatus::Warning, format!("{n} found"))
}

fn internal_nofollow(ctx: &PageContext) -> Verdict {
    let n = ctx
        .internal_links()
        .iter()
        .filter(|l| l.rel_has("nofollow"))
        .count();
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} found"))
}

fn descriptive_anchors(ctx: &PageContext) -> Verdict {
    let n = ctx
        .links()
        .iter()
        .filter(|l| GENERIC_ANCHORS.contains(&l.text.trim().to_lowercase().as_str()))
        .count();
    Verdict::check(n <= MAX_GENERIC_ANCHORS, CheckStatus::Warning, format!("{n} generic"))
}

// ====== Structured Data ======

fn json_ld(ctx: &PageContext) -> Verdict {
    let n = json_ld_count(ctx);
    Verdict::check(n > 0, CheckStatus::Warning, format!("{n} blocks"))
}

fn microdata(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("[itemtype]"));
    Verdict::check(
        n > 0 || json_ld_count(ctx) > 0,
        CheckStatus::Info,
        format!("{n} items"),
    )
}

// ====== Technical ======

fn viewport(ctx: &PageContext) -> Verdict {
    match PageExtractor::meta_by_name(&ctx.document, "viewport") {
        Some(el) => {
            let content = el.value().attr("content").unwrap_or_default();
            Verdict::pass(content.chars().take(VIEWPORT_PREVIEW_CHARS).collect::<String>())
        }
        None => Verdict::fail("Not set"),
    }
}

fn doctype(ctx: &PageContext) -> Verdict {
    let head: String = ctx.html().chars().take(DOCTYPE_WINDOW).collect();
    let has = head.to_lowercase().contains("<!doctype");
    Verdict::check(has, CheckStatus::Warning, if has { "Present" } else { "Missing" })
}

fn charset(ctx: &PageContext) -> Verdict {
    if let Some(cs) = PageExtractor::first_attr(&ctx.document, selector!("meta[charset]"), "charset") {
        return Verdict::pass(if cs.is_empty() { "Declared".to_string() } else { cs });
    }
    let http_equiv = ctx
        .document
        .select(selector!("meta[http-equiv]"))
        .any(|el| el.value().attr("http-equiv") == Some("Content-Type"));
    if http_equiv {
        Verdict::pass("Declared")
    } else {
        Verdict::warning("Not set")
    }
}

fn content_type(ctx: &PageContext) -> Verdict {
    let header = ctx.response.header_or_empty("content-type");
    let value = if header.is_empty() { "Not set" } else { header };
    Verdict::check(
        header.to_lowercase().contains("text/html"),
        CheckStatus::Warning,
        value,
    )
}

fn deprecated_tags(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("font, center, marquee, blink, big, strike, tt"));
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} found"))
}

//! Security signals visible from one response: transport, headers, forms and
//! third-party scripts.

use super::check::{check, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};

const MAX_UNTRUSTED_SCRIPTS: usize = 3;
const TRUSTED_SCRIPT_HOSTS: &[&str] = &[
    "google",
    "facebook",
    "twitter",
    "cloudflare",
    "jquery",
    "bootstrap",
    "cdn",
];

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // HTTPS
    check("HTTPS Protocol", "HTTPS", Impact::Critical,
        "Secure connection", "Enable HTTPS", https_protocol),
    check("No Mixed Content", "HTTPS", Impact::High,
        "Mixed content", "Fix mixed content issues", mixed_content),
    check("Secure Cookies", "HTTPS", Impact::Medium,
        "Cookie security", "Add Secure flag to cookies", secure_cookies),
    check("HTTPS Redirect", "HTTPS", Impact::High,
        "HTTP redirects to HTTPS", "Redirect HTTP to HTTPS", https_redirect),
    // Security Headers
    check("HSTS Header", "Security Headers", Impact::High,
        "HTTP Strict Transport Security", "Enable HSTS header", hsts),
    check("X-Content-Type-Options", "Security Headers", Impact::Medium,
        "MIME sniffing protection", "Add X-Content-Type-Options: nosniff", nosniff),
    check("X-Frame-Options", "Security Headers", Impact::Medium,
        "Clickjacking protection", "Add X-Frame-Options header", frame_options),
    check("Content-Security-Policy", "Security Headers", Impact::Medium,
        "CSP header", "Implement Content Security Policy", csp),
    check("Referrer-Policy", "Security Headers", Impact::Low,
        "Referrer policy", "Set Referrer-Policy header", referrer_policy),
    check("Permissions-Policy", "Security Headers", Impact::Low,
        "Permissions policy", "Configure Permissions-Policy", permissions_policy),
    // Forms
    check("Secure Login Forms", "Forms", Impact::Critical,
        "Password fields on HTTPS", "Use HTTPS for login pages", secure_login_forms),
    // Scripts
    check("Trusted Scripts", "Scripts", Impact::Medium,
        "External scripts", "Review external script sources", trusted_scripts),
];

fn https_protocol(ctx: &PageContext) -> Verdict {
    Verdict::check(
        ctx.target.is_https(),
        CheckStatus::Fail,
        ctx.target.scheme().to_uppercase(),
    )
}

fn mixed_content(ctx: &PageContext) -> Verdict {
    if !ctx.target.is_https() {
        return Verdict::fail("Site not on HTTPS").recommending("Enable HTTPS first");
    }
    let n = ctx.count(selector!("[href^='http://']")) + ctx.count(selector!("[src^='http://']"));
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} insecure resources"))
}

fn secure_cookies(ctx: &PageContext) -> Verdict {
    let cookies = ctx.response.header_joined("set-cookie");
    let secure = cookies.is_empty() || cookies.contains("Secure");
    Verdict::check(
        secure,
        CheckStatus::Warning,
        if secure { "Secure flag set" } else { "Missing Secure flag" },
    )
}

/// Only inferable from the scheme we were handed.
fn https_redirect(ctx: &PageContext) -> Verdict {
    let https = ctx.target.is_https();
    Verdict::check(https, CheckStatus::Warning, if https { "Yes" } else { "Unknown" })
}

fn hsts(ctx: &PageContext) -> Verdict {
    let enabled = !ctx.response.header_or_empty("strict-transport-security").is_empty();
    Verdict::check(
        enabled,
        CheckStatus::Warning,
        if enabled { "Enabled" } else { "Not set" },
    )
}

fn nosniff(ctx: &PageContext) -> Verdict {
    let value = ctx.response.header_or_empty("x-content-type-options");
    Verdict::check(
        value == "nosniff",
        CheckStatus::Warning,
        if value.is_empty() { "Not set" } else { value },
    )
}

fn frame_options(ctx: &PageContext) -> Verdict {
    let value = ctx.response.header_or_empty("x-frame-options");
    if value.is_empty() {
        Verdict::warning("Not set")
    } else {
        Verdict::pass(value)
    }
}

fn csp(ctx: &PageContext) -> Verdict {
    let has = !ctx.response.header_or_empty("content-security-policy").is_empty();
    Verdict::check(has, CheckStatus::Info, if has { "Configured" } else { "Not set" })
}

fn referrer_policy(ctx: &PageContext) -> Verdict {
    let value = ctx.response.header_or_empty("referrer-policy");
    if value.is_empty() {
        Verdict::info("Not set")
    } else {
        Verdict::pass(value)
    }
}

fn permissions_policy(ctx: &PageContext) -> Verdict {
    let has = !ctx.response.header_or_empty("permissions-policy").is_empty()
        || !ctx.response.header_or_empty("feature-policy").is_empty();
    Verdict::check(has, CheckStatus::Info, if has { "Set" } else { "Not set" })
}

fn secure_login_forms(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("input[type='password']"));
    Verdict::check(
        n == 0 || ctx.target.is_https(),
        CheckStatus::Fail,
        format!("{n} fields"),
    )
}

fn trusted_scripts(ctx: &PageContext) -> Verdict {
    let untrusted = ctx
        .document
        .select(selector!("script[src]"))
        .filter_map(|s| s.value().attr("src"))
        .filter(|src| regex!(r"^https?://").is_match(src))
        .filter(|src| !TRUSTED_SCRIPT_HOSTS.iter().any(|t| src.contains(t)))
        .count();
    Verdict::check(
        untrusted < MAX_UNTRUSTED_SCRIPTS,
        CheckStatus::Warning,
        format!("{untrusted} from unknown sources"),
    )
}

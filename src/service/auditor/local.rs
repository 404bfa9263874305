//! Local SEO: NAP details, local schema types and local intent signals.

use super::check::{check, found, CheckSpec, Verdict};
use super::mobile::tel_link_count;
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const LOCAL_SCHEMA_TYPES: &[&str] = &[
    "LocalBusiness",
    "Organization",
    "Store",
    "Restaurant",
    "Hotel",
    "Place",
];
const SERVICE_AREA_TERMS: &[&str] = &["serving", "service area", "we serve", "locations"];
const LOCAL_TERMS: &[&str] = &["near me", "local", "nearby", "in your area"];
const REVIEW_TERMS: &[&str] = &["review", "testimonial", "rating", "stars"];

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // NAP
    check("Phone Number", "NAP", Impact::High,
        "Phone displayed", "Display phone number for local SEO", phone_number),
    check("Physical Address", "NAP", Impact::High,
        "Address displayed", "Display physical address", physical_address),
    check("Email Address", "NAP", Impact::Medium,
        "Email displayed", "Display contact email", email_address),
    check("Click-to-Call", "NAP", Impact::Medium,
        "Tel: links", "Add tel: links for mobile users", click_to_call),
    check("Click-to-Email", "NAP", Impact::Low,
        "Mailto: links", "Add mailto: links", click_to_email),
    // Schema
    check("LocalBusiness Schema", "Schema", Impact::High,
        "Local business markup", "Add LocalBusiness schema", local_business_schema),
    check("Organization Schema", "Schema", Impact::Medium,
        "Organization markup", "Add Organization schema", organization_schema),
    check("ContactPoint Schema", "Schema", Impact::Medium,
        "Contact point markup", "Add ContactPoint schema", contact_point),
    check("Opening Hours Schema", "Schema", Impact::Medium,
        "Hours markup", "Add opening hours schema", opening_hours),
    check("GeoCoordinates", "Schema", Impact::Medium,
        "Location coordinates", "Add geo coordinates schema", geo_coordinates),
    // Local Signals
    check("Google Maps Embed", "Local Signals", Impact::Medium,
        "Map embedded", "Embed Google Maps", maps_embed),
    check("Directions Link", "Local Signals", Impact::Low,
        "Get directions link", "Add directions link", directions_link),
    check("Service Area", "Local Signals", Impact::Medium,
        "Service area mentioned", "Mention service areas", service_area),
    check("Local Keywords", "Local Signals", Impact::Low,
        "Local terms used", "Include local keywords", local_keywords),
    check("Reviews Section", "Local Signals", Impact::High,
        "Reviews/testimonials", "Display customer reviews", reviews),
];

fn info_found(has: bool) -> Verdict {
    Verdict::check(has, CheckStatus::Info, found(has))
}

/// Markup of every JSON-LD block, as serialized by the parser.
fn json_ld_blocks(ctx: &PageContext) -> Vec<String> {
    ctx.document
        .select(selector!("script[type='application/ld+json']"))
        .map(|el| el.html())
        .collect()
}

// ====== NAP ======

fn phone_number(ctx: &PageContext) -> Verdict {
    info_found(regex!(r"\b(\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4})\b").is_match(&ctx.text))
}

fn physical_address(ctx: &PageContext) -> Verdict {
    info_found(
        regex!(r"(?i)\b\d+\s+[\w\s]+(?:street|st|avenue|ave|road|rd|boulevard|blvd|drive|dr|lane|ln)\b")
            .is_match(&ctx.text),
    )
}

fn email_address(ctx: &PageContext) -> Verdict {
    info_found(regex!(r"\b[\w.-]+@[\w.-]+\.\w+\b").is_match(&ctx.text))
}

fn click_to_call(ctx: &PageContext) -> Verdict {
    let n = tel_link_count(ctx);
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} found"))
}

fn click_to_email(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("a[href^='mailto:']"));
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} found"))
}

// ====== Schema ======

fn local_business_schema(ctx: &PageContext) -> Verdict {
    let has = json_ld_blocks(ctx)
        .iter()
        .any(|block| LOCAL_SCHEMA_TYPES.iter().any(|t| block.contains(t)));
    Verdict::check(has, CheckStatus::Warning, found(has))
}

fn organization_schema(ctx: &PageContext) -> Verdict {
    info_found(json_ld_blocks(ctx).iter().any(|b| b.contains("Organization")))
}

fn contact_point(ctx: &PageContext) -> Verdict {
    let html = ctx.html();
    info_found(html.contains("ContactPoint") || html.contains("contactPoint"))
}

fn opening_hours(ctx: &PageContext) -> Verdict {
    let html = ctx.html();
    info_found(html.contains("openingHours") || html.contains("OpeningHoursSpecification"))
}

fn geo_coordinates(ctx: &PageContext) -> Verdict {
    info_found(ctx.html().contains("GeoCoordinates") || ctx.html_lower().contains("geo"))
}

// ====== Local Signals ======

fn maps_embed(ctx: &PageContext) -> Verdict {
    let has = PageExtractor::count_attr_matching(&ctx.document, selector!("iframe[src]"), "src", |src| {
        regex!(r"(?i)google.*maps|maps\.google").is_match(src)
    }) > 0;
    info_found(has)
}

fn directions_link(ctx: &PageContext) -> Verdict {
    let has = ctx
        .links()
        .iter()
        .any(|l| regex!(r"(?i)maps\.google|google.*maps.*dir").is_match(&l.href));
    info_found(has)
}

fn service_area(ctx: &PageContext) -> Verdict {
    let text = ctx.text_lower();
    info_found(SERVICE_AREA_TERMS.iter().any(|t| text.contains(t)))
}

fn local_keywords(ctx: &PageContext) -> Verdict {
    let text = ctx.text_lower();
    info_found(LOCAL_TERMS.iter().any(|t| text.contains(t)))
}

fn reviews(ctx: &PageContext) -> Verdict {
    let html = ctx.html_lower();
    info_found(REVIEW_TERMS.iter().any(|t| html.contains(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryKey;
    use crate::service::auditor::check::run_checks;
    use crate::test_utils::{PageFixture, RICH_PAGE};

    const BAKERY: &str = r#"<html><head>
        <script type="application/ld+json">{"@type":"Bakery","address":{"@type":"PostalAddress"},"geo":{"@type":"GeoCoordinates"},"openingHours":"Mo-Fr 07:00-18:00","contactPoint":{"@type":"ContactPoint"}}</script>
        </head><body>
        <p>Visit us at 42 Baker Street. Call (555) 123-4567 or email hello@bakery.example.</p>
        <p>Proudly serving the local neighbourhood. Read our customer reviews.</p>
        <iframe src="https://www.google.com/maps/embed?pb=1"></iframe>
        <a href="https://maps.google.com/?daddr=42+Baker+Street">Get directions</a>
        <a href="tel:5551234567">Call</a><a href="mailto:hello@bakery.example">Email</a>
        </body></html>"#;

    #[test]
    fn table_matches_published_count() {
        assert_eq!(CHECKS.len(), CategoryKey::Local.contract_check_count());
    }

    #[test]
    fn local_business_page_passes_signals() {
        let ctx = PageFixture::new(BAKERY).build();
        let result = run_checks(&ctx, CHECKS);
        for name in [
            "Phone Number",
            "Physical Address",
            "Email Address",
            "Click-to-Call",
            "Click-to-Email",
            "ContactPoint Schema",
            "Opening Hours Schema",
            "GeoCoordinates",
            "Google Maps Embed",
            "Directions Link",
            "Service Area",
            "Local Keywords",
            "Reviews Section",
        ] {
            assert_eq!(result.check(name).unwrap().status, CheckStatus::Pass, "{name}");
        }
        // "Bakery" is not one of the recognised local types.
        assert_eq!(result.check("LocalBusiness Schema").unwrap().status, CheckStatus::Warning);
        assert_eq!(result.check("Organization Schema").unwrap().status, CheckStatus::Info);
    }

    #[test]
    fn organization_json_ld_counts_as_local_schema() {
        let ctx = PageFixture::new(RICH_PAGE).build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.check("LocalBusiness Schema").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Organization Schema").unwrap().value, "Found");
    }

    #[test]
    fn empty_page_is_all_informational() {
        let ctx = PageFixture::new("<p>x</p>").build();
        let result = run_checks(&ctx, CHECKS);
        assert_eq!(result.passed, 0);
        assert_eq!(result.check("LocalBusiness Schema").unwrap().status, CheckStatus::Warning);
        assert_eq!(result.check("Phone Number").unwrap().status, CheckStatus::Info);
    }
}

//! Content SEO: depth and readability, linking, and E-E-A-T signals.

use std::collections::HashSet;

use super::check::{check, found, present, ratio, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const LONG_FORM_WORDS: usize = 1000;
const MIN_WORDS: usize = 300;
const MIN_SUBSTANTIAL_PARAGRAPHS: usize = 5;
const SUBSTANTIAL_PARAGRAPH_CHARS: usize = 20;
const SENTENCE_MIN_WORDS: usize = 3;
const SENTENCE_AVG_MIN: f64 = 10.0;
const SENTENCE_AVG_MAX: f64 = 20.0;
const DIVERSITY_MIN_CHARS: usize = 3;
const DIVERSITY_RATIO: f64 = 0.3;
const MIN_DATA_POINTS: usize = 3;
const INTERNAL_LINKS_MIN: usize = 3;
const INTERNAL_LINKS_MAX: usize = 100;
const LINK_DENSITY_MIN: f64 = 1.0;
const LINK_DENSITY_MAX: f64 = 10.0;
const MIN_JUMP_LINKS: usize = 3;

const AUTHOR_MARKERS: &[&str] = &["author", "written by", "posted by", "byline"];
const DATE_MARKERS: &[&str] = &["updated", "published", "modified", "date"];
const CITATION_MARKERS: &[&str] = &["according to", "source:", "study shows", "research", "cited"];
const EXPERTISE_MARKERS: &[&str] = &[
    "years of experience",
    "certified",
    "expert",
    "professional",
    "specialist",
];

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // Content Quality
    check("Content Length", "Content Quality", Impact::High,
        "Word count", "1000+ words for comprehensive content", content_length),
    check("Paragraph Structure", "Content Quality", Impact::Medium,
        "Substantial paragraphs", "Use 5+ meaningful paragraphs", paragraph_structure),
    check("Unique Paragraphs", "Content Quality", Impact::Medium,
        "Repeated paragraph text", "Remove duplicated boilerplate paragraphs", unique_paragraphs),
    check("Sentence Length", "Content Quality", Impact::Medium,
        "Average sentence length", "Aim for 15-20 words per sentence", sentence_length),
    check("Vocabulary Diversity", "Content Quality", Impact::Low,
        "Unique words ratio", "Use varied vocabulary", vocabulary_diversity),
    check("Engaging Questions", "Content Quality", Impact::Low,
        "Questions in content", "Include questions for engagement", engaging_questions),
    check("Data & Statistics", "Content Quality", Impact::Medium,
        "Numerical data", "Include statistics for credibility", data_points),
    check("Text Emphasis", "Content Quality", Impact::Low,
        "Emphasized text", "Use bold for key points", text_emphasis),
    // Linking
    check("Internal Links", "Linking", Impact::High,
        "Internal linking", "Add 3-10 internal links", internal_links),
    check("External Links", "Linking", Impact::Medium,
        "Outbound links", "Link to authority sources", external_links),
    check("Link Density", "Linking", Impact::Medium,
        "Links per 100 words", "Maintain 1-5 links per 100 words", link_density),
    check("External Nofollow", "Linking", Impact::Low,
        "Nofollow external links", "Consider nofollow for untrusted links", external_nofollow),
    check("Link Qualification", "Linking", Impact::Low,
        "Qualified links", "Use rel attributes appropriately", link_qualification),
    check("Jump Links", "Linking", Impact::Low,
        "In-page anchor navigation", "Add a table of contents with #section links", jump_links),
    // E-E-A-T
    check("Author Attribution", "E-E-A-T", Impact::High,
        "Author info", "Add author bio for E-E-A-T", author_attribution),
    check("Content Date", "E-E-A-T", Impact::Medium,
        "Date visible", "Show publish/update date", content_date),
    check("Trust Pages Linked", "E-E-A-T", Impact::Medium,
        "About/Contact links", "Link to About/Contact pages", trust_pages),
    check("Source Citations", "E-E-A-T", Impact::Medium,
        "Citations present", "Cite authoritative sources", source_citations),
    check("Expertise Signals", "E-E-A-T", Impact::Medium,
        "Expertise indicators", "Demonstrate expertise", expertise_signals),
    check("Contact Information", "E-E-A-T", Impact::Medium,
        "Contact details", "Provide contact information", contact_information),
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn substantial_paragraphs(ctx: &PageContext) -> Vec<String> {
    ctx.document
        .select(selector!("p"))
        .map(|p| PageExtractor::element_text(p).trim().to_string())
        .filter(|t| t.chars().count() > SUBSTANTIAL_PARAGRAPH_CHARS)
        .collect()
}

/// Contact evidence in free text: an email address or a ten-digit phone.
pub(crate) fn has_contact_details(text: &str) -> bool {
    regex!(r"\b[\w.-]+@[\w.-]+\.\w+\b").is_match(text)
        || regex!(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").is_match(text)
}

// ====== Content Quality ======

fn content_length(ctx: &PageContext) -> Verdict {
    let n = ctx.word_count;
    let status = if n >= LONG_FORM_WORDS {
        CheckStatus::Pass
    } else if n >= MIN_WORDS {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    Verdict::new(status, format!("{n} words"))
}

fn paragraph_structure(ctx: &PageContext) -> Verdict {
    let n = substantial_paragraphs(ctx).len();
    Verdict::check(
        n >= MIN_SUBSTANTIAL_PARAGRAPHS,
        CheckStatus::Warning,
        format!("{n} paragraphs"),
    )
}

fn unique_paragraphs(ctx: &PageContext) -> Verdict {
    let paragraphs = substantial_paragraphs(ctx);
    let mut seen = HashSet::new();
    let repeated = paragraphs.iter().filter(|p| !seen.insert(p.as_str())).count();
    Verdict::check(repeated == 0, CheckStatus::Warning, format!("{repeated} repeated"))
}

fn sentence_length(ctx: &PageContext) -> Verdict {
    let sentences = regex!(r"[.!?]+")
        .split(&ctx.text)
        .filter(|s| s.split_whitespace().count() > SENTENCE_MIN_WORDS)
        .count();
    let avg = if sentences == 0 {
        0.0
    } else {
        ctx.word_count as f64 / sentences as f64
    };
    Verdict::check(
        (SENTENCE_AVG_MIN..=SENTENCE_AVG_MAX).contains(&avg),
        CheckStatus::Warning,
        format!("{avg:.1} words"),
    )
}

fn vocabulary_diversity(ctx: &PageContext) -> Verdict {
    let unique: HashSet<String> = ctx
        .words()
        .filter(|w| w.chars().count() > DIVERSITY_MIN_CHARS)
        .map(str::to_lowercase)
        .collect();
    let r = ratio(unique.len(), ctx.word_count);
    Verdict::check(
        r > DIVERSITY_RATIO,
        CheckStatus::Warning,
        format!("{:.0}% unique", r * 100.0),
    )
}

fn engaging_questions(ctx: &PageContext) -> Verdict {
    let n = ctx.text.matches('?').count();
    Verdict::check(n >= 1, CheckStatus::Info, format!("{n} questions"))
}

fn data_points(ctx: &PageContext) -> Verdict {
    let n = regex!(r"\b\d+(?:,\d{3})*(?:\.\d+)?%?\b").find_iter(&ctx.text).count();
    Verdict::check(n >= MIN_DATA_POINTS, CheckStatus::Info, format!("{n} data points"))
}

fn text_emphasis(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("strong, b, em"));
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} elements"))
}

// ====== Linking ======

fn internal_links(ctx: &PageContext) -> Verdict {
    let n = ctx.internal_links().len();
    Verdict::check(
        (INTERNAL_LINKS_MIN..=INTERNAL_LINKS_MAX).contains(&n),
        CheckStatus::Warning,
        format!("{n} links"),
    )
}

fn external_links(ctx: &PageContext) -> Verdict {
    let n = ctx.external_links().len();
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} links"))
}

fn link_density(ctx: &PageContext) -> Verdict {
    let links = ctx.links().len();
    let density = if ctx.word_count == 0 {
        0.0
    } else {
        links as f64 / (ctx.word_count as f64 / 100.0)
    };
    Verdict::check(
        (LINK_DENSITY_MIN..=LINK_DENSITY_MAX).contains(&density),
        CheckStatus::Warning,
        format!("{density:.1}"),
    )
}

fn external_nofollow(ctx: &PageContext) -> Verdict {
    let external = ctx.external_links();
    let nofollow = external.iter().filter(|l| l.rel_has("nofollow")).count();
    Verdict::info(format!("{nofollow}/{}", external.len()))
}

fn link_qualification(ctx: &PageContext) -> Verdict {
    let external = ctx.external_links();
    let nofollow = external.iter().any(|l| l.rel_has("nofollow"));
    let sponsored = ctx
        .links()
        .iter()
        .filter(|l| l.rel_has("sponsored") || l.rel_has("ugc"))
        .count();
    Verdict::check(
        external.is_empty() || sponsored > 0 || nofollow,
        CheckStatus::Info,
        format!("{sponsored} sponsored/ugc"),
    )
}

fn jump_links(ctx: &PageContext) -> Verdict {
    let n = PageExtractor::count_attr_matching(&ctx.document, selector!("a[href^='#']"), "href", |h| {
        h.len() > 1
    });
    Verdict::check(n >= MIN_JUMP_LINKS, CheckStatus::Info, format!("{n} jump links"))
}

// ====== E-E-A-T ======

fn author_attribution(ctx: &PageContext) -> Verdict {
    let has = contains_any(&ctx.html_lower(), AUTHOR_MARKERS);
    Verdict::check(has, CheckStatus::Warning, present(has))
}

fn content_date(ctx: &PageContext) -> Verdict {
    let has = contains_any(&ctx.html_lower(), DATE_MARKERS);
    Verdict::check(has, CheckStatus::Warning, present(has))
}

fn trust_pages(ctx: &PageContext) -> Verdict {
    let has = ctx
        .links()
        .iter()
        .any(|l| regex!(r"(?i)about|contact|team").is_match(&l.href));
    Verdict::check(has, CheckStatus::Info, found(has))
}

fn source_citations(ctx: &PageContext) -> Verdict {
    let has = contains_any(&ctx.text_lower(), CITATION_MARKERS);
    Verdict::check(has, CheckStatus::Info, found(has))
}

fn expertise_signals(ctx: &PageContext) -> Verdict {
    let has = contains_any(&ctx.text_lower(), EXPERTISE_MARKERS);
    Verdict::check(has, CheckStatus::Info, found(has))
}

fn contact_information(ctx: &PageContext) -> Verdict {
    let has = has_contact_details(&ctx.text);
    Verdict::check(has, CheckStatus::Info, found(has))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryKey;
    use crate::service::auditor::check::run_checks;
    use crate::test_utils::{words, PageFixture, RICH_PAGE};

    fn result_for(html: &str) -> crate::domain::CategoryResult {
        run_checks(&PageFixture::new(html).build(), CHECKS)
    }

    #[test]
    fn table_matches_published_count() {
        assert_eq!(CHECKS.len(), CategoryKey::Content.contract_check_count());
    }

    #[test]
    fn content_length_tiers() {
        let status = |n: usize| {
            result_for(&format!("<p>{}</p>", words(n)))
                .check("Content Length")
                .unwrap()
                .status
        };
        assert_eq!(status(299), CheckStatus::Fail);
        assert_eq!(status(300), CheckStatus::Warning);
        assert_eq!(status(1000), CheckStatus::Pass);
    }

    #[test]
    fn zero_words_gives_zero_link_density() {
        let result = result_for("<html><body></body></html>");
        let density = result.check("Link Density").unwrap();
        assert_eq!(density.status, CheckStatus::Warning);
        assert_eq!(density.value, "0.0");
        assert_eq!(result.check("Sentence Length").unwrap().value, "0.0 words");
        assert_eq!(result.check("Vocabulary Diversity").unwrap().value, "0% unique");
    }

    #[test]
    fn repeated_paragraphs_are_reported() {
        let para = "This exact paragraph of boilerplate text appears twice.";
        let result = result_for(&format!("<p>{para}</p><p>{para}</p><p>short</p>"));
        let unique = result.check("Unique Paragraphs").unwrap();
        assert_eq!(unique.status, CheckStatus::Warning);
        assert_eq!(unique.value, "1 repeated");
        assert_eq!(result.check("Paragraph Structure").unwrap().value, "2 paragraphs");
    }

    #[test]
    fn statistics_and_questions() {
        let result = result_for("<p>We grew 45% in 2023 to 1,200 customers. Why does it matter?</p>");
        assert_eq!(result.check("Data & Statistics").unwrap().value, "3 data points");
        assert_eq!(result.check("Engaging Questions").unwrap().status, CheckStatus::Pass);
    }

    #[test]
    fn external_link_qualification() {
        let result = result_for(r#"<a href="https://other.org/">x</a>"#);
        assert_eq!(result.check("Link Qualification").unwrap().status, CheckStatus::Info);
        assert_eq!(result.check("External Nofollow").unwrap().value, "0/1");

        let result = result_for(r#"<a href="https://other.org/" rel="nofollow">x</a>"#);
        assert_eq!(result.check("Link Qualification").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("External Nofollow").unwrap().value, "1/1");
    }

    #[test]
    fn jump_links_ignore_bare_hash() {
        let result = result_for(r##"<a href="#a">a</a><a href="#b">b</a><a href="#">top</a>"##);
        assert_eq!(result.check("Jump Links").unwrap().value, "2 jump links");
        let result = result_for(r##"<a href="#a">a</a><a href="#b">b</a><a href="#c">c</a>"##);
        assert_eq!(result.check("Jump Links").unwrap().status, CheckStatus::Pass);
    }

    #[test]
    fn rich_page_eeat_signals() {
        let result = result_for(RICH_PAGE);
        assert_eq!(result.check("Author Attribution").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Trust Pages Linked").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Contact Information").unwrap().status, CheckStatus::Pass);
        assert_eq!(result.check("Text Emphasis").unwrap().status, CheckStatus::Info);
    }
}

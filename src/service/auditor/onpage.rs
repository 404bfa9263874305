//! On-page SEO: title and meta, headings, images and body structure.

use super::check::{check, CheckSpec, Verdict};
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::{heading_hierarchy_ok, PageExtractor};

const TITLE_MIN_CHARS: usize = 30;
const TITLE_MAX_CHARS: usize = 60;
const TITLE_PREVIEW_CHARS: usize = 50;
const TITLE_UNIQUE_RATIO: f64 = 0.7;
const DESCRIPTION_MIN_CHARS: usize = 120;
const DESCRIPTION_MAX_CHARS: usize = 160;
const DESCRIPTION_PREVIEW_CHARS: usize = 60;
const H1_MIN_CHARS: usize = 10;
const H2_MIN: usize = 2;
const H2_MAX: usize = 10;
const LAZY_EXEMPT_IMAGES: usize = 3;
const SRCSET_EXEMPT_IMAGES: usize = 2;
const EMPTY_ALT_RATIO: f64 = 0.2;
const MIN_PARAGRAPHS: usize = 3;
const MIN_WORDS: usize = 300;
const DEPTH_GOOD_WORDS: usize = 500;
const DEPTH_THIN_WORDS: usize = 200;

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // Title & Meta
    check("Title Tag Present", "Title & Meta", Impact::Critical,
        "Title tag exists", "Add descriptive title tag", title_present),
    check("Title Length", "Title & Meta", Impact::High,
        "Title characters", "Optimize to 50-60 characters", title_length),
    check("Title Uniqueness", "Title & Meta", Impact::Medium,
        "Unique words in title", "Avoid repetitive words", title_uniqueness),
    check("Single Title Tag", "Title & Meta", Impact::Medium,
        "One title element in head", "Remove duplicate title tags", single_title),
    check("Meta Description", "Title & Meta", Impact::High,
        "Description presence", "Add meta description", meta_description),
    check("Description Length", "Title & Meta", Impact::High,
        "Description characters", "Optimize to 150-160 characters", description_length),
    check("Meta Keywords", "Title & Meta", Impact::Low,
        "Keywords meta tag", "Meta keywords are deprecated", meta_keywords),
    check("Language Attribute", "Title & Meta", Impact::Medium,
        "HTML lang attribute", "Add lang attribute", language),
    check("Favicon", "Title & Meta", Impact::Low,
        "Site icon", "Add favicon", favicon),
    // Headings
    check("H1 Tag", "Headings", Impact::Critical,
        "H1 count", "Use exactly one H1", h1_tag),
    check("H1 Content", "Headings", Impact::High,
        "H1 text length", "Write descriptive H1", h1_content),
    check("H2 Tags", "Headings", Impact::High,
        "H2 count", "Use 2-6 H2 tags for structure", h2_tags),
    check("H3 Tags", "Headings", Impact::Low,
        "H3 count", "Use H3 for subsections", h3_tags),
    check("No Empty Headings", "Headings", Impact::Medium,
        "Empty headings", "Fill or remove empty headings", empty_headings),
    check("Heading Hierarchy", "Headings", Impact::Medium,
        "Proper heading order", "Follow H1>H2>H3 order", heading_hierarchy),
    // Images
    check("Image Alt Text", "Images", Impact::High,
        "Alt attributes", "Add alt to all images", image_alt),
    check("Image Dimensions", "Images", Impact::Medium,
        "Width/height set", "Specify dimensions to prevent CLS", image_dimensions),
    check("Lazy Loading", "Images", Impact::Medium,
        "Lazy loaded images", "Add loading=\"lazy\"", lazy_loading),
    check("Responsive Images", "Images", Impact::Medium,
        "Srcset usage", "Use srcset for responsive images", responsive_images),
    check("Modern Image Formats", "Images", Impact::Low,
        "WebP images", "Consider WebP format", modern_formats),
    check("Meaningful Alt Text", "Images", Impact::Medium,
        "Non-empty alt text", "Add descriptive alt text", meaningful_alt),
    // Content Structure
    check("Paragraph Count", "Content Structure", Impact::Medium,
        "Paragraphs", "Use paragraphs for readability", paragraph_count),
    check("List Usage", "Content Structure", Impact::Low,
        "Lists present", "Use lists for scannability", list_usage),
    check("Word Count", "Content Structure", Impact::Medium,
        "Content length", "Aim for 300+ words", word_count),
    check("Content Depth", "Content Structure", Impact::High,
        "Content substance", "Add more valuable content", content_depth),
];

fn title_text(ctx: &PageContext) -> String {
    PageExtractor::extract_title(&ctx.document).unwrap_or_default()
}

fn description_text(ctx: &PageContext) -> String {
    PageExtractor::meta_content(PageExtractor::meta_by_name(&ctx.document, "description"))
        .map(|d| d.trim().to_string())
        .unwrap_or_default()
}

/// First `max` characters plus an ellipsis when longer, `"Missing"` when empty.
fn preview(text: &str, max: usize) -> String {
    if text.is_empty() {
        "Missing".to_string()
    } else if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

// ====== Title & Meta ======

fn title_present(ctx: &PageContext) -> Verdict {
    let title = title_text(ctx);
    Verdict::check(
        !title.is_empty(),
        CheckStatus::Fail,
        preview(&title, TITLE_PREVIEW_CHARS),
    )
}

fn title_length(ctx: &PageContext) -> Verdict {
    let len = title_text(ctx).chars().count();
    Verdict::check(
        (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len),
        CheckStatus::Warning,
        format!("{len} chars"),
    )
}

fn title_uniqueness(ctx: &PageContext) -> Verdict {
    let lower = title_text(ctx).to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let mut unique = words.clone();
    unique.sort_unstable();
    unique.dedup();
    Verdict::check(
        unique.len() as f64 >= words.len() as f64 * TITLE_UNIQUE_RATIO,
        CheckStatus::Warning,
        format!("{}/{}", unique.len(), words.len()),
    )
}

fn single_title(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("head title"));
    Verdict::check(n <= 1, CheckStatus::Warning, format!("{n} title tag(s)"))
}

fn meta_description(ctx: &PageContext) -> Verdict {
    let desc = description_text(ctx);
    Verdict::check(
        !desc.is_empty(),
        CheckStatus::Fail,
        preview(&desc, DESCRIPTION_PREVIEW_CHARS),
    )
}

fn description_length(ctx: &PageContext) -> Verdict {
    let len = description_text(ctx).chars().count();
    Verdict::check(
        (DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&len),
        CheckStatus::Warning,
        format!("{len} chars"),
    )
}

fn meta_keywords(ctx: &PageContext) -> Verdict {
    let has = PageExtractor::meta_by_name(&ctx.document, "keywords").is_some();
    Verdict::info(if has { "Present" } else { "Not set (OK - deprecated)" })
}

fn language(ctx: &PageContext) -> Verdict {
    let lang = PageExtractor::first_attr(&ctx.document, selector!("html"), "lang").unwrap_or_default();
    if lang.is_empty() {
        Verdict::warning("Not set")
    } else {
        Verdict::pass(lang)
    }
}

fn favicon(ctx: &PageContext) -> Verdict {
    let has = ctx
        .document
        .select(selector!("link[rel]"))
        .any(|el| {
            el.value()
                .attr("rel")
                .is_some_and(|rel| rel.split_whitespace().any(|t| t.to_lowercase().contains("icon")))
        });
    Verdict::check(has, CheckStatus::Warning, if has { "Present" } else { "Missing" })
}

// ====== Headings ======

fn h1_tag(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("h1"));
    let status = match n {
        1 => CheckStatus::Pass,
        0 => CheckStatus::Fail,
        _ => CheckStatus::Warning,
    };
    Verdict::new(status, format!("{n} H1 tag(s)"))
}

fn h1_content(ctx: &PageContext) -> Verdict {
    let text = PageExtractor::first(&ctx.document, selector!("h1"))
        .map(|el| PageExtractor::element_text(el).trim().to_string())
        .unwrap_or_default();
    let len = text.chars().count();
    let value = if text.is_empty() {
        "Empty".to_string()
    } else {
        format!("{len} chars")
    };
    Verdict::check(len >= H1_MIN_CHARS, CheckStatus::Warning, value)
}

fn h2_tags(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("h2"));
    Verdict::check(
        (H2_MIN..=H2_MAX).contains(&n),
        CheckStatus::Warning,
        format!("{n} H2 tag(s)"),
    )
}

fn h3_tags(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("h3"));
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} H3 tag(s)"))
}

fn empty_headings(ctx: &PageContext) -> Verdict {
    let n = PageExtractor::extract_headings(&ctx.document)
        .iter()
        .filter(|h| h.text.trim().is_empty())
        .count();
    Verdict::check(n == 0, CheckStatus::Warning, format!("{n} empty"))
}

fn heading_hierarchy(ctx: &PageContext) -> Verdict {
    let levels: Vec<u8> = PageExtractor::extract_headings(&ctx.document)
        .iter()
        .map(|h| h.level)
        .collect();
    let ok = heading_hierarchy_ok(&levels);
    Verdict::check(ok, CheckStatus::Warning, if ok { "Correct" } else { "Skipped levels" })
}

// ====== Images ======

fn image_alt(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let with_alt = images.iter().filter(|i| i.has_alt()).count();
    Verdict::check(
        with_alt == images.len(),
        CheckStatus::Warning,
        format!("{with_alt}/{}", images.len()),
    )
}

fn image_dimensions(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let sized = images.iter().filter(|i| i.has_dimensions()).count();
    Verdict::check(
        sized == images.len(),
        CheckStatus::Warning,
        format!("{sized}/{}", images.len()),
    )
}

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
        format!("{n} with srcset"),
    )
}

fn modern_formats(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let n = images.iter().filter(|i| i.is_webp()).count();
    Verdict::check(
        n > 0 || images.is_empty(),
        CheckStatus::Info,
        format!("{n} WebP"),
    )
}

fn meaningful_alt(ctx: &PageContext) -> Verdict {
    let images = ctx.images();
    let empty = images.iter().filter(|i| i.has_empty_alt()).count();
    Verdict::check(
        empty as f64 <= images.len() as f64 * EMPTY_ALT_RATIO,
        CheckStatus::Warning,
        format!("{}/{}", images.len() - empty, images.len()),
    )
}

// ====== Content Structure ======

fn paragraph_count(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("p"));
    Verdict::check(n >= MIN_PARAGRAPHS, CheckStatus::Warning, format!("{n} paragraphs"))
}

fn list_usage(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("ul, ol"));
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} lists"))
}

fn word_count(ctx: &PageContext) -> Verdict {
    let n = ctx.word_count;
    Verdict::check(n >= MIN_WORDS, CheckStatus::Warning, format!("{n} words"))
}

fn content_depth(ctx: &PageContext) -> Verdict {
    let n = ctx.word_count;
    if n >= DEPTH_GOOD_WORDS {
        Verdict::pass("Comprehensive")
    } else if n >= DEPTH_THIN_WORDS {
        Verdict::warning("Thin content")
    } else {
        Verdict::fail("Thin content")
    }
}

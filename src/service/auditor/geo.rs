//! GEO/AEO: how well a page can be parsed, quoted and trusted by generative
//! search engines and answer engines.

use super::check::{check, found, present, ratio, set, CheckSpec, Verdict};
use super::technical::json_ld_count;
use crate::domain::{CheckStatus, Impact, PageContext};
use crate::extractor::PageExtractor;

const ENTITY_TYPES: &[&str] = &[
    "Person",
    "Organization",
    "Product",
    "Place",
    "Event",
    "Article",
    "WebPage",
];
const MIN_SEMANTIC_ELEMENTS: usize = 3;
const MIN_LISTS: usize = 2;
const MIN_QUESTIONS: usize = 2;
const ANSWER_FIRST_MARKERS: &[&str] = &["is", "are", "means", "provides", "helps", "allows"];
const PRONOUN_OPENERS: &[&str] = &["it ", "this ", "that ", "they "];
const MAX_PRONOUN_RATIO: f64 = 0.2;
const COMPLEX_WORD_CHARS: usize = 12;
const MAX_COMPLEX_RATIO: f64 = 0.05;
const CONVERSATIONAL_WORDS: &[&str] = &["you", "your", "you're", "we", "our", "we're"];
const MIN_CONVERSATIONAL_RATIO: f64 = 0.005;
const GENERIC_HEADINGS: &[&str] = &["introduction", "conclusion", "overview", "summary", "more"];
const DESCRIPTIVE_HEADING_WORDS: usize = 3;
const DESCRIPTIVE_HEADING_RATIO: f64 = 0.5;
const LONG_PARAGRAPH_WORDS: usize = 100;
const MAX_LONG_PARAGRAPHS: usize = 2;
const WORDS_PER_SECTION: f64 = 300.0;
const MIN_SECTION_RATIO: f64 = 0.8;
const EXAMPLE_PHRASES: &[&str] = &[
    "for example",
    "such as",
    "e.g.",
    "for instance",
    "like this",
    "including",
    "specifically",
];
const MIN_EXAMPLES: usize = 2;
const CITATION_PHRASES: &[&str] = &[
    "according to",
    "source:",
    "cited",
    "reference",
    "study shows",
    "research",
    "data from",
];
const MIN_CITATION_LINKS: usize = 2;
const AI_LENGTH_MIN: usize = 500;
const AI_LENGTH_MAX: usize = 3000;
const AI_LENGTH_SHORT: usize = 300;

#[rustfmt::skip]
pub static CHECKS: &[CheckSpec] = &[
    // AI Parsing
    check("JSON-LD Structured Data", "AI Parsing", Impact::Critical,
        "Schema.org markup for AI", "Add JSON-LD schema for AI understanding", json_ld),
    check("FAQ Schema", "AI Parsing", Impact::Critical,
        "FAQPage structured data", "Add FAQPage schema for AI snippets", faq_schema),
    check("HowTo Schema", "AI Parsing", Impact::High,
        "Step-by-step schema", "Add HowTo schema for instructions", howto_schema),
    check("Entity Schema Markup", "AI Parsing", Impact::High,
        "Schema.org entities", "Add entity schemas (Person, Organization, Article)", entity_schema),
    check("Speakable Schema", "AI Parsing", Impact::Medium,
        "Voice assistant optimization", "Add Speakable schema for voice search", speakable),
    check("Entity sameAs Links", "AI Parsing", Impact::Medium,
        "Entity disambiguation", "Add sameAs links to Wikipedia/social profiles", same_as),
    // Semantic Structure
    check("Semantic HTML5", "Semantic Structure", Impact::High,
        "Semantic structure", "Use semantic HTML for AI comprehension", semantic_html),
    check("Data Tables", "Semantic Structure", Impact::Medium,
        "Tabular data", "Use tables for structured comparisons", data_tables),
    check("Structured Lists", "Semantic Structure", Impact::High,
        "Lists for AI extraction", "Use bullet/numbered lists for key points", structured_lists),
    check("Figure Captions", "Semantic Structure", Impact::Medium,
        "Image context for AI", "Use figcaption for image descriptions", figure_captions),
    check("Definition Lists", "Semantic Structure", Impact::Low,
        "Term definitions", "Use <dl> for glossary/definitions", definition_lists),
    check("Blockquote Citations", "Semantic Structure", Impact::Low,
        "Quoted content", "Use blockquote for expert citations", blockquotes),
    // LLM Interpretability
    check("Q&A Patterns", "LLM Interpretability", Impact::Critical,
        "Question-answer format", "Include Q&A format for AI snippets", qa_patterns),
    check("Direct Definitions", "LLM Interpretability", Impact::Critical,
        "Clear definitions", "Provide direct \"X is...\" definitions", direct_definitions),
    check("Answer-First Writing", "LLM Interpretability", Impact::High,
        "Inverted pyramid style", "Lead with the answer, not background", answer_first),
    check("Self-Contained Sentences", "LLM Interpretability", Impact::High,
        "Extractable sentences", "Avoid starting sentences with it/this/that", self_contained),
    check("Plain Language", "LLM Interpretability", Impact::High,
        "Accessible language", "Use simple, clear language for AI", plain_language),
    check("Conversational Tone", "LLM Interpretability", Impact::Medium,
        "Natural language style", "Use conversational you/we language", conversational_tone),
    // Snippet Readiness
    check("Question Headings", "Snippet Readiness", Impact::Critical,
        "Prompt-aligned headings", "Use questions as headings (What is X?)", question_headings),
    check("Descriptive Headings", "Snippet Readiness", Impact::High,
        "Context-rich headings", "Use specific, descriptive headings", descriptive_headings),
    check("Concise Paragraphs", "Snippet Readiness", Impact::High,
        "Paragraph length", "Keep paragraphs under 100 words", concise_paragraphs),
    check("Section Granularity", "Snippet Readiness", Impact::High,
        "Heading density", "Add more subheadings for passage ranking", section_granularity),
    check("Step-by-Step Format", "Snippet Readiness", Impact::Medium,
        "Sequential instructions", "Structure how-to content with numbered steps", step_by_step),
    check("Concrete Examples", "Snippet Readiness", Impact::Medium,
        "Specific examples", "Include specific examples for clarity", concrete_examples),
    // Trust & Freshness
    check("Content Timestamps", "Trust & Freshness", Impact::High,
        "Freshness signals", "Add visible publish/update dates", content_timestamps),
    check("Last-Modified Header", "Trust & Freshness", Impact::Medium,
        "HTTP freshness", "Set Last-Modified header for freshness", last_modified),
    check("Author Attribution", "Trust & Freshness", Impact::Critical,
        "E-E-A-T author signals", "Add visible author name and bio", author_attribution),
    check("Source Citations", "Trust & Freshness", Impact::High,
        "Factual citations", "Cite authoritative sources with links", source_citations),
    // AI Optimization
    check("LLMs.txt File", "AI Optimization", Impact::Low,
        "AI crawler guidance", "Add llms.txt for AI crawler permissions", llms_txt),
    check("AI-Friendly Length", "AI Optimization", Impact::Medium,
        "Content length", "Aim for 500-3000 words for AI context windows", ai_friendly_length),
];

fn info_present(has: bool) -> Verdict {
    Verdict::check(has, CheckStatus::Info, present(has))
}

fn count_info(n: usize, unit: &str) -> Verdict {
    Verdict::check(n > 0, CheckStatus::Info, format!("{n} {unit}"))
}

/// Text of the h1-h4 headings, in document order.
fn outline_headings(ctx: &PageContext) -> Vec<String> {
    ctx.document
        .select(selector!("h1, h2, h3, h4"))
        .map(PageExtractor::element_text)
        .collect()
}

fn paragraph_texts(ctx: &PageContext) -> Vec<String> {
    ctx.document
        .select(selector!("p"))
        .map(PageExtractor::element_text)
        .collect()
}

// ====== AI Parsing ======

fn json_ld(ctx: &PageContext) -> Verdict {
    let n = json_ld_count(ctx);
    Verdict::check(n > 0, CheckStatus::Fail, format!("{n} blocks"))
}

fn faq_schema(ctx: &PageContext) -> Verdict {
    let html = ctx.html();
    let has = html.contains("FAQPage") || html.contains("\"Question\"");
    Verdict::check(has, CheckStatus::Warning, present(has))
}

fn howto_schema(ctx: &PageContext) -> Verdict {
    info_present(ctx.html().contains("HowTo"))
}

fn entity_schema(ctx: &PageContext) -> Verdict {
    let html = ctx.html();
    let entities: Vec<&str> = ENTITY_TYPES
        .iter()
        .copied()
        .filter(|t| html.contains(t))
        .collect();
    if entities.is_empty() {
        Verdict::warning("None found")
    } else {
        Verdict::pass(entities.join(", "))
    }
}

fn speakable(ctx: &PageContext) -> Verdict {
    info_present(ctx.html_lower().contains("speakable"))
}

fn same_as(ctx: &PageContext) -> Verdict {
    info_present(ctx.html().contains("sameAs"))
}

// ====== Semantic Structure ======

fn semantic_html(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("article, section, aside, nav, header, footer, main"));
    Verdict::check(n >= MIN_SEMANTIC_ELEMENTS, CheckStatus::Warning, format!("{n} elements"))
}

fn data_tables(ctx: &PageContext) -> Verdict {
    count_info(ctx.count(selector!("table")), "tables")
}

fn structured_lists(ctx: &PageContext) -> Verdict {
    let n = ctx.count(selector!("ul, ol"));
    Verdict::check(n >= MIN_LISTS, CheckStatus::Warning, format!("{n} lists"))
}

fn figure_captions(ctx: &PageContext) -> Verdict {
    count_info(ctx.count(selector!("figcaption")), "captions")
}

fn definition_lists(ctx: &PageContext) -> Verdict {
    count_info(ctx.count(selector!("dl")), "definition lists")
}

fn blockquotes(ctx: &PageContext) -> Verdict {
    count_info(ctx.count(selector!("blockquote")), "blockquotes")
}

// ====== LLM Interpretability ======

fn qa_patterns(ctx: &PageContext) -> Verdict {
    let n = regex!(r"(what|how|why|when|where|who|which|can|does|is|are)\s+[^.?]*\?")
        .find_iter(&ctx.text_lower())
        .count();
    Verdict::check(n >= MIN_QUESTIONS, CheckStatus::Warning, format!("{n} questions"))
}

fn direct_definitions(ctx: &PageContext) -> Verdict {
    let n = regex!(r"\b\w+\s+(?:is|are|means|refers to|defined as|is defined as)\s+[^.]+\.")
        .find_iter(&ctx.text)
        .count();
    Verdict::check(n > 0, CheckStatus::Warning, format!("{n} found"))
}

/// Substring match on the first paragraph; "is" inside "this" counts.
fn answer_first(ctx: &PageContext) -> Verdict {
    let first = PageExtractor::first(&ctx.document, selector!("p"))
        .map(|p| PageExtractor::element_text(p).to_lowercase())
        .unwrap_or_default();
    let has = ANSWER_FIRST_MARKERS.iter().any(|m| first.contains(m));
    Verdict::check(
        has,
        CheckStatus::Warning,
        if has { "Key info upfront" } else { "Buried lede" },
    )
}

fn self_contained(ctx: &PageContext) -> Verdict {
    let sentences: Vec<&str> = regex!(r"[.!?]+").split(&ctx.text).collect();
    let pronoun_led = sentences
        .iter()
        .filter(|s| {
            let s = s.to_lowercase();
            let s = s.trim();
            PRONOUN_OPENERS.iter().any(|p| s.starts_with(p))
        })
        .count();
    let r = ratio(pronoun_led, sentences.len());
    Verdict::check(
        r < MAX_PRONOUN_RATIO,
        CheckStatus::Warning,
        format!("{:.0}% start with pronouns", r * 100.0),
    )
}

fn plain_language(ctx: &PageContext) -> Verdict {
    let complex = ctx
        .words()
        .filter(|w| w.chars().count() > COMPLEX_WORD_CHARS)
        .count();
    let r = ratio(complex, ctx.word_count);
    Verdict::check(
        r < MAX_COMPLEX_RATIO,
        CheckStatus::Warning,
        format!("{:.1}% complex words", r * 100.0),
    )
}

fn conversational_tone(ctx: &PageContext) -> Verdict {
    let text = ctx.text_lower();
    let n: usize = CONVERSATIONAL_WORDS
        .iter()
        .map(|w| text.matches(&format!(" {w} ")).count())
        .sum();
    let r = ratio(n, ctx.word_count);
    Verdict::check(
        r > MIN_CONVERSATIONAL_RATIO,
        CheckStatus::Info,
        format!("{:.2}%", r * 100.0),
    )
}

// ====== Snippet Readiness ======

fn question_headings(ctx: &PageContext) -> Verdict {
    let n = outline_headings(ctx).iter().filter(|h| h.contains('?')).count();
    Verdict::check(n > 0, CheckStatus::Warning, format!("{n} question headings"))
}

fn descriptive_headings(ctx: &PageContext) -> Verdict {
    let headings = outline_headings(ctx);
    let descriptive = headings
        .iter()
        .filter(|h| {
            h.split_whitespace().count() >= DESCRIPTIVE_HEADING_WORDS
                && !GENERIC_HEADINGS.contains(&h.to_lowercase().trim())
        })
        .count();
    Verdict::check(
        descriptive as f64 >= headings.len() as f64 * DESCRIPTIVE_HEADING_RATIO,
        CheckStatus::Warning,
        format!("{descriptive}/{} descriptive", headings.len()),
    )
}

fn concise_paragraphs(ctx: &PageContext) -> Verdict {
    let long = paragraph_texts(ctx)
        .iter()
        .filter(|p| p.split_whitespace().count() > LONG_PARAGRAPH_WORDS)
        .count();
    Verdict::check(
        long <= MAX_LONG_PARAGRAPHS,
        CheckStatus::Warning,
        format!("{long} paragraphs over 100 words"),
    )
}

fn section_granularity(ctx: &PageContext) -> Verdict {
    let h2 = ctx.count(selector!("h2"));
    let h3 = ctx.count(selector!("h3"));
    let section_ratio = if ctx.word_count as f64 > WORDS_PER_SECTION {
        (h2 + h3) as f64 / (ctx.word_count as f64 / WORDS_PER_SECTION)
    } else {
        1.0
    };
    Verdict::check(
        section_ratio >= MIN_SECTION_RATIO,
        CheckStatus::Warning,
        format!("{h2} H2s, {h3} H3s"),
    )
}

fn step_by_step(ctx: &PageContext) -> Verdict {
    let steps = regex!(r"step\s*\d|first,|second,|third,|finally,|next,|then,")
        .find_iter(&ctx.text_lower())
        .count();
    let ordered = ctx.count(selector!("ol"));
    Verdict::check(
        steps > 0 || ordered > 0,
        CheckStatus::Info,
        format!("{steps} step indicators, {ordered} ordered lists"),
    )
}

fn concrete_examples(ctx: &PageContext) -> Verdict {
    let text = ctx.text_lower();
    let n: usize = EXAMPLE_PHRASES.iter().map(|p| text.matches(p).count()).sum();
    Verdict::check(n >= MIN_EXAMPLES, CheckStatus::Info, format!("{n} example phrases"))
}

// ====== Trust & Freshness ======

fn content_timestamps(ctx: &PageContext) -> Verdict {
    let times = ctx.count(selector!("time"));
    let dated = PageExtractor::meta_by_property(&ctx.document, "article:modified_time").is_some()
        || PageExtractor::meta_by_property(&ctx.document, "article:published_time").is_some();
    Verdict::check(
        times > 0 || dated,
        CheckStatus::Warning,
        format!("{times} time elements"),
    )
}

fn last_modified(ctx: &PageContext) -> Verdict {
    let has = !ctx.response.header_or_empty("last-modified").is_empty();
    Verdict::check(has, CheckStatus::Info, set(has))
}

/// Passes on an author-ish class or on schema markup mentioning an author;
/// the evidence only reports the visible class.
fn author_attribution(ctx: &PageContext) -> Verdict {
    let by_class = ctx
        .document
        .select(selector!("[class]"))
        .any(|el| {
            el.value()
                .classes()
                .any(|c| regex!(r"(?i)author|bio|byline|written-by").is_match(c))
        });
    let html = ctx.html();
    let by_schema =
        ctx.html_lower().contains("author") && (html.contains("Person") || html.contains("name"));
    Verdict::check(by_class || by_schema, CheckStatus::Warning, found(by_class))
}

fn source_citations(ctx: &PageContext) -> Verdict {
    let text = ctx.text_lower();
    let cited = CITATION_PHRASES.iter().any(|p| text.contains(p));
    let external = ctx.external_links().len();
    Verdict::check(
        cited || external >= MIN_CITATION_LINKS,
        CheckStatus::Warning,
        format!("{external} external links"),
    )
}

// ====== AI Optimization ======

fn llms_txt(ctx: &PageContext) -> Verdict {
    let exists = ctx.probes.llms_txt.exists();
    Verdict::check(exists, CheckStatus::Info, found(exists))
}

fn ai_friendly_length(ctx: &PageContext) -> Verdict {
    let n = ctx.word_count;
    let status = if (AI_LENGTH_MIN..=AI_LENGTH_MAX).contains(&n) {
        CheckStatus::Pass
    } else if n < AI_LENGTH_SHORT {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    };
    Verdict::new(status, format!("{n} words"))
}

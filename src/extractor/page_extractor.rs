//! Optional-returning DOM lookups shared by every analyzer.
//!
//! Nothing here dereferences an element or attribute that may be absent:
//! lookups hand back `Option`s or empty collections and the caller's `else`
//! branch is the absence case.

use scraper::{ElementRef, Html, Selector};
use url::Url;

#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub loading: Option<String>,
    pub srcset: Option<String>,
}

impl ExtractedImage {
    /// Alt present and non-empty.
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// Alt attribute present but set to the empty string.
    pub fn has_empty_alt(&self) -> bool {
        self.alt.as_deref() == Some("")
    }

    pub fn has_dimensions(&self) -> bool {
        non_empty(&self.width) && non_empty(&self.height)
    }

    pub fn is_lazy(&self) -> bool {
        self.loading.as_deref() == Some("lazy")
    }

    pub fn has_srcset(&self) -> bool {
        non_empty(&self.srcset)
    }

    pub fn is_webp(&self) -> bool {
        self.src.as_deref().is_some_and(|s| s.contains(".webp"))
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedLink {
    pub href: String,
    pub text: String,
    pub rel: String,
}

impl ExtractedLink {
    pub fn rel_has(&self, token: &str) -> bool {
        self.rel.contains(token)
    }

    /// Empty after trimming, or the bare `#` placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.href.trim().is_empty() || self.href == "#"
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedHeading {
    pub level: u8,
    pub text: String,
}

pub struct PageExtractor;

impl PageExtractor {
    pub fn count(html: &Html, selector: &Selector) -> usize {
        html.select(selector).count()
    }

    pub fn exists(html: &Html, selector: &Selector) -> bool {
        html.select(selector).next().is_some()
    }

    pub fn first<'a>(html: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
        html.select(selector).next()
    }

    pub fn first_attr(html: &Html, selector: &Selector, attr: &str) -> Option<String> {
        Self::first(html, selector)
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string)
    }

    /// Concatenated text nodes of one element.
    pub fn element_text(el: ElementRef<'_>) -> String {
        el.text().collect::<String>()
    }

    /// Text nodes of the whole document joined by single spaces.
    pub fn document_text(html: &Html) -> String {
        html.root_element().text().collect::<Vec<_>>().join(" ")
    }

    /// Elements matching `selector` whose `attr` satisfies `pred`.
    pub fn count_attr_matching(
        html: &Html,
        selector: &Selector,
        attr: &str,
        pred: impl Fn(&str) -> bool,
    ) -> usize {
        html.select(selector)
            .filter(|el| el.value().attr(attr).is_some_and(&pred))
            .count()
    }

    pub fn extract_title(html: &Html) -> Option<String> {
        Self::first(html, selector!("title"))
            .map(|el| Self::element_text(el).trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn meta_by_name<'a>(html: &'a Html, name: &str) -> Option<ElementRef<'a>> {
        html.select(selector!("meta[name]"))
            .find(|el| el.value().attr("name") == Some(name))
    }

    pub fn meta_by_property<'a>(html: &'a Html, property: &str) -> Option<ElementRef<'a>> {
        html.select(selector!("meta[property]"))
            .find(|el| el.value().attr("property") == Some(property))
    }

    pub fn meta_content(el: Option<ElementRef<'_>>) -> Option<String> {
        el.and_then(|e| e.value().attr("content")).map(str::to_string)
    }

    /// `<link>` elements whose space-separated `rel` contains `token`.
    pub fn links_with_rel<'a>(html: &'a Html, token: &str) -> Vec<ElementRef<'a>> {
        html.select(selector!("link[rel]"))
            .filter(|el| {
                el.value()
                    .attr("rel")
                    .is_some_and(|rel| rel.split_whitespace().any(|t| t == token))
            })
            .collect()
    }

    pub fn extract_images(html: &Html) -> Vec<ExtractedImage> {
        html.select(selector!("img"))
            .map(|el| {
                let attr = |name: &str| el.value().attr(name).map(str::to_string);
                ExtractedImage {
                    src: attr("src"),
                    alt: attr("alt"),
                    width: attr("width"),
                    height: attr("height"),
                    loading: attr("loading"),
                    srcset: attr("srcset"),
                }
            })
            .collect()
    }

    pub fn extract_links(html: &Html) -> Vec<ExtractedLink> {
        html.select(selector!("a[href]"))
            .map(|el| ExtractedLink {
                href: el.value().attr("href").unwrap_or_default().to_string(),
                text: Self::element_text(el),
                rel: el.value().attr("rel").unwrap_or_default().to_string(),
            })
            .collect()
    }

    /// Every h1-h6 in document order, empty ones included.
    pub fn extract_headings(html: &Html) -> Vec<ExtractedHeading> {
        html.select(selector!("h1, h2, h3, h4, h5, h6"))
            .filter_map(|el| {
                let level = el.value().name().trim_start_matches('h').parse::<u8>().ok()?;
                Some(ExtractedHeading {
                    level,
                    text: Self::element_text(el),
                })
            })
            .collect()
    }
}

/// True when no heading is more than one level deeper than the heading
/// before it. Going back up is unrestricted; an empty outline is fine.
pub fn heading_hierarchy_ok(levels: &[u8]) -> bool {
    levels.windows(2).all(|w| w[1] <= w[0] + 1)
}

/// Resolve `href` against the page and test whether it stays on `netloc`.
/// Unresolvable hrefs are tested as written.
pub fn is_internal_href(base: &Url, netloc: &str, href: &str) -> bool {
    match base.join(href) {
        Ok(resolved) => resolved.as_str().contains(netloc),
        Err(_) => href.contains(netloc),
    }
}

/// Absolute http(s) link that does not mention the page's own host.
pub fn is_external_href(netloc: &str, href: &str) -> bool {
    href.starts_with("http") && !href.contains(netloc)
}

fn non_empty(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.is_empty())
}

//! The per-audit document snapshot every analyzer reads from.
//!
//! Built once after the primary fetch and never mutated. `scraper::Html` is
//! not `Send`, so a `PageContext` lives entirely inside the blocking task that
//! runs the analyzers; the `Send` parts travel there as a [`FetchedPage`].

use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::extractor::{
    is_external_href, is_internal_href, ExtractedImage, ExtractedLink, PageExtractor,
};

/// The audited URL as requested, plus its parsed form.
#[derive(Debug, Clone)]
pub struct TargetUrl {
    raw: String,
    parsed: Url,
}

impl TargetUrl {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            raw: raw.to_string(),
            parsed: Url::parse(raw)?,
        })
    }

    /// The URL string exactly as the caller supplied it (after scheme
    /// normalisation).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }

    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    pub fn is_https(&self) -> bool {
        self.scheme() == "https"
    }

    /// Host with the port when one was given explicitly.
    pub fn netloc(&self) -> String {
        let host = self.parsed.host_str().unwrap_or_default();
        match self.parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        self.parsed.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.parsed.query()
    }

    /// `scheme://netloc/<path>` for a well-known file at the site root.
    pub fn root_resource(&self, path: &str) -> String {
        format!("{}://{}/{}", self.scheme(), self.netloc(), path.trim_start_matches('/'))
    }
}

/// What the primary fetch returned.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Decoded (decompressed) payload.
    pub body: Vec<u8>,
    /// Payload as text, after charset decoding.
    pub html: String,
}

impl FetchedResponse {
    /// Case-insensitive header lookup. Missing or non-UTF-8 values read as
    /// absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Header value or empty string.
    pub fn header_or_empty(&self, name: &str) -> &str {
        self.header(name).unwrap_or_default()
    }

    /// Every value of a repeatable header, joined by `", "`.
    pub fn header_joined(&self, name: &str) -> String {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn byte_len(&self) -> usize {
        self.body.len()
    }

    pub fn size_kb(&self) -> f64 {
        self.byte_len() as f64 / 1024.0
    }
}

/// Outcome of a best-effort probe for a well-known file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResourceStatus {
    /// HTTP 200 at the given URL.
    Found(String),
    /// Anything else: other status, timeout, DNS, refused, not probed.
    #[default]
    NotFound,
}

impl ResourceStatus {
    pub fn exists(&self) -> bool {
        matches!(self, ResourceStatus::Found(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProbeResults {
    pub robots_txt: ResourceStatus,
    pub sitemap_xml: ResourceStatus,
    pub llms_txt: ResourceStatus,
}

/// Everything the primary fetch produced, minus the parsed tree.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub target: TargetUrl,
    pub response: FetchedResponse,
    pub load_time: Duration,
}

pub struct PageContext {
    pub target: TargetUrl,
    pub response: FetchedResponse,
    pub document: Html,
    pub text: String,
    pub word_count: usize,
    pub load_time: Duration,
    pub probes: ProbeResults,
}

impl PageContext {
    pub fn new(page: FetchedPage, probes: ProbeResults) -> Self {
        let document = Html::parse_document(&page.response.html);
        let text = PageExtractor::document_text(&document);
        let word_count = text.split_whitespace().count();
        Self {
            target: page.target,
            response: page.response,
            document,
            text,
            word_count,
            load_time: page.load_time,
            probes,
        }
    }

    /// Raw markup as received.
    pub fn html(&self) -> &str {
        &self.response.html
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    pub fn text_lower(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn html_lower(&self) -> String {
        self.html().to_lowercase()
    }

    pub fn load_time_secs(&self) -> f64 {
        self.load_time.as_secs_f64()
    }

    pub fn count(&self, selector: &Selector) -> usize {
        PageExtractor::count(&self.document, selector)
    }

    pub fn exists(&self, selector: &Selector) -> bool {
        PageExtractor::exists(&self.document, selector)
    }

    pub fn images(&self) -> Vec<ExtractedImage> {
        PageExtractor::extract_images(&self.document)
    }

    /// Every `<a href>` on the page.
    pub fn links(&self) -> Vec<ExtractedLink> {
        PageExtractor::extract_links(&self.document)
    }

    /// Links that resolve onto the audited host.
    pub fn internal_links(&self) -> Vec<ExtractedLink> {
        let netloc = self.target.netloc();
        self.links()
            .into_iter()
            .filter(|l| is_internal_href(self.target.url(), &netloc, &l.href))
            .collect()
    }

    /// Absolute links to other hosts.
    pub fn external_links(&self) -> Vec<ExtractedLink> {
        let netloc = self.target.netloc();
        self.links()
            .into_iter()
            .filter(|l| is_external_href(&netloc, &l.href))
            .collect()
    }
}

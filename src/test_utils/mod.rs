//! Fixtures for building page snapshots without touching the network.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use crate::domain::{
    FetchedPage, FetchedResponse, PageContext, ProbeResults, ResourceStatus, TargetUrl,
};

pub const DEFAULT_URL: &str = "https://example.com/";

/// Builder for a [`PageContext`] around an HTML string.
pub struct PageFixture {
    html: String,
    url: String,
    status: u16,
    headers: HeaderMap,
    load_time: Duration,
    probes: ProbeResults,
    body_len: Option<usize>,
}

impl PageFixture {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            url: DEFAULT_URL.to_string(),
            status: 200,
            headers: HeaderMap::new(),
            load_time: Duration::from_millis(500),
            probes: ProbeResults::default(),
            body_len: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(v) = HeaderValue::from_str(value) {
            self.headers.append(HeaderName::from_static(name), v);
        }
        self
    }

    pub fn load_time_secs(mut self, secs: f64) -> Self {
        self.load_time = Duration::from_secs_f64(secs);
        self
    }

    /// Pad the payload to `len` bytes without changing the markup.
    pub fn body_len(mut self, len: usize) -> Self {
        self.body_len = Some(len);
        self
    }

    pub fn all_probes_found(mut self) -> Self {
        let found = |p: &str| ResourceStatus::Found(format!("https://example.com/{p}"));
        self.probes = ProbeResults {
            robots_txt: found("robots.txt"),
            sitemap_xml: found("sitemap.xml"),
            llms_txt: found("llms.txt"),
        };
        self
    }

    pub fn page(self) -> FetchedPage {
        let mut body = self.html.clone().into_bytes();
        if let Some(len) = self.body_len {
            body.resize(len, b' ');
        }
        FetchedPage {
            target: TargetUrl::parse(&self.url).expect("fixture url must parse"),
            response: FetchedResponse {
                status: self.status,
                headers: self.headers,
                body,
                html: self.html,
            },
            load_time: self.load_time,
        }
    }

    pub fn build(self) -> PageContext {
        let probes = self.probes.clone();
        PageContext::new(self.page(), probes)
    }
}

/// `n` filler words separated by spaces.
pub fn words(n: usize) -> String {
    vec!["lorem"; n].join(" ")
}

/// Minimal page that fails the headline on-page checks: no title, no
/// description, no h1, one image without alt.
pub const BARE_PAGE: &str =
    r#"<html><head></head><body><p>Short page.</p><img src="photo.jpg"></body></html>"#;

/// A page that exercises most positive signals.
pub const RICH_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>What is SEO? A Complete Guide to Search Optimization</title>
<meta name="description" content="Learn what SEO is, how search engines rank pages, and the practical steps you can take today to improve visibility for your site and content.">
<link rel="canonical" href="https://example.com/">
<link rel="icon" href="/favicon.ico">
<meta property="og:title" content="What is SEO?">
<meta property="og:image" content="https://example.com/og.png">
<script type="application/ld+json">{"@type":"Organization","name":"Example"}</script>
<script type="application/ld+json">{"@type":"FAQPage"}</script>
<script type="application/ld+json">{"@type":"Article","author":{"@type":"Person","name":"Ada"}}</script>
</head>
<body>
<header><nav><a href="/about">About our team</a></nav></header>
<main>
<article>
<h1>What is SEO?</h1>
<h2>How do search engines work?</h2>
<p>Search engine optimization is the practice of improving a site so it ranks well.</p>
<h2>Why does it matter for you?</h2>
<p>You get more visitors when your pages answer questions clearly.</p>
<ul><li>One</li><li>Two</li></ul>
<ol><li>First</li></ol>
<img src="a.webp" alt="Chart" width="10" height="10" loading="lazy" srcset="a2.webp 2x">
</article>
</main>
<footer><a href="mailto:hi@example.com">hi@example.com</a> <a href="tel:5551234567">555-123-4567</a></footer>
</body>
</html>"#;

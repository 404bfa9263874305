//! Primary page fetch and best-effort probes for well-known site files.

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::FetchSettings;
use crate::domain::{FetchedPage, FetchedResponse, ResourceStatus, TargetUrl};
use crate::error::{AppError, Result};
use crate::service::http::{create_client, ClientType};

/// Trim and default the scheme to https when the caller left it off.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(settings: &FetchSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: create_client(ClientType::Primary, settings)?,
        })
    }

    /// One GET, no retries. Any transport error or non-2xx status aborts.
    pub async fn fetch(&self, target: TargetUrl) -> Result<FetchedPage> {
        let url = target.as_str().to_string();
        info!("[FETCH] GET {}", url);
        let started = Instant::now();

        let response = self
            .client
            .get(target.url().clone())
            .header(ACCEPT_ENCODING, "gzip, deflate")
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("[FETCH] {} answered {}", url, status);
            return Err(AppError::FetchStatus {
                url,
                status: status.as_u16(),
            });
        }

        let headers = response.headers().clone();
        let raw = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let load_time = started.elapsed();

        let encoding = header_str(&headers, CONTENT_ENCODING);
        let body = decode_content(encoding, &raw);
        let html = decode_text(&body, header_str(&headers, CONTENT_TYPE));

        info!(
            "[FETCH] {} -> {} ({} bytes, {:.2}s)",
            url,
            status.as_u16(),
            body.len(),
            load_time.as_secs_f64()
        );

        Ok(FetchedPage {
            target,
            response: FetchedResponse {
                status: status.as_u16(),
                headers,
                body,
                html,
            },
            load_time,
        })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> AppError {
    warn!("[FETCH] {} failed: {}", url, e);
    if e.is_timeout() {
        AppError::FetchTimeout {
            url: url.to_string(),
        }
    } else {
        AppError::fetch(url, e.to_string())
    }
}

fn header_str(headers: &reqwest::header::HeaderMap, name: reqwest::header::HeaderName) -> &str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn read_all(mut reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    Ok(out)
}

/// Undo `Content-Encoding`. A body that fails to decode is kept as received.
pub fn decode_content(encoding: &str, raw: &[u8]) -> Vec<u8> {
    let decoded = match encoding.trim().to_ascii_lowercase().as_str() {
        "gzip" | "x-gzip" => read_all(GzDecoder::new(raw)),
        // Servers disagree on whether "deflate" carries the zlib wrapper.
        "deflate" => read_all(ZlibDecoder::new(raw)).or_else(|_| read_all(DeflateDecoder::new(raw))),
        _ => return raw.to_vec(),
    };
    decoded.unwrap_or_else(|e| {
        warn!("[FETCH] could not decode {} body: {}", encoding, e);
        raw.to_vec()
    })
}

/// Text of the payload using the `charset` from `Content-Type`, UTF-8 when
/// absent or unknown. A byte-order mark wins over both.
pub fn decode_text(body: &[u8], content_type: &str) -> String {
    let encoding = content_type
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset="))
        .find_map(|label| encoding_rs::Encoding::for_label(label.trim_matches('"').as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        debug!("[FETCH] replaced malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

pub struct ResourceChecker {
    client: Client,
}

impl ResourceChecker {
    pub fn new(settings: &FetchSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: create_client(ClientType::Probe, settings)?,
        })
    }

    pub async fn check_robots_txt(&self, target: &TargetUrl) -> ResourceStatus {
        self.check_resource(target, "robots.txt").await
    }

    pub async fn check_sitemap_xml(&self, target: &TargetUrl) -> ResourceStatus {
        self.check_resource(target, "sitemap.xml").await
    }

    pub async fn check_llms_txt(&self, target: &TargetUrl) -> ResourceStatus {
        self.check_resource(target, "llms.txt").await
    }

    /// Only a 200 counts. Every failure collapses to `NotFound`.
    async fn check_resource(&self, target: &TargetUrl, path: &str) -> ResourceStatus {
        let url = target.root_resource(path);
        match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                debug!("[PROBE] Found: {}", url);
                ResourceStatus::Found(url)
            }
            Ok(response) => {
                debug!("[PROBE] {} for {}", response.status(), url);
                ResourceStatus::NotFound
            }
            Err(e) => {
                debug!("[PROBE] {} unavailable: {}", url, e);
                ResourceStatus::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn scheme_is_defaulted_to_https() {
        assert_eq!(normalize_url("  example.com/a "), "https://example.com/a");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn gzip_body_is_inflated() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"<p>hello</p>").unwrap();
        let gz = enc.finish().unwrap();
        assert_eq!(decode_content("gzip", &gz), b"<p>hello</p>");
    }

    #[test]
    fn undecodable_body_is_kept() {
        assert_eq!(decode_content("gzip", b"plain"), b"plain");
        assert_eq!(decode_content("", b"plain"), b"plain");
        assert_eq!(decode_content("br", b"plain"), b"plain");
    }

    #[test]
    fn charset_label_drives_text_decoding() {
        let latin1 = [0x63, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text(&latin1, "text/html; charset=ISO-8859-1"), "café");
        assert_eq!(decode_text("café".as_bytes(), "text/html"), "café");
        assert_eq!(decode_text("café".as_bytes(), "text/html; charset=\"utf-8\""), "café");
    }
}

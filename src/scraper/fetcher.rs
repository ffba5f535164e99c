// fetcher.rs
use crate::scraper::extractor::extract_listings;
use crate::scraper::models::RawListing;
use crate::scraper::ScraperError;
use encoding_rs::{Encoding, UTF_8};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Result of fetching one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    NetworkError(String),
    BadStatus(u16),
}

impl FetchOutcome {
    /// Extract the page's listings. A failed fetch is an empty page.
    pub fn into_listings(self, url: &str) -> Vec<RawListing> {
        match self {
            FetchOutcome::Success(html) => extract_listings(&html),
            FetchOutcome::NetworkError(msg) => {
                warn!(url, error = %msg, "Page fetch failed, treating page as empty");
                Vec::new()
            }
            FetchOutcome::BadStatus(status) => {
                warn!(url, status, "Unexpected status, treating page as empty");
                Vec::new()
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, FetchOutcome::Success(_))
    }
}

/// Anything that can hand back the markup of a page.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> FetchOutcome;
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        if timeout.is_zero() {
            return Err(ScraperError::Client("fetch timeout must be non-zero".into()));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PageSource for PageFetcher {
    fn fetch_page(&self, url: &str) -> FetchOutcome {
        let resp = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::NetworkError(e.to_string()),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            return FetchOutcome::BadStatus(status.as_u16());
        }

        let header_charset = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_label)
            .map(str::to_string);

        let bytes = match resp.bytes() {
            Ok(bytes) => bytes,
            Err(e) => return FetchOutcome::NetworkError(e.to_string()),
        };

        let encoding = page_encoding(header_charset.as_deref(), &bytes);
        let (body, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(url, encoding = encoding.name(), "Page contained undecodable bytes");
        }

        debug!(url, bytes = bytes.len(), encoding = encoding.name(), "Fetched page");
        FetchOutcome::Success(body.into_owned())
    }
}

// How far into the document a <meta charset> declaration is looked for.
const META_SNIFF_LEN: usize = 1024;

/// Encoding of a page body: the `Content-Type` charset wins, then a
/// `<meta>` declaration near the top of the document, then UTF-8.
pub fn page_encoding(header_charset: Option<&str>, body: &[u8]) -> &'static Encoding {
    header_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8)
}

fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(idx) = rest.find("<meta") {
        rest = &rest[idx + "<meta".len()..];
        let tag = rest.split('>').next().unwrap_or("");
        if let Some(encoding) = charset_label(tag).and_then(|l| Encoding::for_label(l.as_bytes())) {
            return Some(encoding);
        }
    }
    None
}

/// Value of a `charset=` parameter, without quotes.
fn charset_label(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let value = text[start..].trim_start_matches(['"', '\'', ' ']);
    let end = value
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        .unwrap_or(value.len());

    let label = &value[..end];
    (!label.is_empty()).then_some(label)
}

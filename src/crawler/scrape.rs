use scraper::{Html, Selector};
use url::Url;

use super::error::{CrawlError, CrawlResult};

pub const NO_TITLE: &str = "No title";

/// Resolves `href` against `base` and strips the fragment.
///
/// Absolute hrefs replace the base entirely. Scheme and host come back
/// lowercased and default ports are dropped by `Url` itself.
pub fn normalize_url(href: &str, base: &Url) -> Result<Url, url::ParseError> {
    let mut url = base.join(href.trim())?;
    url.set_fragment(None);
    Ok(url)
}

pub fn is_crawlable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host().is_some()
}

/// Parses a seed URL, rejecting anything that cannot be fetched over HTTP(S).
pub fn parse_seed(seed: &str) -> CrawlResult<Url> {
    let mut url = Url::parse(seed.trim()).map_err(|source| CrawlError::InvalidSeed {
        url: seed.to_string(),
        source,
    })?;
    if !is_crawlable(&url) {
        return Err(CrawlError::UnsupportedScheme(url.scheme().to_string()));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Title and outbound links of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    /// Document order, duplicates kept
    pub links: Vec<Url>,
}

impl ExtractedPage {
    pub fn untitled() -> Self {
        Self {
            title: NO_TITLE.to_string(),
            links: Vec::new(),
        }
    }
}

pub trait LinkExtractor: Send + Sync {
    fn extract(&self, body: &[u8], base: &Url) -> CrawlResult<ExtractedPage>;
}

/// `LinkExtractor` using scraper's HTML5 parser
#[derive(Debug)]
pub struct HtmlLinkExtractor {
    title: Selector,
    anchors: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> CrawlResult<Self> {
        let title = Selector::parse("title")
            .map_err(|e| CrawlError::Parse(format!("Failed to parse <title> selector: {}", e)))?;
        let anchors = Selector::parse("a[href]")
            .map_err(|e| CrawlError::Parse(format!("Failed to parse <a> selector: {}", e)))?;
        Ok(Self { title, anchors })
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &[u8], base: &Url) -> CrawlResult<ExtractedPage> {
        // bytes that are not UTF-8 become U+FFFD, markup and hrefs survive
        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        let title = document
            .select(&self.title)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let links = document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| normalize_url(href, base).ok())
            .filter(is_crawlable)
            .collect();

        Ok(ExtractedPage { title, links })
    }
}

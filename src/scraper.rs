use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, header};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use url::Url;

use crate::content::Document;
use crate::error::{AppError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "svg"];

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article, main, [role='main']").expect("Failed to parse main selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title, h1").expect("Failed to parse title selector")
});

/// Source of web page text. `Ok(None)` means the page had no readable text.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn fetch_document(&self, url: &Url) -> std::result::Result<Option<Document>, reqwest::Error>;
}

/// Fetches web pages and reduces them to readable text.
#[derive(Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageLoader for WebScraper {
    async fn fetch_document(&self, url: &Url) -> std::result::Result<Option<Document>, reqwest::Error> {
        let response = self.client.get(url.as_str()).send().await?.error_for_status()?;

        let is_plain_text = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/plain"));

        let body = response.text().await?;
        tracing::debug!(bytes = body.len(), is_plain_text, "Fetched page");

        let (title, text) = if is_plain_text {
            (None, normalize_whitespace(&body))
        } else {
            let document = Html::parse_document(&body);
            (extract_title(&document), extract_text(&document))
        };

        if text.is_empty() {
            return Ok(None);
        }

        Ok(Some(Document {
            content: text,
            source: url.to_string(),
            title,
            author: None,
        }))
    }
}

pub fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .map(|title| title.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|title| !title.is_empty())
}

/// Readable text of the page's main content, or of the whole body when
/// there is no `article`/`main` region.
pub fn extract_text(document: &Html) -> String {
    let main_text = document
        .select(&MAIN_SELECTOR)
        .map(visible_text)
        .find(|text| !text.is_empty());

    if let Some(text) = main_text {
        return text;
    }

    document
        .select(&BODY_SELECTOR)
        .next()
        .map(visible_text)
        .unwrap_or_default()
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });

        if !hidden {
            raw.push_str(text);
            raw.push('\n');
        }
    }

    normalize_whitespace(&raw)
}

/// Collapses runs of whitespace inside each line and drops blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(&collapsed);
    }

    result
}

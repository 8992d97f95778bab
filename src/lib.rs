pub mod api;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod llm;
pub mod scraper;
pub mod telemetry;
pub mod youtube;

use std::sync::Arc;
use cache::SummaryCache;
use config::Config;
use content::{ContentLoader, UrlLoader};
use error::{AppError, Result};
use llm::{GroqClient, Summarizer};
use crate::scraper::WebScraper;
use youtube::YoutubeLoader;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub loader: Arc<dyn ContentLoader>,
    pub summarizer: Arc<dyn Summarizer>,
    /// Present only when caching is enabled.
    pub cache: Option<Arc<SummaryCache>>,
}

impl AppState {
    pub fn new(
        config: Config,
        loader: Arc<dyn ContentLoader>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        let cache = config
            .enable_cache
            .then(|| Arc::new(SummaryCache::new(config.cache_ttl)));

        Self {
            config: Arc::new(config),
            loader,
            summarizer,
            cache,
        }
    }

    /// Wires the real YouTube/web loaders and the Groq client.
    pub fn from_config(config: Config) -> Result<Self> {
        let youtube = YoutubeLoader::new(config.fetch_timeout)
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        let web = WebScraper::new(config.fetch_timeout)?;
        let summarizer = GroqClient::new(&config.groq_base_url, &config.groq_model)?;

        Ok(Self::new(
            config,
            Arc::new(UrlLoader::new(youtube, web)),
            Arc::new(summarizer),
        ))
    }
}

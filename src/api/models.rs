use std::fmt;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub groq_api_key: Option<String>,
    pub url: String,
    /// Word budget for this summary; capped at the configured maximum.
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl fmt::Debug for SummarizeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeRequest")
            .field("groq_api_key", &self.groq_api_key.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url)
            .field("max_length", &self.max_length)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// A request that passed validation, with defaults resolved.
#[derive(Clone)]
pub struct ValidatedRequest {
    pub api_key: String,
    pub url: Url,
    pub max_length: usize,
}

impl fmt::Debug for ValidatedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedRequest")
            .field("api_key", &"<redacted>")
            .field("url", &self.url.as_str())
            .field("max_length", &self.max_length)
            .finish()
    }
}

impl SummarizeRequest {
    pub fn validate(&self, config: &Config) -> Result<ValidatedRequest> {
        let api_key = self
            .groq_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| config.groq_api_key.clone())
            .ok_or_else(|| AppError::InvalidInput("API Key is required".to_string()))?;

        let url = self.url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidInput("URL is required".to_string()));
        }
        let url = parse_url(url)
            .ok_or_else(|| AppError::InvalidInput("Invalid URL provided".to_string()))?;

        let max_length = match self.max_length {
            Some(0) => {
                return Err(AppError::InvalidInput(
                    "max_length must be greater than zero".to_string(),
                ));
            }
            Some(requested) => requested.min(config.max_summary_length),
            None => config.max_summary_length,
        };

        Ok(ValidatedRequest {
            api_key,
            url,
            max_length,
        })
    }
}

/// Accepts absolute http(s) URLs whose host is an IP address or a dotted domain.
pub fn parse_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let valid_host = match url.host()? {
        Host::Ipv4(_) | Host::Ipv6(_) => true,
        Host::Domain(domain) => {
            let labels: Vec<&str> = domain.split('.').collect();
            labels.len() >= 2
                && labels.iter().all(|label| !label.is_empty())
                && labels
                    .last()
                    .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
        }
    };

    valid_host.then_some(url)
}

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Used when a request does not carry its own key.
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: String,
    /// Summary word budget, and the ceiling for per-request limits.
    pub max_summary_length: usize,
    pub max_content_chars: usize,
    pub enable_cache: bool,
    pub cache_ttl: chrono::Duration,
    pub log_level: String,
    pub fetch_timeout: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_number::<u16>("PORT", var("PORT"), 8000)?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let max_summary_length = parse_positive("MAX_SUMMARY_LENGTH", var("MAX_SUMMARY_LENGTH"), 300)?;
        let max_content_chars = parse_positive("MAX_CONTENT_CHARS", var("MAX_CONTENT_CHARS"), 24_000)?;
        let cache_ttl_hours = parse_positive("CACHE_TTL_HOURS", var("CACHE_TTL_HOURS"), 24)?;
        let fetch_timeout_secs = parse_positive("FETCH_TIMEOUT_SECS", var("FETCH_TIMEOUT_SECS"), 10)?;
        let request_timeout_secs = parse_positive("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 90)?;

        let cache_ttl = i64::try_from(cache_ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| {
                AppError::ConfigError(format!("CACHE_TTL_HOURS is too large: {}", cache_ttl_hours))
            })?;

        let enable_cache = match var("ENABLE_CACHE") {
            Some(value) => parse_bool("ENABLE_CACHE", &value)?,
            None => false,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_api_key: var("GROQ_API_KEY"),
            groq_model: var("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            groq_base_url: var("GROQ_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            max_summary_length,
            max_content_chars,
            enable_cache,
            cache_ttl,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs as u64),
            request_timeout: Duration::from_secs(request_timeout_secs as u64),
        })
    }
}

fn parse_number<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

fn parse_positive(key: &str, value: Option<String>, default: usize) -> Result<usize> {
    let parsed = parse_number::<usize>(key, value, default)?;
    if parsed == 0 {
        return Err(AppError::ConfigError(format!("{} must be greater than zero", key)));
    }
    Ok(parsed)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(format!("Invalid {}: {}", key, other))),
    }
}

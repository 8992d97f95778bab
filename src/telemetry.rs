use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppError, Result};

/// Installs the global subscriber; `level` is an `EnvFilter` directive such as
/// `info` or `groq_summarizer=debug,tower_http=info`.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| AppError::ConfigError(format!("Failed to initialise tracing: {}", e)))
}

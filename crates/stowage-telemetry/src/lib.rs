#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Logging initialisation for the stowage subsystem.
//!
//! Centralises tracing setup (fmt or JSON) behind a single entry point so the
//! host application installs exactly one subscriber. Background failures in
//! this subsystem (auto-purge, for instance) are only ever visible through
//! these logs, never through the UI.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default logging directive when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "STOWAGE_LOG_FORMAT";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log directive string (e.g. `info`, `stowage_transfer=debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Text,
    /// Structured JSON lines.
    Json,
}

impl LogFormat {
    /// Resolve the format from [`LOG_FORMAT_ENV`], defaulting to text.
    #[must_use]
    pub fn infer() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .as_deref()
            .map_or(Self::Text, Self::parse)
    }

    /// Parse a format label, treating anything unrecognised as text.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// The filter honours `RUST_LOG` when set, falling back to the configured
/// level directive.
///
/// # Errors
///
/// Returns an error if the directive cannot be parsed or another subscriber
/// has already been installed globally.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level))
        .map_err(|err| anyhow!("invalid log directive '{}': {err}", config.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}")),
        LogFormat::Text => registry
            .with(fmt::layer())
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}")),
    }
}

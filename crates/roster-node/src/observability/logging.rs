//! Structured logging initialization.
//!
//! Provides logging with:
//! - JSON or pretty format
//! - Request ID tracking (via the request span)
//! - Configurable log levels, overridable through `RUST_LOG`

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable pretty format (for development).
    #[default]
    Pretty,
    /// JSON format (for production log aggregation).
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Builds the default filter directive for a level.
pub fn default_directive(level: &str) -> String {
    format!(
        "roster={level},tower_http=debug,axum::rejection=trace",
        level = level
    )
}

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level (trace, debug, info, warn, error) for the roster crates
/// * `format` - Output format
///
/// # Example
///
/// ```rust,no_run
/// use roster_node::observability::{init_logging, LogFormat};
///
/// init_logging("info", LogFormat::Json);
/// ```
pub fn init_logging(level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }

    tracing::info!(
        level = %level,
        format = format.as_str(),
        "Logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::from_str("json", true), Ok(LogFormat::Json));
        assert_eq!(LogFormat::from_str("JSON", true), Ok(LogFormat::Json));
        assert_eq!(LogFormat::from_str("pretty", false), Ok(LogFormat::Pretty));
        assert!(LogFormat::from_str("yaml", true).is_err());
    }

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("debug");
        assert!(directive.starts_with("roster=debug"));
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}

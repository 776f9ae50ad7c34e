use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initialize structured logging based on configuration
///
/// Supports both JSON (production) and pretty (development) formats
/// with configurable log levels and optional file output. Console output goes
/// to stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(config)?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format.as_str() == "json" {
        // JSON format for production (structured logging)
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_line_number(true)
            .with_file(true);

        if let Some(file_path) = &config.file_path {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            let file_layer = json_layer.with_writer(std::sync::Arc::new(file));
            registry.with(file_layer).init();
        } else {
            registry.with(json_layer.with_writer(std::io::stderr)).init();
        }
    } else {
        // Pretty format for development (human-readable)
        let pretty_layer = fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_line_number(true)
            .with_file(false);

        if let Some(file_path) = &config.file_path {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            let file_layer = pretty_layer.with_writer(std::sync::Arc::new(file));
            registry.with(file_layer).init();
        } else {
            registry.with(pretty_layer.with_writer(std::io::stderr)).init();
        }
    }

    Ok(())
}

/// Filter from `RUST_LOG`, else the configured level. Player analytics
/// events live under the `analytics` target and are switched off here when
/// `analytics` is disabled; an explicit `RUST_LOG` directive still wins.
pub fn build_env_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    let log_level = parse_log_level(&config.level)?;

    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let rust_log_sets_analytics = std::env::var("RUST_LOG")
        .is_ok_and(|directives| directives.contains(ANALYTICS_TARGET));
    if !config.analytics && !rust_log_sets_analytics {
        filter = filter.add_directive(format!("{ANALYTICS_TARGET}=off").parse()?);
    }
    Ok(filter)
}

/// Tracing target of player analytics events
pub const ANALYTICS_TARGET: &str = "analytics";

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(parse_log_level("trace").is_ok());
        assert!(parse_log_level("debug").is_ok());
        assert!(parse_log_level("info").is_ok());
        assert!(parse_log_level("warn").is_ok());
        assert!(parse_log_level("error").is_ok());
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_parse_log_level_aliases() {
        assert_eq!(parse_log_level("WARNING").unwrap(), Level::WARN);
        assert_eq!(parse_log_level("Info").unwrap(), Level::INFO);
    }

    #[test]
    fn test_analytics_can_be_disabled() {
        let quiet = LoggingConfig {
            analytics: false,
            ..LoggingConfig::default()
        };
        if std::env::var("RUST_LOG").is_err() {
            let filter = build_env_filter(&quiet).unwrap().to_string();
            assert!(filter.contains("analytics=off"), "{filter}");
        }

        let filter = build_env_filter(&LoggingConfig::default()).unwrap().to_string();
        assert!(!filter.contains("analytics=off"));
    }

    #[test]
    fn test_init_rejects_bad_level() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }
}

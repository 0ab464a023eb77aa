//! Logging setup for the `rams` binary
//!
//! Events go to stderr so that JSON and YAML on stdout stay pipeable.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other log setting
pub const LOG_ENV: &str = "RAMS_LOG";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },

    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Pick the filter: `RAMS_LOG`, then `--verbose`, then the configured level
pub fn filter_directive(env_value: Option<String>, verbose: bool, configured: &str) -> String {
    match env_value.filter(|v| !v.trim().is_empty()) {
        Some(value) => value,
        None if verbose => "debug".to_string(),
        None => configured.to_string(),
    }
}

pub fn init(verbose: bool, configured: &str) -> Result<(), TelemetryError> {
    let directive = filter_directive(std::env::var(LOG_ENV).ok(), verbose, configured);
    let env_filter =
        EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
            value: directive.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

//! Structured logging.
//!
//! # Responsibilities
//! - Build the layered subscriber (filter + pretty or JSON output)
//! - Resolve the log filter from `RUST_LOG` or the configured level
//! - Install it as the process-wide default once

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Build the filter: `RUST_LOG` if set and valid, else `<crate>=<level>`.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter(rust_log.as_deref(), &config.log_level)
}

fn filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(level)))
}

fn default_directive(level: &str) -> String {
    format!("alarm_target_handler={},reqwest=warn,aws_config=warn", level)
}

fn layered(filter: EnvFilter, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => Box::new(registry.with(tracing_subscriber::fmt::layer())),
        LogFormat::Json => Box::new(
            registry.with(tracing_subscriber::fmt::layer().json().with_current_span(true)),
        ),
    }
}

/// The configured subscriber, not yet installed.
pub fn subscriber(config: &ObservabilityConfig) -> Box<dyn Subscriber + Send + Sync> {
    layered(env_filter(config), config.log_format)
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber(config))
}

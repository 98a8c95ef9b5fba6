//! Logging initialization
//!
//! Thin wrappers over `tracing-subscriber` that:
//! - respect the RUST_LOG environment variable (always wins)
//! - fall back to a configured filter, then to `CINNAMON_LOG`, then to "info"
//! - honor NO_COLOR
//!
//! # Usage
//! ```rust
//! use cinnamon_core::utils::init_logging;
//!
//! init_logging(Some("cinnamon_core=debug"));
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LoggingConfig, ENV_LOG};
use crate::utils::env::{env_opt, env_or_default};

/// Pick the effective filter; RUST_LOG beats the configured one
fn resolve_filter(filter: Option<&str>) -> EnvFilter {
    if env_opt("RUST_LOG").is_some() {
        return EnvFilter::from_default_env();
    }
    match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::new(env_or_default(ENV_LOG, "info")),
    }
}

/// Initialize human-readable logging on stderr
///
/// Uses `try_init` so calling it twice (e.g. from several tests) is harmless.
pub fn init_logging(filter: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(env_opt("NO_COLOR").is_none()),
        )
        .with(resolve_filter(filter))
        .try_init();
}

/// Initialize JSON logging for log aggregation systems
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(resolve_filter(filter))
        .try_init();
}

/// Initialize logging from a [`LoggingConfig`]
///
/// JSON output silently falls back to plain output when the `json-logging`
/// feature is disabled.
pub fn init_logging_from_config(config: Option<&LoggingConfig>) {
    let filter = config.and_then(|c| c.filter.as_deref());

    if config.map(|c| c.json_format).unwrap_or(false) {
        #[cfg(feature = "json-logging")]
        {
            init_json_logging(filter);
        }
        #[cfg(not(feature = "json-logging"))]
        {
            init_logging(filter);
        }
    } else {
        init_logging(filter);
    }
}

//! Structured logging for ses-firehose.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines and log shippers
//!
//! # Design Notes
//!
//! - stdout is reserved for command payloads (response JSON, masked values)
//! - stderr receives all log output (human or JSONL)
//! - Log events carry record ids and counts, never payload content

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel, LogSettings};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Stable event names, emitted as the `event` field.
pub mod event_names {
    pub const BATCH_STARTED: &str = "batch.started";
    pub const BATCH_COMPLETED: &str = "batch.completed";
    pub const RECORD_REDACTED: &str = "record.redacted";
    pub const RECORD_FAILED: &str = "record.failed";
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
}

/// Initialize the logging subsystem.
///
/// Should be called once at startup. A second call leaves the existing
/// subscriber in place.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_env("SES_REDACT_LOG_FILTER").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ses_firehose={level},ses_redact={level}",
            level = config.level
        ))
    });

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Initialize logging with defaults (for tests and simple cases).
pub fn init_default_logging() {
    init_logging(&LogConfig::resolve(&LogSettings::default(), None, None));
}

/// Generate a unique run ID for one batch.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // Shorten to first 12 hex chars for readability
    format!("run-{}", &uuid.simple().to_string()[..12])
}

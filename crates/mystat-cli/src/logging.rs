//! Diagnostics for the mystat binary
//!
//! Console diagnostics go to stderr so stdout carries only the table.
//! `RUST_LOG` overrides the verbosity-derived filter. With JSON logs
//! enabled, a daily rolling file is written under the log directory.

use std::io::IsTerminal;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "mystat.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for JSON log files
    pub log_dir: PathBuf,

    pub enable_json_logs: bool,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            include_location: false,
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 0 = warnings only, 1 = lifecycle events, 2+ = per-query detail
    pub fn for_verbosity(verbose: u8) -> Self {
        let default_filter = match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            _ => "info,mystat=debug,mystat_monitor=debug,mystat_connection=debug,mystat_driver_mysql=debug"
                .to_string(),
        };
        Self {
            default_filter,
            include_location: verbose >= 2,
            ..Self::default()
        }
    }

    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.enable_json_logs = enabled;
        self
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the JSON file writer on drop and must be
/// held until the program exits.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let mut guard = None;
    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "logging initialized"
    );

    Ok(guard)
}

/// Where JSON logs are written
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mystat")
        .join("logs")
}

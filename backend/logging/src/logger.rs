//! Structured Logger
//!
//! Wraps `tracing` to provide pretty or JSON console output, optional daily
//! file rotation (NDJSON), and environment-based level control.

use linehook_config::{LogFormat, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the background file writer alive. Drop it only at shutdown.
#[must_use]
pub struct LoggerGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless;
/// the second subscriber is discarded.
pub fn init_logger(config: &LoggingConfig) -> LoggerGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed(),
    };

    // Rolling file appender: writes NDJSON to `<dir>/linehook.log.YYYY-MM-DD`
    let (file_layer, file_guard) = match &config.dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "linehook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LoggerGuard { _file: file_guard }
}

use crate::error::ConfigError;
use crate::settings::{LogFormat, LoggingSettings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber described by `settings`.
///
/// `RUST_LOG` takes precedence over `settings.level`. When a log directory is
/// configured, output is teed to a daily rolling file; the returned guard must be
/// held until shutdown so buffered lines are flushed.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let (file_writer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match (settings.format, file_writer) {
        (LogFormat::Full, Some(file)) => builder
            .with_writer(std::io::stderr.and(file))
            .with_ansi(false)
            .try_init(),
        (LogFormat::Full, None) => builder.with_writer(std::io::stderr).try_init(),
        (LogFormat::Compact, Some(file)) => builder
            .compact()
            .with_writer(std::io::stderr.and(file))
            .with_ansi(false)
            .try_init(),
        (LogFormat::Compact, None) => builder.compact().with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::debug!(level = %settings.level, directory = ?settings.directory, "Logging initialized.");
    Ok(guard)
}

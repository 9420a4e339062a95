use crate::config::{default_data_dir, LoggingConfig};
use crate::error::{AppError, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "rete-dash.log";

fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(&config.level).into())
        .from_env_lossy()
}

/// Logs to a file, since the terminal belongs to the UI. The returned guard must
/// stay alive for buffered lines to be flushed.
pub fn init_file_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let path = config
        .file
        .clone()
        .unwrap_or_else(|| default_data_dir().join(LOG_FILE_NAME));

    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()
        .map_err(|e| AppError::Config(format!("failed to set logger: {}", e)))?;

    tracing::info!(target: "rete_dash::init", path = %path.display(), "logging initialized");
    Ok(guard)
}

pub fn init_stderr_logging(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().compact().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|e| AppError::Config(format!("failed to set logger: {}", e)))?;
    Ok(())
}

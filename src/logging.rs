//! Logging setup for the segmentation server and tools.
//!
//! Installs a global tracing subscriber writing to stdout and, unless
//! disabled in config, to a per-launch log file under `.segmenter/logs`.
//! Old log files are pruned to the configured count.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing::{debug, info, warn};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};
use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "segmenter";

static LOG_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    #[error("Failed to create log file at {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing according to `config`.
///
/// Subsequent calls are no-ops. Failures are returned so callers can fall
/// back to stderr without aborting startup.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }
    let timer = build_timer();
    let launch_log = if config.write_file {
        Some(create_launch_log()?)
    } else {
        None
    };
    let (file_layer, guard) = match &launch_log {
        Some((dir, name)) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling::never(dir, name));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_timer(timer.clone())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    let subscriber = Registry::default()
        .with(build_env_filter(&config.level))
        .with(fmt::layer().with_timer(timer).with_writer(std::io::stdout))
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = LOG_GUARD.set(guard);

    let Some((dir, name)) = launch_log else {
        info!("Logging initialized (stdout only)");
        return Ok(());
    };
    info!("Logging initialized; log file at {}", dir.join(&name).display());
    match prune_old_logs(&dir, config.max_files.max(1)) {
        Ok(0) => {}
        Ok(removed) => debug!(removed, "Pruned old log files"),
        Err(err) => warn!("Failed to read log directory {}: {err}", dir.display()),
    }
    Ok(())
}

/// Create this launch's log file up front; the rolling appender panics if it
/// cannot open it. Returns the logs dir and the file name.
fn create_launch_log() -> Result<(PathBuf, String), LoggingError> {
    let dir = app_dirs::logs_dir()?;
    let name = format_log_file_name(now_local_or_utc())?;
    let path = dir.join(&name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::LogFile { path, source })?;
    Ok((dir, name))
}

/// Delete the oldest `.log` files in `dir` beyond `keep`, returning how many went.
fn prune_old_logs(dir: &Path, keep: usize) -> std::io::Result<usize> {
    let mut logs: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "log"))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    let mut removed = 0;
    for (_, path) in logs.into_iter().take(excess) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(err) => warn!("Failed to remove old log file {}: {err}", path.display()),
        }
    }
    Ok(removed)
}

fn format_log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let name = now.format(NAME_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}_{name}.log"))
}

fn build_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `RUST_LOG` wins over the configured level.
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_filename_has_timestamp_and_prefix() {
        let fixed = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let name = format_log_file_name(fixed).unwrap();
        assert_eq!(name, "segmenter_2023-11-14_22-13-20.log");
    }

    #[test]
    fn prune_keeps_newest_logs_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        for idx in 0..5 {
            fs::write(dir.path().join(format!("segmenter_{idx}.log")), "").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        assert_eq!(prune_old_logs(dir.path(), 3).unwrap(), 2);
        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec![
                "notes.txt",
                "segmenter_2.log",
                "segmenter_3.log",
                "segmenter_4.log"
            ]
        );
    }

    #[test]
    fn prune_under_limit_removes_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("segmenter_0.log"), "").unwrap();
        assert_eq!(prune_old_logs(dir.path(), 10).unwrap(), 0);
        assert!(dir.path().join("segmenter_0.log").exists());
    }

    #[test]
    fn missing_log_dir_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(prune_old_logs(&dir.path().join("absent"), 3).is_err());
    }
}

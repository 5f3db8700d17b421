//! Tracing setup: stderr always, plus an optional per-run file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FILE_LOG_FILTER: &str = "info";

/// Create a per-run log writer in `{log_dir}/sync-{timestamp}.log`.
///
/// The returned guard must outlive all logging, or buffered lines are lost.
pub fn create_sync_log_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log dir: {}", log_dir.display()))?;

    let file_name = format!("sync-{}.log", Utc::now().format("%Y%m%d-%H%M%S"));
    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}

/// Install the global subscriber (once). `RUST_LOG` drives stderr; the file
/// layer, when `file_log_dir` is given, records `info` and above.
pub fn init_tracing(file_log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    let file = file_log_dir.and_then(|dir| match create_sync_log_writer(dir) {
        Ok(pair) => Some(pair),
        Err(error) => {
            eprintln!("Warning: file logging disabled: {error:#}");
            None
        }
    });
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new(FILE_LOG_FILTER)),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok();
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_creates_log_file_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("logs");

        let (writer, _guard) = create_sync_log_writer(&log_dir).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&log_dir).unwrap().collect();
        assert_eq!(entries.len(), 1, "exactly one log file should be created");
        let name = entries[0].as_ref().unwrap().file_name();
        let name = name.to_string_lossy();
        assert!(name.starts_with("sync-"), "got {name}");
        assert!(name.ends_with(".log"), "got {name}");
        drop(writer);
    }

    #[test]
    fn test_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("deep").join("nested").join("logs");
        assert!(create_sync_log_writer(&log_dir).is_ok());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_error_on_impossible_dir() {
        let bad = PathBuf::from("/dev/null/impossible/logs");
        assert!(create_sync_log_writer(&bad).is_err());
    }

    #[test]
    fn test_file_name_timestamp_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let (_writer, _guard) = create_sync_log_writer(tmp.path()).unwrap();

        let entry = std::fs::read_dir(tmp.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        let name = entry.file_name().to_string_lossy().to_string();
        // sync-YYYYMMDD-HHMMSS.log
        let stem = name
            .strip_prefix("sync-")
            .and_then(|s| s.strip_suffix(".log"))
            .unwrap();
        assert_eq!(stem.len(), 15, "got '{stem}'");
        assert_eq!(stem.chars().nth(8), Some('-'), "got '{stem}'");
    }
}

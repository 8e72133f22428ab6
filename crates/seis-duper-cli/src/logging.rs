use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/seis-duper.log";

/// Console events go to stderr so `survey` and `inspect` listings on stdout stay
/// clean; every event is also appended to `LOG_FILE_PATH`.
///
/// Keep the returned guard alive until exit or buffered file lines are lost.
pub fn init_logger() -> WorkerGuard {
    let directives = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let (filter_layer, invalid_directives) = match EnvFilter::try_new(&directives) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    };

    let log_file = PathBuf::from(
        env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
    );
    let (directory, file_name) = split_log_path(&log_file);

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_thread_ids(true),
        )
        .init();

    if let Some(e) = invalid_directives {
        warn!("Invalid TRACING_LEVEL '{}' ({}), using info", directives, e);
    }
    debug!(log_file = %log_file.display(), "Logging to stderr and file");

    guard
}


/// Directory and file name for the appender. A bare file name logs to the
/// working directory.
fn split_log_path(log_file: &Path) -> (&Path, &OsStr) {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file
        .file_name()
        .unwrap_or(OsStr::new("seis-duper.log"));
    (directory, file_name)
}

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::copier::{CopyRecord, CopyReport, CopyWarning};
use crate::error::Error;

pub const COPY_LOG_NAME: &str = "copy_log.txt";
pub const WARNING_LOG_NAME: &str = "warning_log.txt";

const COPY_LOG_HEADER: [&str; 3] = ["Original_File_Name", "Repeated", "Destination_File_Name"];

/// Paths of the log artifacts written for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub copy_log: PathBuf,
    /// `None` when the run produced no warnings.
    pub warning_log: Option<PathBuf>,
}

/// Write `copy_log.txt` and, when needed, `warning_log.txt` into `destination_root`.
pub fn write_logs(destination_root: &Path, report: &CopyReport) -> Result<LogPaths, Error> {
    let copy_log = destination_root.join(COPY_LOG_NAME);
    write_copy_log(&copy_log, &report.copied)?;

    let warning_log_path = destination_root.join(WARNING_LOG_NAME);
    let warning_log = if report.warnings.is_empty() {
        remove_stale(&warning_log_path)?;
        None
    } else {
        write_warning_log(&warning_log_path, &report.warnings)?;
        Some(warning_log_path)
    };

    Ok(LogPaths {
        copy_log,
        warning_log,
    })
}

pub fn write_copy_log(path: &Path, copied: &[CopyRecord]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(COPY_LOG_HEADER)?;
    for record in copied {
        wtr.write_record([
            record.original_name.as_str(),
            python_bool(record.repeated),
            record.destination_name.as_str(),
        ])?;
    }
    wtr.flush()?;
    debug!("Wrote {} rows to {}", copied.len(), path.display());
    Ok(())
}

pub fn write_warning_log(path: &Path, warnings: &[CopyWarning]) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    for warning in warnings {
        writeln!(writer, "{}", warning.message)?;
    }
    writer.flush()?;
    debug!("Wrote {} warnings to {}", warnings.len(), path.display());
    Ok(())
}

fn remove_stale(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner::{FileIndex, FileRecord};

/// Destination subdirectory for files whose basename collided across source directories.
pub const REPEATED_DIR_NAME: &str = "repeated_files";

/// A file copied to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRecord {
    pub original_name: String,
    pub repeated: bool,
    pub destination_name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A file skipped because its destination already existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyWarning {
    pub original_name: String,
    pub destination_name: String,
    pub source: PathBuf,
    pub message: String,
}

impl CopyWarning {
    fn new(record: &FileRecord, destination_name: String) -> Self {
        let message = format!(
            "Couldn't copy file {} because it's the same as in {}",
            record.basename, destination_name
        );
        Self {
            original_name: record.basename.clone(),
            destination_name,
            source: record.absolute_path.clone(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(CopyRecord),
    Skipped(CopyWarning),
}

/// Successes and warnings of one copy pass, each in recorded order.
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    pub copied: Vec<CopyRecord>,
    pub warnings: Vec<CopyWarning>,
}

impl CopyReport {
    fn push(&mut self, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied(record) => self.copied.push(record),
            CopyOutcome::Skipped(warning) => self.warnings.push(warning),
        }
    }

    pub fn processed(&self) -> usize {
        self.copied.len() + self.warnings.len()
    }
}

/// Create the destination root and the repeated bucket. Existing directories are fine.
pub fn prepare_destination(destination_root: &Path) -> Result<PathBuf, Error> {
    let repeated_dir = destination_root.join(REPEATED_DIR_NAME);
    fs::create_dir_all(&repeated_dir)?;
    Ok(repeated_dir)
}

/// Copies indexed files into the destination, renaming repeated basenames and
/// never overwriting anything already there.
pub struct CopyEngine<'a> {
    index: &'a FileIndex,
    destination_root: PathBuf,
    repeated_dir: PathBuf,
    repeated_counter: HashMap<String, usize>,
}

impl<'a> CopyEngine<'a> {
    pub fn new(index: &'a FileIndex, destination_root: &Path) -> Self {
        Self {
            index,
            destination_root: destination_root.to_path_buf(),
            repeated_dir: destination_root.join(REPEATED_DIR_NAME),
            repeated_counter: HashMap::new(),
        }
    }

    /// Decide where `record` goes. Advances the per-basename counter for repeated
    /// names whether or not the copy later succeeds.
    pub fn destination_for(&mut self, record: &FileRecord) -> (PathBuf, bool) {
        if self.index.is_repeated(&record.basename) {
            let counter = self
                .repeated_counter
                .entry(record.basename.clone())
                .or_insert(0);
            *counter += 1;
            let name = format!("{}_{}{}", record.stem, counter, record.extension);
            (self.repeated_dir.join(name), true)
        } else {
            (self.destination_root.join(&record.basename), false)
        }
    }

    pub fn run(mut self, reporter: &dyn ProgressReporter) -> Result<CopyReport, Error> {
        prepare_destination(&self.destination_root)?;

        let total = self.index.total();
        let mut report = CopyReport::default();
        reporter.on_copy_start(total);

        for (i, record) in self.index.records().iter().enumerate() {
            let attempt = i + 1;
            info!("Copying {}/{} files: {}", attempt, total, record.basename);
            reporter.on_copy_progress(attempt, total, &record.basename);

            let (destination, repeated) = self.destination_for(record);
            let outcome = copy_file(record, &destination, repeated)?;
            if let CopyOutcome::Skipped(warning) = &outcome {
                warn!("{}", warning.message);
            }
            report.push(outcome);
        }

        Ok(report)
    }
}

fn copy_file(record: &FileRecord, destination: &Path, repeated: bool) -> Result<CopyOutcome, Error> {
    let destination_name = destination
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    if destination.exists() {
        return Ok(CopyOutcome::Skipped(CopyWarning::new(record, destination_name)));
    }

    let copy_error = |source: io::Error| Error::Copy {
        from: record.absolute_path.clone(),
        to: destination.to_path_buf(),
        source,
    };

    let source = File::open(&record.absolute_path).map_err(copy_error)?;

    // create_new closes the window between the existence check and the write
    let target = match OpenOptions::new().write(true).create_new(true).open(destination) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(CopyOutcome::Skipped(CopyWarning::new(record, destination_name)));
        }
        Err(e) => return Err(copy_error(e)),
    };

    if let Err(e) = write_contents(source, target) {
        // never leave a partial file at the destination
        if let Err(remove_err) = fs::remove_file(destination) {
            warn!(
                "Could not remove partial copy {}: {}",
                destination.display(),
                remove_err
            );
        }
        return Err(copy_error(e));
    }

    Ok(CopyOutcome::Copied(CopyRecord {
        original_name: record.basename.clone(),
        repeated,
        destination_name,
        source: record.absolute_path.clone(),
        destination: destination.to_path_buf(),
    }))
}

fn write_contents(source: File, target: File) -> io::Result<()> {
    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(target);
    io::copy(&mut reader, &mut writer)?;
    writer.flush()
}

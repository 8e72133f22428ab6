use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::copier::{CopyRecord, REPEATED_DIR_NAME};
use crate::error::Error;
use crate::survey::{SurveyReport, TraceFingerprint};

pub const REPORT_FILE_NAME: &str = "results.csv";

pub const REPORT_COLUMNS: [&str; 6] = [
    "Filename",
    "Min Amplitude",
    "Max Amplitude",
    "File Size",
    "Textual Header Hash",
    "Duplicate",
];

/// One copied file, with its survey numbers when it has any.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub filename: String,
    pub min_amplitude: Option<f64>,
    pub max_amplitude: Option<f64>,
    pub file_size_mb: Option<f64>,
    pub header_hash: Option<String>,
    pub duplicate: bool,
}

impl ReportRow {
    fn to_record(&self) -> [String; 6] {
        [
            self.filename.clone(),
            optional(self.min_amplitude.map(|v| v.to_string())),
            optional(self.max_amplitude.map(|v| v.to_string())),
            optional(self.file_size_mb.map(|v| format!("{:.2}", v))),
            optional(self.header_hash.clone()),
            if self.duplicate { "True" } else { "False" }.to_string(),
        ]
    }
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    pub rows: Vec<ReportRow>,
}

/// Join every copied file with its fingerprint. Only files in the repeated bucket
/// were surveyed, so only those rows look one up, keyed by their name in the bucket.
/// Files without a fingerprint still get a row.
pub fn build_report(copied: &[CopyRecord], survey: Option<&SurveyReport>) -> ReportTable {
    let fingerprints: HashMap<&str, &TraceFingerprint> = survey
        .map(|s| s.fingerprints().map(|f| (f.filename.as_str(), f)).collect())
        .unwrap_or_default();

    let rows = copied
        .iter()
        .map(|record| {
            let fingerprint = if record.repeated {
                fingerprints.get(record.destination_name.as_str()).copied()
            } else {
                None
            };
            ReportRow {
                filename: report_name(record),
                min_amplitude: fingerprint.and_then(|f| f.min_amplitude()),
                max_amplitude: fingerprint.and_then(|f| f.max_amplitude()),
                file_size_mb: fingerprint.map(|f| f.file_size_mb()),
                header_hash: fingerprint.map(|f| f.header_hash.clone()),
                duplicate: record.repeated,
            }
        })
        .collect();

    ReportTable { rows }
}

/// Destination path relative to the destination root, `/`-separated.
fn report_name(record: &CopyRecord) -> String {
    if record.repeated {
        format!("{}/{}", REPEATED_DIR_NAME, record.destination_name)
    } else {
        record.destination_name.clone()
    }
}

/// Where a finished report table is persisted.
pub trait ReportSink {
    fn persist(&self, table: &ReportTable) -> Result<PathBuf, Error>;
}

/// Writes the table as CSV, replacing any previous file.
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(&dir.join(REPORT_FILE_NAME))
    }
}

impl ReportSink for CsvReportSink {
    fn persist(&self, table: &ReportTable) -> Result<PathBuf, Error> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        wtr.write_record(REPORT_COLUMNS)?;
        for row in &table.rows {
            wtr.write_record(row.to_record())?;
        }
        wtr.flush()?;
        debug!("Wrote {} report rows to {}", table.rows.len(), self.path.display());
        Ok(self.path.clone())
    }
}

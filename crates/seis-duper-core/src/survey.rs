use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::progress::ProgressReporter;
use crate::segy::{
    AmplitudeRange, BinaryHeader, Domain, MeasurementSystem, SampleFormat, SegyError, SegyFile,
    TraceHeader,
};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const INSPECT_TRACE_HEADERS: u64 = 5;

/// Amplitude and header summary of one trace file.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFingerprint {
    pub filename: String,
    pub amplitude: Option<AmplitudeRange>,
    pub sample_interval_ms: f64,
    pub header_hash: String,
    pub file_size_bytes: u64,
    pub trace_count: u64,
    pub samples_per_trace: usize,
    pub sample_format: SampleFormat,
    pub measurement_system: MeasurementSystem,
    pub domain: Domain,
    pub record_length_secs: f64,
}

impl TraceFingerprint {
    pub fn file_size_mb(&self) -> f64 {
        self.file_size_bytes as f64 / BYTES_PER_MB
    }

    pub fn min_amplitude(&self) -> Option<f64> {
        self.amplitude.map(|a| a.min)
    }

    pub fn max_amplitude(&self) -> Option<f64> {
        self.amplitude.map(|a| a.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyFailure {
    pub filename: String,
    pub reason: String,
}

pub type SurveyOutcome = Result<TraceFingerprint, SurveyFailure>;

/// One outcome per surveyed file, in the order the files were listed.
#[derive(Debug, Clone, Default)]
pub struct SurveyReport {
    pub outcomes: Vec<SurveyOutcome>,
}

impl SurveyReport {
    pub fn fingerprints(&self) -> impl Iterator<Item = &TraceFingerprint> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SurveyFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn fingerprint_for(&self, filename: &str) -> Option<&TraceFingerprint> {
        self.fingerprints().find(|f| f.filename == filename)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Open `path` as SEG-Y and reduce it to a fingerprint.
pub fn fingerprint_file(path: &Path) -> Result<TraceFingerprint, SegyError> {
    let mut segy = SegyFile::open(path)?;
    let amplitude = segy.amplitude_range()?;
    Ok(fingerprint_of(&segy, amplitude))
}

fn fingerprint_of(segy: &SegyFile, amplitude: Option<AmplitudeRange>) -> TraceFingerprint {
    let binary = segy.binary_header();
    let sample_interval_ms = binary.sample_interval_ms();

    TraceFingerprint {
        filename: file_name_of(segy.path()),
        amplitude,
        sample_interval_ms,
        header_hash: segy.textual_header().fingerprint(),
        file_size_bytes: segy.file_size(),
        trace_count: segy.trace_count(),
        samples_per_trace: segy.samples_per_trace(),
        sample_format: segy.sample_format(),
        measurement_system: binary.measurement_system(),
        domain: binary.domain(),
        record_length_secs: segy.samples_per_trace() as f64 * sample_interval_ms / 1000.0,
    }
}

/// Survey each path independently. A failing file yields an `Err` outcome and the
/// rest of the batch carries on.
pub fn survey_files(paths: &[PathBuf], reporter: &dyn ProgressReporter) -> SurveyReport {
    let outcomes = paths
        .par_iter()
        .map(|path| {
            let filename = file_name_of(path);
            reporter.on_survey_progress(&filename);
            match fingerprint_file(path) {
                Ok(fingerprint) => {
                    debug!(
                        "Surveyed {}: {} traces, hash {}",
                        filename, fingerprint.trace_count, fingerprint.header_hash
                    );
                    Ok(fingerprint)
                }
                Err(e) => {
                    warn!("Failed to read SEG-Y file {}: {}", path.display(), e);
                    Err(SurveyFailure {
                        filename,
                        reason: e.to_string(),
                    })
                }
            }
        })
        .collect();

    SurveyReport { outcomes }
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

pub fn survey_directory(dir: &Path, reporter: &dyn ProgressReporter) -> io::Result<SurveyReport> {
    let files = list_files(dir)?;
    reporter.on_survey_start(files.len());
    Ok(survey_files(&files, reporter))
}

/// Everything the single-file inspector shows.
#[derive(Debug, Clone)]
pub struct SegyInspection {
    pub fingerprint: TraceFingerprint,
    pub textual_lines: Vec<String>,
    pub binary_header: BinaryHeader,
    pub trace_headers: Vec<TraceHeader>,
}

pub fn inspect_file(path: &Path) -> Result<SegyInspection, SegyError> {
    let mut segy = SegyFile::open(path)?;
    let amplitude = segy.amplitude_range()?;

    let shown = segy.trace_count().min(INSPECT_TRACE_HEADERS);
    let trace_headers = (0..shown)
        .map(|i| segy.read_trace_header(i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SegyInspection {
        fingerprint: fingerprint_of(&segy, amplitude),
        textual_lines: segy.textual_header().lines(),
        binary_header: segy.binary_header().clone(),
        trace_headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use tempfile::tempdir;

    #[test]
    fn test_garbage_file_is_a_failure_not_a_panic() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("junk.sgy");
        fs::write(&path, b"definitely not seismic").unwrap();

        let report = survey_files(&[path], &SilentReporter);
        assert_eq!(report.outcomes.len(), 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.filename, "junk.sgy");
        assert!(failure.reason.contains("too short"));
    }

    #[test]
    fn test_list_files_skips_directories() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("b.sgy"), b"").unwrap();
        fs::write(tmp.path().join("a.sgy"), b"").unwrap();
        fs::create_dir(tmp.path().join("c.sgy")).unwrap();

        let files = list_files(tmp.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, vec!["a.sgy", "b.sgy"]);
    }
}

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::copier::{self, CopyEngine, CopyReport};
use crate::error::Error;
use crate::logs::{self, LogPaths};
use crate::progress::ProgressReporter;
use crate::report::{self, CsvReportSink, ReportSink, ReportTable};
use crate::scanner::{self, FileIndex};
use crate::survey::{self, SurveyReport};

pub struct Pipeline {
    config: RunConfig,
}

/// Everything one run produced. Presentation layers read this and nothing else.
#[derive(Debug)]
pub struct RunResult {
    pub total_files: usize,
    pub repeated_names: usize,
    pub copy: CopyReport,
    pub logs: LogPaths,
    pub survey: Option<SurveyReport>,
    pub report: ReportTable,
    pub report_path: PathBuf,
    pub index_duration: Duration,
    pub copy_duration: Duration,
    pub survey_duration: Duration,
}

impl RunResult {
    pub fn warning_count(&self) -> usize {
        self.copy.warnings.len()
    }

    pub fn survey_failure_count(&self) -> usize {
        self.survey.as_ref().map_or(0, |s| s.failures().count())
    }
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Walk the source tree once. Read-only.
    pub fn index(&self) -> Result<FileIndex, Error> {
        scanner::build_file_index(
            &self.config.source_root,
            &self.config.extension,
            &self.config.ignore_patterns,
            Some(&self.config.destination_root),
        )
    }

    /// Run the full pipeline:
    /// 1. Index the source tree (single walk, cached)
    /// 2. Copy into the destination, renaming repeated basenames
    /// 3. Write copy and warning logs
    /// 4. Survey the repeated bucket when the files are trace files
    /// 5. Join and persist the report table
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunResult, Error> {
        let sink = CsvReportSink::in_dir(&self.config.destination_root);
        self.run_with_sink(reporter, &sink)
    }

    pub fn run_with_sink(
        &self,
        reporter: &dyn ProgressReporter,
        sink: &dyn ReportSink,
    ) -> Result<RunResult, Error> {
        // Phase 1: Index
        info!(
            "Indexing {} for '{}' files...",
            self.config.source_root.display(),
            self.config.extension
        );
        reporter.on_index_start();
        let index_start = Instant::now();
        let index = self.index()?;
        let index_duration = index_start.elapsed();
        let repeated_names = index.repeated_groups().len();
        info!(
            "{} files with extension {}",
            index.total(),
            self.config.extension
        );
        reporter.on_index_complete(index.total(), repeated_names, index_duration.as_secs_f64());
        debug!(
            "Index completed in {:.2}s, {} repeated names",
            index_duration.as_secs_f64(),
            repeated_names,
        );

        // Phase 2: Copy
        let copy_start = Instant::now();
        let copy = CopyEngine::new(&index, &self.config.destination_root).run(reporter)?;
        let copy_duration = copy_start.elapsed();
        reporter.on_copy_complete(
            copy.copied.len(),
            copy.warnings.len(),
            copy_duration.as_secs_f64(),
        );
        debug!(
            "Copy completed in {:.2}s, {} copied, {} warnings",
            copy_duration.as_secs_f64(),
            copy.copied.len(),
            copy.warnings.len(),
        );

        // Phase 3: Logs
        let logs = logs::write_logs(&self.config.destination_root, &copy)?;
        info!("Log file created at {}", logs.copy_log.display());
        if let Some(warning_log) = &logs.warning_log {
            info!("Warning log file created at {}", warning_log.display());
        }

        // Phase 4: Survey
        let survey_start = Instant::now();
        let survey = if self.config.targets_trace_files() {
            let repeated_dir = copier::prepare_destination(&self.config.destination_root)?;
            info!("Surveying SEG-Y files in {}...", repeated_dir.display());
            let survey = survey::survey_directory(&repeated_dir, reporter)?;
            Some(survey)
        } else {
            info!(
                "Skipping trace survey, '{}' is not a trace file extension",
                self.config.extension
            );
            None
        };
        let survey_duration = survey_start.elapsed();
        if let Some(survey) = &survey {
            let failed = survey.failures().count();
            reporter.on_survey_complete(
                survey.outcomes.len() - failed,
                failed,
                survey_duration.as_secs_f64(),
            );
        }

        // Phase 5: Report
        let report = report::build_report(&copy.copied, survey.as_ref());
        let report_path = sink.persist(&report)?;
        info!("Results written to {}", report_path.display());

        Ok(RunResult {
            total_files: index.total(),
            repeated_names,
            copy,
            logs,
            survey,
            report,
            report_path,
            index_duration,
            copy_duration,
            survey_duration,
        })
    }
}

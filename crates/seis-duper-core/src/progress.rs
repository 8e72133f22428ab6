/// Trait for reporting pipeline progress.
///
/// CLI implements with indicatif bars. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_index_start(&self) {}
    fn on_index_complete(&self, _total_files: usize, _repeated_names: usize, _duration_secs: f64) {}
    fn on_copy_start(&self, _total_files: usize) {}
    fn on_copy_progress(&self, _attempt: usize, _total_files: usize, _file_name: &str) {}
    fn on_copy_complete(&self, _copied: usize, _warnings: usize, _duration_secs: f64) {}
    fn on_survey_start(&self, _total_files: usize) {}
    fn on_survey_progress(&self, _file_name: &str) {}
    fn on_survey_complete(&self, _surveyed: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

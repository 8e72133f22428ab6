use indicatif::{ProgressBar, ProgressStyle};
use seis_duper_core::ProgressReporter;
use std::sync::Mutex;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Index phase: spinner (total unknown until the walk ends)
/// - Copy phase: progress bar over the indexed files
/// - Survey phase: progress bar over the repeated bucket
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }

    fn bar(total: usize, label: &str) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        let template = format!(
            "  {{spinner:.cyan}} {} [{{bar:30.cyan/dim}}] {{pos}}/{{len}} {{msg}}",
            label
        );
        if let Ok(style) = ProgressStyle::with_template(&template) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_index_start(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message("Indexing files...");
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_index_complete(&self, total_files: usize, repeated_names: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Index complete: {} files, {} repeated names in {:.2}s",
            total_files, repeated_names, duration_secs
        );
    }

    fn on_copy_start(&self, total_files: usize) {
        self.set_bar(Self::bar(total_files, "Copying"));
    }

    fn on_copy_progress(&self, attempt: usize, _total_files: usize, file_name: &str) {
        self.with_bar(|pb| {
            pb.set_position(attempt as u64);
            pb.set_message(file_name.to_string());
        });
    }

    fn on_copy_complete(&self, copied: usize, warnings: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Copy complete: {} copied, {} skipped in {:.2}s",
            copied, warnings, duration_secs
        );
    }

    fn on_survey_start(&self, total_files: usize) {
        self.set_bar(Self::bar(total_files, "Surveying"));
    }

    fn on_survey_progress(&self, file_name: &str) {
        self.with_bar(|pb| {
            pb.inc(1);
            pb.set_message(file_name.to_string());
        });
    }

    fn on_survey_complete(&self, surveyed: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Survey complete: {} files read, {} failed in {:.2}s",
            surveyed, failed, duration_secs
        );
    }
}

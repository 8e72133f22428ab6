mod commands;
mod logging;
mod progress;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, IndexArgs, RunArgs};
use dotenv::dotenv;
use progress::CliReporter;
use seis_duper_core::survey::{self, SegyInspection};
use seis_duper_core::{AppConfig, Pipeline, RunConfig, RunResult, SilentReporter};
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match seis_duper_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Run(run_args)) => run_pipeline(&config, &run_args),
        Some(Commands::Index(index_args)) => run_index(&config, &index_args),
        Some(Commands::Survey { dir }) => run_survey(&dir),
        Some(Commands::Inspect { file }) => run_inspect(&file),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_pipeline(config: &AppConfig, args: &RunArgs) -> anyhow::Result<()> {
    let run_config = RunConfig::from_app_config(
        config,
        args.source.as_deref(),
        args.extension.as_deref(),
        args.destination.as_deref(),
    )?;

    let pipeline = Pipeline::new(run_config);
    let reporter = CliReporter::new();
    let result = pipeline.run(&reporter).context("run aborted")?;

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &RunResult) {
    println!();
    info!(
        "Index: {}, Copy: {}, Survey: {}",
        format!("{:.2}s", result.index_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.copy_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.survey_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files found, {} copied, {} repeated names",
        format!("{}", result.total_files).cyan(),
        format!("{}", result.copy.copied.len()).green(),
        format!("{}", result.repeated_names).cyan(),
    );
    info!("Log file created at {}", result.logs.copy_log.display());

    if result.warning_count() > 0 {
        warn!(
            "{} files skipped because their destination already existed",
            format!("{}", result.warning_count()).red(),
        );
        if let Some(path) = &result.logs.warning_log {
            warn!("Warning log file created at {}", path.display());
        }
    }

    if let Some(survey) = &result.survey {
        for failure in survey.failures() {
            warn!("Could not survey {}: {}", failure.filename, failure.reason);
        }
        info!(
            "{} SEG-Y files surveyed, {} failed",
            format!("{}", survey.fingerprints().count()).green(),
            format!("{}", result.survey_failure_count()).red(),
        );
    }
    info!("Results written to {}", result.report_path.display());
}

fn run_index(config: &AppConfig, args: &IndexArgs) -> anyhow::Result<()> {
    let source = args
        .source
        .as_deref()
        .or(config.source_path.as_deref())
        .context("no source path given")?;
    let extension = args
        .extension
        .as_deref()
        .or(config.extension.as_deref())
        .context("no file extension given")?;
    let source = seis_duper_core::config::clean_path(source);
    seis_duper_core::config::validate_extension(extension)?;

    let index = seis_duper_core::scanner::build_file_index(
        Path::new(source),
        extension,
        &config.ignore_patterns,
        None,
    )?;

    println!(
        "{} files with extension {}",
        format!("{}", index.total()).cyan(),
        extension
    );
    let groups = index.repeated_groups();
    if groups.is_empty() {
        println!("No repeated file names");
    }
    for (name, dirs) in groups {
        println!("{} ({} copies)", name.yellow(), dirs.len());
        for dir in dirs {
            println!("    {}", dir.display());
        }
    }
    Ok(())
}

fn run_survey(dir: &Path) -> anyhow::Result<()> {
    let report = survey::survey_directory(dir, &SilentReporter)
        .with_context(|| format!("reading {}", dir.display()))?;

    for outcome in &report.outcomes {
        match outcome {
            Ok(f) => {
                let (min, max) = match f.amplitude {
                    Some(range) => (format!("{:.2}", range.min), format!("{:.2}", range.max)),
                    None => ("-".to_string(), "-".to_string()),
                };
                println!(
                    "{}  min {}  max {}  {:.2} MB  {} ms  {}  {}",
                    f.filename.cyan(),
                    min,
                    max,
                    f.file_size_mb(),
                    f.sample_interval_ms,
                    f.domain,
                    f.header_hash,
                );
            }
            Err(failure) => {
                println!("{}  {}", failure.filename.red(), failure.reason);
            }
        }
    }
    Ok(())
}

fn run_inspect(file: &Path) -> anyhow::Result<()> {
    let inspection = survey::inspect_file(file)
        .with_context(|| format!("failed to read SEG-Y file {}", file.display()))?;
    print_inspection(file, &inspection);
    Ok(())
}

fn print_inspection(file: &Path, inspection: &SegyInspection) {
    let f = &inspection.fingerprint;
    let (min, max) = match f.amplitude {
        Some(range) => (format!("{:.2}", range.min), format!("{:.2}", range.max)),
        None => ("-".to_string(), "-".to_string()),
    };

    println!("{:<22}{}", "Filename", file.display());
    println!("{:<22}{}", "Min Amplitude", min);
    println!("{:<22}{}", "Max Amplitude", max);
    println!("{:<22}{}", "Textual Header Hash", f.header_hash);
    println!("{:<22}{:.1} ms", "Sample Interval", f.sample_interval_ms);
    println!("{:<22}{:.2} sec", "Record Length", f.record_length_secs);
    println!("{:<22}{}", "Domain", f.domain);
    println!("{:<22}{}", "Coordinate Unit", f.measurement_system);
    println!("{:<22}{}", "Traces", f.trace_count);
    println!("{:<22}{}", "Samples per Trace", f.samples_per_trace);
    println!("{:<22}{}", "Sample Format", f.sample_format);
    println!("{:<22}{:.2} MB", "File Size", f.file_size_mb());

    println!();
    println!("{}", "Textual Header:".bold());
    for line in &inspection.textual_lines {
        println!("{}", line);
    }

    let bin = &inspection.binary_header;
    println!();
    println!("{}", "Binary Header:".bold());
    println!("  job_id: {}", bin.job_id);
    println!("  line_number: {}", bin.line_number);
    println!("  reel_number: {}", bin.reel_number);
    println!("  traces_per_ensemble: {}", bin.traces_per_ensemble);
    println!("  sample_interval_us: {}", bin.sample_interval_us);
    println!("  samples_per_trace: {}", bin.samples_per_trace);
    println!("  format_code: {}", bin.format_code);
    println!("  ensemble_fold: {}", bin.ensemble_fold);
    println!("  trace_sorting: {}", bin.trace_sorting);
    println!("  measurement_system: {}", bin.measurement_system_code);
    println!("  revision: {:#06x}", bin.revision);
    println!("  fixed_length_traces: {}", bin.fixed_length_traces);
    println!("  extended_headers: {}", bin.extended_header_count);

    println!();
    println!(
        "{}",
        format!(
            "Trace Header (First {} Traces of {}):",
            inspection.trace_headers.len(),
            f.trace_count
        )
        .bold()
    );
    for (i, th) in inspection.trace_headers.iter().enumerate() {
        println!("Trace {}:", i + 1);
        println!("  trace_sequence_line: {}", th.trace_sequence_line);
        println!("  trace_sequence_file: {}", th.trace_sequence_file);
        println!("  field_record: {}", th.field_record);
        println!("  trace_number: {}", th.trace_number);
        println!("  cdp: {}", th.cdp);
        println!("  source_xy: {:.2}, {:.2}", th.scaled(th.source_x), th.scaled(th.source_y));
        println!("  cdp_xy: {:.2}, {:.2}", th.scaled(th.cdp_x), th.scaled(th.cdp_y));
        println!("  inline/crossline: {}/{}", th.inline, th.crossline);
        println!("  samples: {} @ {} us", th.samples, th.sample_interval_us);
    }
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "seis-duper")]
#[command(about = "Collect files into one place, renaming name collisions and fingerprinting SEG-Y duplicates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Copy matching files, write logs, survey repeated SEG-Y files and write results.csv
    Run(RunArgs),
    /// Show matching files and name collisions without copying anything
    Index(IndexArgs),
    /// Survey every file in a directory as SEG-Y
    Survey {
        /// Directory holding the trace files
        dir: PathBuf,
    },
    /// Print headers and amplitude range of one SEG-Y file
    Inspect {
        /// SEG-Y file to read
        file: PathBuf,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Source folder to search recursively
    #[arg(short, long)]
    pub source: Option<String>,
    /// File extension including the dot, e.g. .sgy
    #[arg(short, long)]
    pub extension: Option<String>,
    /// Destination folder, created if missing
    #[arg(short, long)]
    pub destination: Option<String>,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Source folder to search recursively
    #[arg(short, long)]
    pub source: Option<String>,
    /// File extension including the dot, e.g. .sgy
    #[arg(short, long)]
    pub extension: Option<String>,
}

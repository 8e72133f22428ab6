pub mod config;
pub mod copier;
pub mod engine;
pub mod error;
pub mod logs;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod segy;
pub mod survey;

pub use config::{AppConfig, RunConfig};
pub use engine::{Pipeline, RunResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};

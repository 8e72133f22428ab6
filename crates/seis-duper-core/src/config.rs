use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Settings as read from `Config.toml` and `SEIS_DUPER_*` environment variables.
///
/// Every path is optional here so the CLI can fill the gaps from its flags.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source_path: Option<String>,
    pub extension: Option<String>,
    pub destination_path: Option<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_trace_extensions")]
    pub trace_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            extension: None,
            destination_path: None,
            ignore_patterns: Vec::new(),
            trace_extensions: default_trace_extensions(),
        }
    }
}

fn default_trace_extensions() -> Vec<String> {
    vec![".sgy".to_string(), ".segy".to_string()]
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("SEIS_DUPER")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns")
                .with_list_parse_key("trace_extensions"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Validated parameters for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_root: PathBuf,
    pub extension: String,
    pub destination_root: PathBuf,
    pub ignore_patterns: Vec<String>,
    pub trace_extensions: Vec<String>,
}

impl RunConfig {
    /// Check the inputs without touching the filesystem beyond metadata reads.
    pub fn new(
        source: &str,
        extension: &str,
        destination: &str,
    ) -> Result<RunConfig, Error> {
        let source_root = PathBuf::from(clean_path(source));
        if source_root.as_os_str().is_empty() {
            return Err(Error::InvalidInput("source path is empty".to_string()));
        }
        if !source_root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "source path {} is not an existing directory",
                source_root.display()
            )));
        }

        let extension = extension.trim().to_string();
        validate_extension(&extension)?;

        let destination_root = PathBuf::from(clean_path(destination));
        if destination_root.as_os_str().is_empty() {
            return Err(Error::InvalidInput("destination path is empty".to_string()));
        }
        if destination_root.exists() && !destination_root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "destination path {} exists and is not a directory",
                destination_root.display()
            )));
        }
        if same_location(&source_root, &destination_root) {
            return Err(Error::InvalidInput(
                "source and destination must be different directories".to_string(),
            ));
        }

        Ok(RunConfig {
            source_root,
            extension,
            destination_root,
            ignore_patterns: Vec::new(),
            trace_extensions: default_trace_extensions(),
        })
    }

    /// Build from loaded settings; `None` arguments fall back to the file/env values.
    pub fn from_app_config(
        config: &AppConfig,
        source: Option<&str>,
        extension: Option<&str>,
        destination: Option<&str>,
    ) -> Result<RunConfig, Error> {
        let source = source
            .or(config.source_path.as_deref())
            .ok_or_else(|| Error::InvalidInput("no source path given".to_string()))?;
        let extension = extension
            .or(config.extension.as_deref())
            .ok_or_else(|| Error::InvalidInput("no file extension given".to_string()))?;
        let destination = destination
            .or(config.destination_path.as_deref())
            .ok_or_else(|| Error::InvalidInput("no destination path given".to_string()))?;

        Ok(RunConfig::new(source, extension, destination)?
            .with_ignore_patterns(config.ignore_patterns.clone())
            .with_trace_extensions(config.trace_extensions.clone()))
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_trace_extensions(mut self, extensions: Vec<String>) -> Self {
        self.trace_extensions = extensions;
        self
    }

    /// Whether the target extension names a trace container worth surveying.
    pub fn targets_trace_files(&self) -> bool {
        self.trace_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Strip whitespace and surrounding double quotes, as pasted from a file manager.
pub fn clean_path(path: &str) -> &str {
    path.trim().trim_matches('"')
}

pub fn validate_extension(extension: &str) -> Result<(), Error> {
    if !extension.starts_with('.') || extension.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "file extension '{}' must start with '.' followed by at least one character",
            extension
        )));
    }
    if extension.contains('/') || extension.contains('\\') {
        return Err(Error::InvalidInput(format!(
            "file extension '{}' must not contain path separators",
            extension
        )));
    }
    Ok(())
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

mod walk;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use walk::build_file_index;

/// A matching file found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    /// Full file name, the duplicate key.
    pub basename: String,
    /// File name up to the last dot.
    pub stem: String,
    /// Last dot and what follows it, or empty.
    pub extension: String,
    pub containing_directory: PathBuf,
}

impl FileRecord {
    pub fn new(absolute_path: PathBuf) -> Self {
        let basename = absolute_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, extension) = split_extension(&basename);
        let containing_directory = absolute_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        FileRecord {
            stem: stem.to_string(),
            extension: extension.to_string(),
            basename,
            absolute_path,
            containing_directory,
        }
    }
}

/// Split at the last dot, keeping the dot with the extension. Leading dots
/// belong to the stem, so `.sgy` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(pos) => name.split_at(leading_dots + pos),
        None => (name, ""),
    }
}

/// Result of one walk: ordered records plus basename → directories grouping.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    records: Vec<FileRecord>,
    groups: HashMap<String, Vec<PathBuf>>,
}

impl FileIndex {
    pub fn new(records: Vec<FileRecord>, groups: HashMap<String, Vec<PathBuf>>) -> Self {
        Self { records, groups }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn group_size(&self, basename: &str) -> usize {
        self.groups.get(basename).map_or(0, Vec::len)
    }

    pub fn is_repeated(&self, basename: &str) -> bool {
        self.group_size(basename) > 1
    }

    pub fn directories_for(&self, basename: &str) -> Option<&[PathBuf]> {
        self.groups.get(basename).map(Vec::as_slice)
    }

    /// Repeated basenames with their directories, sorted by name.
    pub fn repeated_groups(&self) -> Vec<(&str, &[PathBuf])> {
        let mut groups: Vec<(&str, &[PathBuf])> = self
            .groups
            .iter()
            .filter(|(_, dirs)| dirs.len() > 1)
            .map(|(name, dirs)| (name.as_str(), dirs.as_slice()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.sgy"), ("report", ".sgy"));
        assert_eq!(split_extension("line.2024.segy"), ("line.2024", ".segy"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".sgy"), (".sgy", ""));
        assert_eq!(split_extension("..hidden.sgy"), ("..hidden", ".sgy"));
    }

    #[test]
    fn test_file_record_fields() {
        let record = FileRecord::new(PathBuf::from("/data/A/report.sgy"));
        assert_eq!(record.basename, "report.sgy");
        assert_eq!(record.stem, "report");
        assert_eq!(record.extension, ".sgy");
        assert_eq!(record.containing_directory, PathBuf::from("/data/A"));
    }
}

use glob::Pattern;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use walkdir::{DirEntry, WalkDir};

use super::{FileIndex, FileRecord};
use crate::error::Error;

/// Walk `root` once and index every regular file whose name ends with `extension`.
///
/// Entries are visited sorted by file name so the order is stable across platforms,
/// and the copy pass reuses this list instead of walking again. `exclude` (usually the
/// destination root) is pruned from the walk along with anything matching `ignore_globs`.
pub fn build_file_index(
    root: &Path,
    extension: &str,
    ignore_globs: &[String],
    exclude: Option<&Path>,
) -> Result<FileIndex, Error> {
    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let exclude = exclude.and_then(|p| p.canonicalize().ok());

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if ignore_patterns
                .iter()
                .any(|pattern| pattern.matches_path(entry.path()))
            {
                return false;
            }
            match (&exclude, entry.file_type().is_dir()) {
                (Some(excluded), true) => entry
                    .path()
                    .canonicalize()
                    .map(|p| &p != excluded)
                    .unwrap_or(true),
                _ => true,
            }
        });

    let mut records: Vec<FileRecord> = Vec::new();
    let mut groups: HashMap<String, Vec<PathBuf>> = HashMap::new();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                if err.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied) {
                    error!("Access denied reading {}: {}", path.display(), err);
                    continue;
                }
                return Err(Error::Walk { path, source: err });
            }
        };

        if !is_regular_file(&entry) {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 file name {}", entry.path().display());
            continue;
        };
        if !file_name.ends_with(extension) {
            continue;
        }

        let record = FileRecord::new(entry.path().to_path_buf());
        groups
            .entry(record.basename.clone())
            .or_default()
            .push(record.containing_directory.clone());
        records.push(record);
    }

    Ok(FileIndex::new(records, groups))
}

/// Regular files, and symlinks whose target is a regular file. Linked
/// directories are not descended into.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if !file_type.is_symlink() {
        return false;
    }
    match entry.path().metadata() {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            warn!("Skipping broken link {}: {}", entry.path().display(), e);
            false
        }
    }
}

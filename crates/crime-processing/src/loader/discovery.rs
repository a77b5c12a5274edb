//! Dataset directory discovery.

use crate::config::FileOrder;
use crate::error::{CrimeDataError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// True when `path` ends in `extension`, compared ASCII case-insensitively.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// List the regular files in `dir` whose extension matches.
///
/// Subdirectories and files with other extensions are skipped. With
/// [`FileOrder::Listing`] the order is whatever the filesystem yields.
pub(crate) fn discover_files(
    dir: &Path,
    extension: &str,
    order: FileOrder,
) -> Result<Vec<PathBuf>> {
    let access_error = |source| CrimeDataError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(access_error)? {
        let path = entry.map_err(access_error)?.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        } else {
            debug!("Ignoring {}", path.display());
        }
    }

    if order == FileOrder::Name {
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("2023-01-street.csv"), "csv"));
        assert!(has_extension(Path::new("UPPER.CSV"), "csv"));
        assert!(!has_extension(Path::new("notes.txt"), "csv"));
        assert!(!has_extension(Path::new("csv"), "csv"));
        assert!(!has_extension(Path::new("archive.csv.zip"), "csv"));
    }

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.csv")).unwrap();
        File::create(dir.path().join("a.csv")).unwrap();
        File::create(dir.path().join("readme.md")).unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = discover_files(dir.path(), "csv", FileOrder::Name).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_discover_files_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = discover_files(&missing, "csv", FileOrder::Listing).unwrap_err();
        assert_eq!(err.error_code(), "DIRECTORY_ACCESS");
    }
}

//! File system helpers for results directories

use crate::error::{Error, Result};
use crate::io::FilePatterns;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// List files directly inside `dir` whose name matches `pattern`, sorted by name.
pub fn list_matching_files(dir: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::ResultsDirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if pattern.is_match(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// List `*-testsuite.xml` files in a results directory
pub fn list_test_suite_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_matching_files(dir, &FilePatterns::standard().test_suite)
}

/// List `*-attachment*` files in a results directory
pub fn list_attachment_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_matching_files(dir, &FilePatterns::standard().attachment)
}

/// Recursively delete a directory and everything below it.
///
/// Files are removed first, then each directory once its contents are
/// gone. The first failure aborts the walk and is returned.
pub fn delete_not_empty_directory(path: &Path) -> Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            delete_not_empty_directory(&entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    fs::remove_dir(path)?;
    Ok(())
}

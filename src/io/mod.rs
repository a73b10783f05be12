//! Readers for the artifacts found in results directories
//!
//! Each reader scans every configured results directory (non-recursively)
//! and returns everything it could parse. Files that fail to parse are
//! logged and skipped so that one corrupt file does not hide the rest of a
//! run. Directories that do not exist are skipped with a warning.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod attachment;
pub mod case;
pub mod environment;
pub mod files;
pub mod suite;

pub use attachment::AttachmentReader;
pub use case::TestCaseReader;
pub use environment::EnvironmentReader;
pub use files::{
    delete_not_empty_directory, list_attachment_files, list_matching_files, list_test_suite_files,
};
pub use suite::TestSuiteReader;

/// Default pattern of suite result file names
pub const TEST_SUITE_FILE_PATTERN: &str = r".+-testsuite\.xml";

/// Default pattern of attachment file names
pub const ATTACHMENT_FILE_PATTERN: &str = r".+-attachment(\..+)?";

/// Reads all items of one kind from the results directories.
pub trait Reader<T> {
    fn read(&self) -> Result<Vec<T>>;
}

/// The input directories a report is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDirectories(Vec<PathBuf>);

impl ResultDirectories {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ResultDirectories(dirs.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    /// Directories that exist on disk; missing ones are logged.
    pub fn existing(&self) -> Vec<&Path> {
        self.iter()
            .filter(|dir| {
                let is_dir = dir.is_dir();
                if !is_dir {
                    warn!(directory = %dir.display(), "results directory not found, skipping");
                }
                is_dir
            })
            .collect()
    }
}

/// File name patterns used to recognise result artifacts.
#[derive(Debug, Clone)]
pub struct FilePatterns {
    pub test_suite: Regex,
    pub attachment: Regex,
}

impl FilePatterns {
    /// Compile custom patterns. Patterns must match the whole file name.
    pub fn new(test_suite: &str, attachment: &str) -> Result<Self> {
        Ok(FilePatterns {
            test_suite: compile_anchored(test_suite)?,
            attachment: compile_anchored(attachment)?,
        })
    }

    /// The standard Allure file name patterns.
    pub fn standard() -> Self {
        FilePatterns::new(TEST_SUITE_FILE_PATTERN, ATTACHMENT_FILE_PATTERN)
            .expect("built-in file patterns are valid")
    }
}

impl Default for FilePatterns {
    fn default() -> Self {
        FilePatterns::standard()
    }
}

fn compile_anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| Error::Config(format!("Invalid file pattern '{}': {}", pattern, e)))
}

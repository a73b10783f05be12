//! Reader for `*-testsuite.xml` files

use crate::error::Result;
use crate::io::files::list_matching_files;
use crate::io::{FilePatterns, Reader, ResultDirectories};
use crate::model::TestSuiteResult;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub struct TestSuiteReader {
    directories: ResultDirectories,
    patterns: FilePatterns,
}

impl TestSuiteReader {
    pub fn new(directories: ResultDirectories, patterns: FilePatterns) -> Self {
        TestSuiteReader {
            directories,
            patterns,
        }
    }

    /// Parse a single suite file
    pub fn read_file(path: &Path) -> Result<TestSuiteResult> {
        let contents = fs::read_to_string(path)?;
        TestSuiteResult::from_xml(&contents)
    }
}

impl Reader<TestSuiteResult> for TestSuiteReader {
    fn read(&self) -> Result<Vec<TestSuiteResult>> {
        let mut suites = Vec::new();

        for dir in self.directories.existing() {
            for path in list_matching_files(dir, &self.patterns.test_suite)? {
                match Self::read_file(&path) {
                    Ok(suite) => {
                        debug!(file = %path.display(), cases = suite.test_cases.len(), "read test suite");
                        suites.push(suite);
                    }
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "skipping unreadable test suite file");
                    }
                }
            }
        }

        Ok(suites)
    }
}

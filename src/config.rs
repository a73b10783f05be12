//! Configuration file (.allure.conf) parsing and handling
//!
//! The .allure.conf file uses INI format with a [DEFAULT] section naming the
//! results directories to read, where to write the report and which plugins
//! to run.

use crate::converters::LinkPatterns;
use crate::error::{Error, Result};
use crate::io::{ATTACHMENT_FILE_PATTERN, TEST_SUITE_FILE_PATTERN};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".allure.conf";

/// Default report output directory
pub const DEFAULT_REPORT_DIRECTORY: &str = "allure-report";

/// Configuration loaded from .allure.conf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Directories holding `*-testsuite.xml` files and attachments
    pub results_directories: Vec<PathBuf>,

    /// Where the report data is written
    pub report_directory: PathBuf,

    /// Plugins to run; all registered plugins when unset
    pub plugins: Option<Vec<String>>,

    /// URL patterns for issue and test management links
    pub links: LinkPatterns,

    /// Regex matching suite result file names
    pub test_suite_file_pattern: String,

    /// Regex matching attachment file names
    pub attachment_file_pattern: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            results_directories: Vec::new(),
            report_directory: PathBuf::from(DEFAULT_REPORT_DIRECTORY),
            plugins: None,
            links: LinkPatterns::default(),
            test_suite_file_pattern: TEST_SUITE_FILE_PATTERN.to_string(),
            attachment_file_pattern: ATTACHMENT_FILE_PATTERN.to_string(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a .allure.conf file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", CONFIG_FILE, e)))?;

        Self::parse(&contents)
    }

    /// Load `.allure.conf` from a directory if present, defaults otherwise
    pub fn load_from_directory(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(ReportConfig::default())
        }
    }

    /// Parse configuration from a string
    pub fn parse(contents: &str) -> Result<Self> {
        let ini: HashMap<String, HashMap<String, String>> = serde_ini::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;

        let default = ini
            .get("DEFAULT")
            .ok_or_else(|| Error::Config(format!("No [DEFAULT] section in {}", CONFIG_FILE)))?;

        let results_directories: Vec<PathBuf> = default
            .get("results_directories")
            .map(|v| split_list(v).map(PathBuf::from).collect())
            .unwrap_or_default();

        if results_directories.is_empty() {
            return Err(Error::Config(format!(
                "No results_directories option in {}",
                CONFIG_FILE
            )));
        }

        let non_empty = |key: &str| {
            default
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = ReportConfig {
            results_directories,
            report_directory: non_empty("report_directory")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIRECTORY)),
            plugins: default
                .get("plugins")
                .map(|v| split_list(v).map(str::to_string).collect()),
            links: LinkPatterns {
                issue_tracker: non_empty("issue_tracker_pattern"),
                test_management: non_empty("tms_pattern"),
            },
            test_suite_file_pattern: non_empty("test_suite_file_pattern")
                .unwrap_or_else(|| TEST_SUITE_FILE_PATTERN.to_string()),
            attachment_file_pattern: non_empty("attachment_file_pattern")
                .unwrap_or_else(|| ATTACHMENT_FILE_PATTERN.to_string()),
        };

        for pattern in [&config.links.issue_tracker, &config.links.test_management]
            .into_iter()
            .flatten()
        {
            if !pattern.contains(crate::converters::LINK_PLACEHOLDER) {
                return Err(Error::Config(format!(
                    "Link pattern '{}' does not contain {}",
                    pattern,
                    crate::converters::LINK_PLACEHOLDER
                )));
            }
        }

        Ok(config)
    }

    /// Override the results directories when any are given
    pub fn with_results_directories(mut self, dirs: Vec<PathBuf>) -> Self {
        if !dirs.is_empty() {
            self.results_directories = dirs;
        }
        self
    }
}

/// Split a comma and/or whitespace separated list
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

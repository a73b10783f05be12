//! Report data generation
//!
//! Reads everything from the results directories, converts test cases,
//! runs them through the plugins and writes the report data directory:
//!
//! - `data/<uid>-testcase.json`: one file per test case
//! - `data/<plugin file>`: data produced by each plugin
//! - `data/environment.json`: all environments that were found
//! - `data/<attachment>`: copies of every attachment file
//!
//! Every name is written once. A plugin file clashing with another data
//! file is an error; a second attachment with an already used name is
//! skipped with a warning.

use crate::error::{Error, Result};
use crate::module::AllureModule;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod model;

pub use model::AllureTestCase;

/// Sub-directory of the report directory holding the data files
pub const DATA_DIRECTORY: &str = "data";

pub const ENVIRONMENT_FILE: &str = "environment.json";

/// What a report build produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub test_cases: usize,
    pub failed: usize,
    pub attachments: usize,
    pub plugin_files: Vec<String>,
    pub data_directory: PathBuf,
}

pub struct ReportGenerator<'a> {
    module: &'a AllureModule,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(module: &'a AllureModule) -> Self {
        ReportGenerator { module }
    }

    /// Build the report data into `output_dir`
    pub fn generate(&self, output_dir: &Path) -> Result<ReportSummary> {
        let data_dir = output_dir.join(DATA_DIRECTORY);
        fs::create_dir_all(&data_dir)?;

        let converter = self.module.test_case_converter();
        let mut plugins = self.module.plugin_manager();

        let mut summary = ReportSummary {
            data_directory: data_dir.clone(),
            ..Default::default()
        };
        let mut written: HashSet<String> = HashSet::from([ENVIRONMENT_FILE.to_string()]);

        for result in self.module.test_case_reader().read()? {
            let mut test_case = converter.convert(&result)?;
            plugins.prepare(&mut test_case);
            plugins.process(&test_case);

            let file_name = test_case.file_name();
            write_json(&data_dir.join(&file_name), &test_case)?;
            written.insert(file_name);
            summary.test_cases += 1;
            if test_case.status.is_failure() {
                summary.failed += 1;
            }
        }

        for data in plugins.data() {
            if !written.insert(data.name.clone()) {
                return Err(Error::Plugin(format!(
                    "Data file {} is already written by the report",
                    data.name
                )));
            }
            write_json(&data_dir.join(&data.name), &data.data)?;
            summary.plugin_files.push(data.name);
        }

        let environments = self.module.environment_reader().read()?;
        write_json(&data_dir.join(ENVIRONMENT_FILE), &environments)?;

        for attachment in self.module.attachment_reader().read()? {
            if !written.insert(attachment.name.clone()) {
                warn!(
                    file = %attachment.path.display(),
                    "attachment name already used in report data, skipping"
                );
                continue;
            }
            fs::copy(&attachment.path, data_dir.join(&attachment.name))?;
            summary.attachments += 1;
        }

        info!(
            test_cases = summary.test_cases,
            attachments = summary.attachments,
            directory = %data_dir.display(),
            "report data generated"
        );
        Ok(summary)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(file = %path.display(), "wrote report data file");
    Ok(())
}

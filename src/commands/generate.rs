//! Generate report data from results directories

use crate::commands::utils::{build_module, load_config};
use crate::commands::Command;
use crate::error::Result;
use crate::report::ReportGenerator;
use crate::ui::UI;
use std::path::PathBuf;

pub struct GenerateCommand {
    base_path: Option<String>,
    results: Vec<String>,
    output: Option<String>,
}

impl GenerateCommand {
    pub fn new(base_path: Option<String>, results: Vec<String>) -> Self {
        GenerateCommand {
            base_path,
            results,
            output: None,
        }
    }

    /// Write the report into `output` instead of the configured directory
    pub fn with_output(base_path: Option<String>, results: Vec<String>, output: String) -> Self {
        GenerateCommand {
            base_path,
            results,
            output: Some(output),
        }
    }
}

impl Command for GenerateCommand {
    fn execute(&self, ui: &mut dyn UI) -> Result<i32> {
        let config = load_config(self.base_path.as_deref(), &self.results)?;
        let module = build_module(&config)?;

        for dir in module.result_directories().iter() {
            if !dir.is_dir() {
                ui.warning(&format!("Results directory {} not found", dir.display()))?;
            }
        }

        let output = self
            .output
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| config.report_directory.clone());

        let summary = ReportGenerator::new(&module).generate(&output)?;

        ui.output(&format!(
            "Generated report data in {}",
            summary.data_directory.display()
        ))?;
        ui.output(&format!("  Test cases: {}", summary.test_cases))?;
        ui.output(&format!("  Failed or broken: {}", summary.failed))?;
        ui.output(&format!("  Attachments: {}", summary.attachments))?;
        if !summary.plugin_files.is_empty() {
            ui.output(&format!("  Plugin data: {}", summary.plugin_files.join(", ")))?;
        }

        Ok(0)
    }

    fn name(&self) -> &str {
        "generate"
    }

    fn help(&self) -> &str {
        "Generate report data from results directories"
    }
}

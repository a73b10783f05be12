//! Show statistics of the results directories

use crate::commands::utils::{build_module, load_config};
use crate::commands::Command;
use crate::error::Result;
use crate::model::Status;
use crate::ui::UI;

pub struct StatsCommand {
    base_path: Option<String>,
    results: Vec<String>,
}

impl StatsCommand {
    pub fn new(base_path: Option<String>, results: Vec<String>) -> Self {
        StatsCommand { base_path, results }
    }
}

impl Command for StatsCommand {
    fn execute(&self, ui: &mut dyn UI) -> Result<i32> {
        let config = load_config(self.base_path.as_deref(), &self.results)?;
        let module = build_module(&config)?;

        let suites = module.test_suite_reader().read()?;
        let test_cases = module.test_case_reader().read()?;
        let attachments = module.attachment_reader().read()?;

        ui.output("Result Statistics:")?;
        ui.output(&format!(
            "  Results directories: {}",
            module.result_directories().existing().len()
        ))?;
        ui.output(&format!("  Test suites: {}", suites.len()))?;
        ui.output(&format!("  Test cases: {}", test_cases.len()))?;
        for status in Status::ALL {
            let count = test_cases.iter().filter(|c| c.status == status).count();
            if count > 0 {
                ui.output(&format!("    {}: {}", status, count))?;
            }
        }
        ui.output(&format!("  Attachments: {}", attachments.len()))?;

        if test_cases.iter().any(|c| c.status.is_failure()) {
            Ok(1)
        } else {
            Ok(0)
        }
    }

    fn name(&self) -> &str {
        "stats"
    }

    fn help(&self) -> &str {
        "Show statistics of the results directories"
    }
}

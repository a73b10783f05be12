//! Validate suite result files against the result schema

use crate::commands::utils::{build_module, load_config};
use crate::commands::Command;
use crate::error::Result;
use crate::io::list_matching_files;
use crate::schema::SchemaValidator;
use crate::ui::UI;

pub struct ValidateCommand {
    base_path: Option<String>,
    results: Vec<String>,
}

impl ValidateCommand {
    pub fn new(base_path: Option<String>, results: Vec<String>) -> Self {
        ValidateCommand { base_path, results }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ui: &mut dyn UI) -> Result<i32> {
        let config = load_config(self.base_path.as_deref(), &self.results)?;
        let module = build_module(&config)?;
        let validator = SchemaValidator::new();

        let mut checked = 0;
        let mut invalid = 0;
        for dir in module.result_directories().existing() {
            for file in list_matching_files(dir, &module.file_patterns().test_suite)? {
                checked += 1;
                match validator.validate_file(&file) {
                    Ok(suite) => ui.output(&format!(
                        "{}: ok ({} test cases)",
                        file.display(),
                        suite.test_cases.len()
                    ))?,
                    Err(e) => {
                        invalid += 1;
                        ui.error(&e.to_string())?;
                    }
                }
            }
        }

        ui.output(&format!(
            "Validated {} suite file(s), {} invalid",
            checked, invalid
        ))?;

        Ok(if invalid > 0 { 1 } else { 0 })
    }

    fn name(&self) -> &str {
        "validate"
    }

    fn help(&self) -> &str {
        "Validate suite result files against the result schema"
    }
}

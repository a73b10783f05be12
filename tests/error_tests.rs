//! Error path testing
//!
//! This module tests error handling in various failure scenarios to ensure
//! bad configuration and broken result files are reported, not ignored.

use allure_report_data::commands::{
    CleanCommand, Command, GenerateCommand, StatsCommand, ValidateCommand,
};
use allure_report_data::config::{ReportConfig, CONFIG_FILE};
use allure_report_data::error::{Error, Result};
use allure_report_data::io::{delete_not_empty_directory, ResultDirectories};
use allure_report_data::lifecycle::AllureLifecycle;
use allure_report_data::model::{Status, TestCaseResult, TestSuiteResult};
use allure_report_data::module::AllureModule;
use allure_report_data::plugins::PluginRegistry;
use allure_report_data::ui::UI;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Test UI implementation
struct TestUI {
    pub output: Vec<String>,
    pub errors: Vec<String>,
}

impl TestUI {
    fn new() -> Self {
        TestUI {
            output: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl UI for TestUI {
    fn output(&mut self, message: &str) -> Result<()> {
        self.output.push(message.to_string());
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        self.errors.push(format!("Warning: {}", message));
        Ok(())
    }
}

fn write_config(dir: &Path, contents: &str) {
    fs::write(dir.join(CONFIG_FILE), contents).unwrap();
}

fn base_arg(temp: &TempDir) -> Option<String> {
    Some(temp.path().to_string_lossy().to_string())
}

#[test]
fn test_generate_without_results_directories() {
    let temp = TempDir::new().unwrap();
    let mut ui = TestUI::new();

    let cmd = GenerateCommand::new(base_arg(&temp), vec![]);
    let result = cmd.execute(&mut ui);

    assert!(matches!(result, Err(Error::Config(_))));
    assert!(ui.output.is_empty());
}

#[test]
fn test_config_without_default_section() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "[report]\nresults_directories=results\n");

    let mut ui = TestUI::new();
    let cmd = StatsCommand::new(base_arg(&temp), vec![]);
    let result = cmd.execute(&mut ui);

    match result {
        Err(Error::Config(message)) => assert!(message.contains("[DEFAULT]")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_config_with_invalid_link_pattern() {
    let result = ReportConfig::parse(
        "[DEFAULT]\nresults_directories=results\nissue_tracker_pattern=https://issues.example.com/\n",
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_config_with_invalid_file_pattern() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "[DEFAULT]\nresults_directories=results\ntest_suite_file_pattern=(unclosed\n",
    );

    let mut ui = TestUI::new();
    let cmd = ValidateCommand::new(base_arg(&temp), vec![]);
    assert!(matches!(cmd.execute(&mut ui), Err(Error::Config(_))));
}

#[test]
fn test_config_with_unknown_plugin() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "[DEFAULT]\nresults_directories=results\nplugins=summary,graphs\n",
    );

    let mut ui = TestUI::new();
    let cmd = GenerateCommand::new(base_arg(&temp), vec![]);
    assert!(matches!(cmd.execute(&mut ui), Err(Error::Plugin(_))));
}

#[test]
fn test_corrupt_suite_file_is_skipped_by_readers() {
    let temp = TempDir::new().unwrap();
    let mut suite = TestSuiteResult::new("good");
    suite.add_test_case(TestCaseResult::passed("case"));
    fs::write(temp.path().join("a-testsuite.xml"), suite.to_xml().unwrap()).unwrap();
    fs::write(temp.path().join("b-testsuite.xml"), "<test-suite").unwrap();

    let module = AllureModule::new(
        PluginRegistry::builtin(),
        ResultDirectories::new(vec![temp.path()]),
    )
    .unwrap();
    let suites = module.test_suite_reader().read().unwrap();
    assert_eq!(suites.len(), 1);
    assert_eq!(suites[0].name, "good");

    let mut ui = TestUI::new();
    let cmd = ValidateCommand::new(None, vec![temp.path().to_string_lossy().to_string()]);
    assert_eq!(cmd.execute(&mut ui).unwrap(), 1);
    assert_eq!(ui.errors.len(), 1);
    assert!(ui.errors[0].contains("b-testsuite.xml"));
}

#[test]
fn test_unreadable_environment_file_is_skipped() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("environment.xml"), "<environment><id>").unwrap();
    fs::write(temp.path().join("environment.properties"), "os=linux\n").unwrap();

    let module = AllureModule::new(
        PluginRegistry::builtin(),
        ResultDirectories::new(vec![temp.path()]),
    )
    .unwrap();
    let environments = module.environment_reader().read().unwrap();
    assert_eq!(environments.len(), 1);
    assert_eq!(environments[0].get("os"), Some("linux"));
}

#[test]
fn test_clean_missing_directory() {
    let temp = TempDir::new().unwrap();
    let mut ui = TestUI::new();

    let cmd = CleanCommand::new(temp.path().join("allure-results"));
    let result = cmd.execute(&mut ui);

    assert!(matches!(result, Err(Error::ResultsDirectoryNotFound(_))));
}

#[test]
fn test_delete_propagates_errors() {
    let temp = TempDir::new().unwrap();

    let missing = delete_not_empty_directory(&temp.path().join("missing"));
    assert!(matches!(missing, Err(Error::Io(_))));

    let file = temp.path().join("plain-file");
    fs::write(&file, "not a directory").unwrap();
    assert!(delete_not_empty_directory(&file).is_err());
    assert!(file.exists());
}

#[test]
fn test_lifecycle_rejects_events_without_a_running_case() {
    let temp = TempDir::new().unwrap();
    let mut lifecycle = AllureLifecycle::new(temp.path()).unwrap();

    assert!(matches!(
        lifecycle.add_label("feature", "login"),
        Err(Error::Lifecycle(_))
    ));
    assert!(matches!(
        lifecycle.attach("log", "text/plain", b"x"),
        Err(Error::Lifecycle(_))
    ));
    assert!(matches!(
        lifecycle.finish_step(Status::Passed),
        Err(Error::Lifecycle(_))
    ));
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

//! Integration tests for full workflows
//!
//! A fixture test class is run through the runner adaptor into a fresh
//! results directory. The written results are then validated, read back
//! and turned into report data by the commands a user would run.

use allure_report_data::adaptor::{
    TestClass, TestContext, TestFailure, TestMethod, TestOutcome, TestRunner,
};
use allure_report_data::commands::{
    CleanCommand, Command, GenerateCommand, StatsCommand, ValidateCommand,
};
use allure_report_data::error::Result;
use allure_report_data::io::{delete_not_empty_directory, list_test_suite_files, ResultDirectories};
use allure_report_data::lifecycle::AllureLifecycle;
use allure_report_data::model::{labels, Description, Status};
use allure_report_data::module::AllureModule;
use allure_report_data::plugins::PluginRegistry;
use allure_report_data::schema::SchemaValidator;
use allure_report_data::ui::UI;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Simple test UI that captures output for assertions
struct TestUI {
    output: Vec<String>,
    errors: Vec<String>,
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

fn adds_numbers(ctx: &mut TestContext<'_>) -> TestOutcome {
    ctx.parameter("a", "2")?;
    ctx.parameter("b", "2")?;
    ctx.step("add", |ctx| {
        ctx.attach("calculation", "text/plain", b"2 + 2 = 4")?;
        if 2 + 2 == 4 {
            Ok(())
        } else {
            Err(TestFailure::Assertion("2 + 2 != 4".to_string()))
        }
    })
}

fn divides_numbers(ctx: &mut TestContext<'_>) -> TestOutcome {
    ctx.step("divide", |ctx| {
        ctx.step("check remainder", |_| {
            Err(TestFailure::Assertion("expected remainder 0, got 1".to_string()))
        })
    })
}

fn loads_fixture(_: &mut TestContext<'_>) -> TestOutcome {
    Err(TestFailure::Skipped("fixture database unavailable".to_string()))
}

fn parses_input(_: &mut TestContext<'_>) -> TestOutcome {
    let input: Vec<u32> = Vec::new();
    let first = input.first().copied().unwrap_or_else(|| panic!("empty input"));
    if first > 0 {
        Ok(())
    } else {
        Err(TestFailure::Assertion("first value is zero".to_string()))
    }
}

fn fixture_class() -> TestClass {
    TestClass::new("CalculatorTest")
        .with_description(Description::markdown("Checks the **calculator**"))
        .with_method(
            TestMethod::new("addsNumbers", adds_numbers)
                .with_description(Description::text("adds two numbers"))
                .with_label(labels::SEVERITY, "critical")
                .with_label(labels::ISSUE, "CALC-1"),
        )
        .with_method(TestMethod::new("dividesNumbers", divides_numbers))
        .with_method(TestMethod::new("loadsFixture", loads_fixture))
        .with_method(TestMethod::new("parsesInput", parses_input))
        .with_method(TestMethod::new("exportsCsv", adds_numbers).disabled())
}

/// A results directory populated by running the fixture class once.
///
/// The directory is removed with `delete_not_empty_directory` when the
/// fixture is dropped, so teardown also runs for a failing test.
struct ResultsFixture {
    _temp: Option<TempDir>,
    results_dir: PathBuf,
}

impl ResultsFixture {
    fn setup() -> Self {
        let temp = TempDir::new().unwrap();
        let mut fixture = Self::setup_in(temp.path());
        fixture._temp = Some(temp);
        fixture
    }

    /// Run the fixture class into `<parent>/allure-results`
    fn setup_in(parent: &Path) -> Self {
        let results_dir = parent.join("allure-results");

        let mut lifecycle = AllureLifecycle::new(&results_dir).unwrap();
        TestRunner::new("suite")
            .run(&mut lifecycle, &[fixture_class()])
            .unwrap();

        ResultsFixture {
            _temp: None,
            results_dir,
        }
    }

    fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    fn results_arg(&self) -> Vec<String> {
        vec![self.results_dir.to_string_lossy().to_string()]
    }

    fn teardown(self) {
        let results_dir = self.results_dir.clone();
        drop(self);
        assert!(!results_dir.exists());
    }
}

impl Drop for ResultsFixture {
    fn drop(&mut self) {
        if !self.results_dir.exists() {
            return;
        }
        if let Err(e) = delete_not_empty_directory(&self.results_dir) {
            if std::thread::panicking() {
                eprintln!("teardown failed: {}", e);
            } else {
                panic!("teardown failed: {}", e);
            }
        }
    }
}

#[test]
fn test_suite_files_count() {
    let fixture = ResultsFixture::setup();

    let files = list_test_suite_files(fixture.results_dir()).unwrap();
    assert_eq!(files.len(), 1);

    fixture.teardown();
}

#[test]
fn test_validate_suite_files() {
    let fixture = ResultsFixture::setup();

    let validator = SchemaValidator::new();
    for file in list_test_suite_files(fixture.results_dir()).unwrap() {
        let suite = validator.validate_file(&file).unwrap();
        assert_eq!(suite.name, "suite");
        assert_eq!(suite.title.as_deref(), Some("CalculatorTest"));
        assert_eq!(suite.test_cases.len(), 5);
    }

    fixture.teardown();
}

#[test]
fn test_fixture_statuses_written() {
    let fixture = ResultsFixture::setup();

    let files = list_test_suite_files(fixture.results_dir()).unwrap();
    let suite = SchemaValidator::new().validate_file(&files[0]).unwrap();
    let statuses: Vec<(&str, Status)> = suite
        .test_cases
        .iter()
        .map(|c| (c.name.as_str(), c.status))
        .collect();

    assert_eq!(
        statuses,
        vec![
            ("addsNumbers", Status::Passed),
            ("dividesNumbers", Status::Failed),
            ("loadsFixture", Status::Skipped),
            ("parsesInput", Status::Broken),
            ("exportsCsv", Status::Skipped),
        ]
    );

    let divides = &suite.test_cases.items[1];
    assert_eq!(divides.steps.items[0].name, "divide");
    assert_eq!(divides.steps.items[0].steps.items[0].name, "check remainder");
    assert_eq!(
        divides.failure.as_ref().unwrap().message,
        "expected remainder 0, got 1"
    );

    fixture.teardown();
}

#[test]
fn test_read_back_merges_descriptions_and_labels() {
    let fixture = ResultsFixture::setup();

    let module = AllureModule::new(
        PluginRegistry::builtin(),
        ResultDirectories::new(vec![fixture.results_dir()]),
    )
    .unwrap();
    let cases = module.test_case_reader().read().unwrap();
    assert_eq!(cases.len(), 5);

    let adds = cases.iter().find(|c| c.name == "addsNumbers").unwrap();
    assert_eq!(
        adds.description,
        Some(Description::markdown(
            "Checks the **calculator**\n\nadds two numbers"
        ))
    );
    assert_eq!(adds.label(labels::SUITE_NAME), Some("suite"));
    assert_eq!(adds.label(labels::SUITE_TITLE), Some("CalculatorTest"));
    assert_eq!(adds.label(labels::TEST_CLASS), Some("CalculatorTest"));

    let divides = cases.iter().find(|c| c.name == "dividesNumbers").unwrap();
    assert_eq!(
        divides.description,
        Some(Description::markdown("Checks the **calculator**"))
    );

    fixture.teardown();
}

#[test]
fn test_full_workflow_validate_stats_generate() {
    let fixture = ResultsFixture::setup();
    let report = TempDir::new().unwrap();

    let mut ui = TestUI::new();
    let validate = ValidateCommand::new(None, fixture.results_arg());
    assert_eq!(validate.execute(&mut ui).unwrap(), 0);
    assert!(ui.errors.is_empty());

    let mut ui = TestUI::new();
    let stats = StatsCommand::new(None, fixture.results_arg());
    assert_eq!(stats.execute(&mut ui).unwrap(), 1);
    assert!(ui.output.contains(&"  Test cases: 5".to_string()));
    assert!(ui.output.contains(&"    skipped: 2".to_string()));
    assert!(ui.output.contains(&"  Attachments: 1".to_string()));

    let mut ui = TestUI::new();
    let generate = GenerateCommand::with_output(
        None,
        fixture.results_arg(),
        report.path().to_string_lossy().to_string(),
    );
    assert_eq!(generate.execute(&mut ui).unwrap(), 0);
    assert!(ui.output.contains(&"  Failed or broken: 2".to_string()));

    let data_dir = report.path().join("data");
    let defects: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("defects.json")).unwrap())
            .unwrap();
    assert!(defects["defectsList"].is_array());

    let xunit: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("xunit.json")).unwrap()).unwrap();
    assert_eq!(xunit["testSuites"].as_array().unwrap().len(), 1);

    fixture.teardown();
}

#[test]
fn test_teardown_runs_when_test_body_panics() {
    let parent = TempDir::new().unwrap();
    let parent_path = parent.path().to_path_buf();
    let results_dir = parent_path.join("allure-results");

    let outcome = std::panic::catch_unwind(|| {
        let fixture = ResultsFixture::setup_in(&parent_path);
        assert!(fixture.results_dir().exists());
        panic!("test body failed");
    });

    assert!(outcome.is_err());
    assert!(parent_path.exists());
    assert!(!results_dir.exists());
}

#[test]
fn test_clean_command_removes_results() {
    let fixture = ResultsFixture::setup();
    let results_dir = fixture.results_dir().to_path_buf();

    let mut ui = TestUI::new();
    let clean = CleanCommand::new(&results_dir);
    assert_eq!(clean.execute(&mut ui).unwrap(), 0);
    assert!(!results_dir.exists());

    let result = delete_not_empty_directory(&results_dir);
    assert!(result.is_err());
}

//! A minimal test runner adaptor
//!
//! Runs test classes (named groups of test functions) and reports every
//! test through an [`AllureLifecycle`]. One run produces exactly one suite
//! file named after the runner's default suite name.
//!
//! Test functions return `Ok(())` to pass, [`TestFailure::Assertion`] to
//! fail and [`TestFailure::Skipped`] to skip. A panic marks the test as
//! broken.

use crate::error::Result;
use crate::lifecycle::AllureLifecycle;
use crate::model::{labels, Description, Failure, Label, Status};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::debug;

/// Why a test did not pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestFailure {
    Assertion(String),
    Skipped(String),
}

pub type TestOutcome = std::result::Result<(), TestFailure>;

pub type TestBody = fn(&mut TestContext<'_>) -> TestOutcome;

/// Handle given to a running test to record steps and attachments
pub struct TestContext<'a> {
    lifecycle: &'a mut AllureLifecycle,
}

impl TestContext<'_> {
    /// Run `body` as a named step
    pub fn step<F>(&mut self, name: &str, body: F) -> TestOutcome
    where
        F: FnOnce(&mut TestContext<'_>) -> TestOutcome,
    {
        self.record(|lc| lc.start_step(name))?;
        let outcome = body(self);
        let status = match outcome {
            Ok(()) => Status::Passed,
            Err(TestFailure::Assertion(_)) => Status::Failed,
            Err(TestFailure::Skipped(_)) => Status::Skipped,
        };
        self.record(|lc| lc.finish_step(status))?;
        outcome
    }

    pub fn attach(&mut self, title: &str, mime_type: &str, content: &[u8]) -> TestOutcome {
        self.record(|lc| lc.attach(title, mime_type, content).map(|_| ()))
    }

    pub fn label(&mut self, name: &str, value: &str) -> TestOutcome {
        self.record(|lc| lc.add_label(name, value))
    }

    pub fn parameter(&mut self, name: &str, value: &str) -> TestOutcome {
        self.record(|lc| lc.add_parameter(name, value))
    }

    /// Reporting problems surface as a test failure of the running test
    fn record<F>(&mut self, event: F) -> TestOutcome
    where
        F: FnOnce(&mut AllureLifecycle) -> Result<()>,
    {
        event(&mut *self.lifecycle).map_err(|e| TestFailure::Assertion(e.to_string()))
    }
}

pub struct TestMethod {
    pub name: String,
    pub description: Option<Description>,
    pub labels: Vec<Label>,
    /// Disabled methods are reported as skipped without running
    pub enabled: bool,
    body: TestBody,
}

impl TestMethod {
    pub fn new(name: impl Into<String>, body: TestBody) -> Self {
        TestMethod {
            name: name.into(),
            description: None,
            labels: Vec::new(),
            enabled: true,
            body,
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push(Label::new(name, value));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

pub struct TestClass {
    pub name: String,
    pub description: Option<Description>,
    pub methods: Vec<TestMethod>,
}

impl TestClass {
    pub fn new(name: impl Into<String>) -> Self {
        TestClass {
            name: name.into(),
            description: None,
            methods: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_method(mut self, method: TestMethod) -> Self {
        self.methods.push(method);
        self
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub suite_file: PathBuf,
    pub counts: BTreeMap<Status, usize>,
}

impl RunReport {
    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

pub struct TestRunner {
    default_suite_name: String,
}

impl TestRunner {
    pub fn new(default_suite_name: impl Into<String>) -> Self {
        TestRunner {
            default_suite_name: default_suite_name.into(),
        }
    }

    /// Run every method of every class, writing one suite file
    pub fn run(&self, lifecycle: &mut AllureLifecycle, classes: &[TestClass]) -> Result<RunReport> {
        let suite_uid = lifecycle.start_suite(self.default_suite_name.clone());
        if let [class] = classes {
            let suite = lifecycle.suite_mut(&suite_uid)?;
            suite.title = Some(class.name.clone());
            suite.description = class.description.clone();
        }

        let mut counts = BTreeMap::new();
        for class in classes {
            for method in &class.methods {
                let status = Self::run_method(lifecycle, &suite_uid, class, method)?;
                *counts.entry(status).or_insert(0) += 1;
            }
        }

        let suite_file = lifecycle.finish_suite(&suite_uid)?;
        Ok(RunReport { suite_file, counts })
    }

    fn run_method(
        lifecycle: &mut AllureLifecycle,
        suite_uid: &str,
        class: &TestClass,
        method: &TestMethod,
    ) -> Result<Status> {
        lifecycle.start_case(suite_uid, method.name.clone())?;
        lifecycle.add_label(labels::TEST_CLASS, class.name.clone())?;
        for label in &method.labels {
            lifecycle.add_label(label.name.clone(), label.value.clone())?;
        }
        if let Some(ref description) = method.description {
            lifecycle.set_description(description.clone())?;
        }

        let (status, failure) = if !method.enabled {
            (Status::Skipped, None)
        } else {
            let mut context = TestContext {
                lifecycle: &mut *lifecycle,
            };
            match panic::catch_unwind(AssertUnwindSafe(|| (method.body)(&mut context))) {
                Ok(Ok(())) => (Status::Passed, None),
                Ok(Err(TestFailure::Assertion(message))) => {
                    (Status::Failed, Some(Failure::new(message)))
                }
                Ok(Err(TestFailure::Skipped(reason))) => {
                    (Status::Skipped, Some(Failure::new(reason)))
                }
                Err(payload) => (
                    Status::Broken,
                    Some(Failure::new(panic_message(payload.as_ref()))),
                ),
            }
        };

        debug!(test = %method.name, %status, "test finished");
        lifecycle.finish_case(status, failure)?;
        Ok(status)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestSuiteResult;
    use std::fs;
    use tempfile::TempDir;

    fn passing(_: &mut TestContext<'_>) -> TestOutcome {
        Ok(())
    }

    fn failing(ctx: &mut TestContext<'_>) -> TestOutcome {
        ctx.step("check total", |_| {
            Err(TestFailure::Assertion("expected 3, got 4".to_string()))
        })
    }

    fn skipping(_: &mut TestContext<'_>) -> TestOutcome {
        Err(TestFailure::Skipped("no database".to_string()))
    }

    fn panicking(_: &mut TestContext<'_>) -> TestOutcome {
        panic!("index out of bounds");
    }

    fn read_suite(report: &RunReport) -> TestSuiteResult {
        TestSuiteResult::from_xml(&fs::read_to_string(&report.suite_file).unwrap()).unwrap()
    }

    #[test]
    fn test_run_maps_outcomes_to_statuses() {
        let temp = TempDir::new().unwrap();
        let mut lifecycle = AllureLifecycle::new(temp.path()).unwrap();
        let class = TestClass::new("Calculator")
            .with_method(TestMethod::new("adds", passing))
            .with_method(TestMethod::new("sums", failing))
            .with_method(TestMethod::new("persists", skipping))
            .with_method(TestMethod::new("divides", panicking))
            .with_method(TestMethod::new("later", passing).disabled());

        let report = TestRunner::new("suite")
            .run(&mut lifecycle, &[class])
            .unwrap();

        assert_eq!(report.total(), 5);
        assert_eq!(report.count(Status::Passed), 1);
        assert_eq!(report.count(Status::Failed), 1);
        assert_eq!(report.count(Status::Skipped), 2);
        assert_eq!(report.count(Status::Broken), 1);

        let suite = read_suite(&report);
        assert_eq!(suite.name, "suite");
        assert_eq!(suite.title.as_deref(), Some("Calculator"));
        let divides = &suite.test_cases.items[3];
        assert_eq!(divides.status, Status::Broken);
        assert_eq!(
            divides.failure.as_ref().unwrap().message,
            "index out of bounds"
        );
    }

    #[test]
    fn test_failed_step_is_recorded() {
        let temp = TempDir::new().unwrap();
        let mut lifecycle = AllureLifecycle::new(temp.path()).unwrap();
        let class = TestClass::new("Calculator").with_method(TestMethod::new("sums", failing));

        let report = TestRunner::new("suite").run(&mut lifecycle, &[class]).unwrap();
        let suite = read_suite(&report);
        let case = &suite.test_cases.items[0];

        assert_eq!(case.steps.items[0].name, "check total");
        assert_eq!(case.steps.items[0].status, Status::Failed);
        assert_eq!(case.failure.as_ref().unwrap().message, "expected 3, got 4");
    }

    #[test]
    fn test_labels_and_descriptions() {
        let temp = TempDir::new().unwrap();
        let mut lifecycle = AllureLifecycle::new(temp.path()).unwrap();
        let class = TestClass::new("Cart")
            .with_description(Description::markdown("Cart **rules**"))
            .with_method(
                TestMethod::new("addsItem", passing)
                    .with_description(Description::text("one item"))
                    .with_label(labels::SEVERITY, "critical"),
            );

        let report = TestRunner::new("suite").run(&mut lifecycle, &[class]).unwrap();
        let suite = read_suite(&report);

        assert_eq!(suite.description, Some(Description::markdown("Cart **rules**")));
        let case = &suite.test_cases.items[0];
        assert_eq!(case.label(labels::TEST_CLASS), Some("Cart"));
        assert_eq!(case.label(labels::SEVERITY), Some("critical"));
        assert_eq!(case.description, Some(Description::text("one item")));
    }

    #[test]
    fn test_several_classes_share_one_suite() {
        let temp = TempDir::new().unwrap();
        let mut lifecycle = AllureLifecycle::new(temp.path()).unwrap();
        let classes = [
            TestClass::new("A").with_method(TestMethod::new("a", passing)),
            TestClass::new("B").with_method(TestMethod::new("b", passing)),
        ];

        let report = TestRunner::new("suite").run(&mut lifecycle, &classes).unwrap();
        let suite = read_suite(&report);
        assert_eq!(suite.test_cases.len(), 2);
        assert_eq!(suite.title, None);
    }
}

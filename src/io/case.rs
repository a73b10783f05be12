//! Reader yielding test cases with their suite context merged in

use crate::description::merge_result_descriptions;
use crate::error::Result;
use crate::io::Reader;
use crate::model::{labels, Label, TestCaseResult, TestSuiteResult};

/// Flattens suites into their test cases.
///
/// Every test case gets `suite-name` / `suite-title` labels, inherits the
/// suite labels and carries the merged suite + case description.
pub struct TestCaseReader {
    suites: Box<dyn Reader<TestSuiteResult>>,
}

impl TestCaseReader {
    pub fn new(suites: Box<dyn Reader<TestSuiteResult>>) -> Self {
        TestCaseReader { suites }
    }

    fn attach_suite(suite: &TestSuiteResult, mut test_case: TestCaseResult) -> TestCaseResult {
        test_case.description = merge_result_descriptions(suite, &test_case);

        test_case
            .labels
            .push(Label::new(labels::SUITE_NAME, suite.name.clone()));
        if let Some(ref title) = suite.title {
            test_case
                .labels
                .push(Label::new(labels::SUITE_TITLE, title.clone()));
        }
        for label in &suite.labels {
            test_case.labels.push(label.clone());
        }

        test_case
    }
}

impl Reader<TestCaseResult> for TestCaseReader {
    fn read(&self) -> Result<Vec<TestCaseResult>> {
        let mut cases = Vec::new();
        for suite in self.suites.read()? {
            for test_case in &suite.test_cases {
                cases.push(Self::attach_suite(&suite, test_case.clone()));
            }
        }
        Ok(cases)
    }
}

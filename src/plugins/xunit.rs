//! Test cases grouped by suite

use crate::model::{SeverityLevel, Status};
use crate::plugins::{Plugin, PluginData};
use crate::report::model::{AllureTestCase, Time};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NAME: &str = "xunit";
pub const FILE_NAME: &str = "xunit.json";

/// Reference to a test case from a grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCaseRef {
    pub uid: String,
    pub name: String,
    pub title: String,
    pub status: Status,
    pub severity: SeverityLevel,
    pub time: Time,
}

impl From<&AllureTestCase> for TestCaseRef {
    fn from(test_case: &AllureTestCase) -> Self {
        TestCaseRef {
            uid: test_case.uid.clone(),
            name: test_case.name.clone(),
            title: test_case.title.clone(),
            status: test_case.status,
            severity: test_case.severity,
            time: test_case.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteGroup {
    pub name: String,
    pub title: String,
    pub time: Time,
    pub statistic: BTreeMap<String, usize>,
    #[serde(rename = "testCases")]
    pub test_cases: Vec<TestCaseRef>,
}

impl SuiteGroup {
    fn new(name: &str, title: &str) -> Self {
        SuiteGroup {
            name: name.to_string(),
            title: title.to_string(),
            time: Time::default(),
            statistic: BTreeMap::new(),
            test_cases: Vec::new(),
        }
    }

    fn add(&mut self, test_case: &AllureTestCase) {
        self.time = if self.test_cases.is_empty() {
            test_case.time
        } else {
            Time::new(
                self.time.start.min(test_case.time.start),
                self.time.stop.max(test_case.time.stop),
            )
        };
        *self
            .statistic
            .entry(test_case.status.to_string())
            .or_insert(0) += 1;
        self.test_cases.push(test_case.into());
    }
}

#[derive(Serialize)]
struct XUnitData<'a> {
    #[serde(rename = "testSuites")]
    test_suites: Vec<&'a SuiteGroup>,
}

#[derive(Debug, Default)]
pub struct XUnitPlugin {
    suites: BTreeMap<String, SuiteGroup>,
}

impl XUnitPlugin {
    pub fn new() -> Self {
        XUnitPlugin::default()
    }

    pub fn suites(&self) -> impl Iterator<Item = &SuiteGroup> {
        self.suites.values()
    }
}

impl Plugin for XUnitPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn process(&mut self, test_case: &AllureTestCase) {
        self.suites
            .entry(test_case.suite.name.clone())
            .or_insert_with(|| SuiteGroup::new(&test_case.suite.name, &test_case.suite.title))
            .add(test_case);
    }

    fn data(&self) -> Vec<PluginData> {
        let data = XUnitData {
            test_suites: self.suites().collect(),
        };
        PluginData::serialize(FILE_NAME, &data).into_iter().collect()
    }
}

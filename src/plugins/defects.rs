//! Failed and broken test cases grouped by failure message

use crate::model::Status;
use crate::plugins::xunit::TestCaseRef;
use crate::plugins::{Plugin, PluginData};
use crate::report::model::AllureTestCase;
use serde::Serialize;
use std::collections::BTreeMap;

pub const NAME: &str = "defects";
pub const FILE_NAME: &str = "defects.json";

const UNKNOWN_FAILURE: &str = "Unknown failure";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Defect {
    pub message: String,
    #[serde(rename = "testCases")]
    pub test_cases: Vec<TestCaseRef>,
}

/// Defects of one kind: product defects (failed assertions) or test
/// defects (broken tests).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefectGroup {
    pub status: Status,
    pub title: &'static str,
    pub defects: Vec<Defect>,
}

#[derive(Serialize)]
struct DefectsData {
    #[serde(rename = "defectsList")]
    defects_list: Vec<DefectGroup>,
}

#[derive(Debug, Default)]
pub struct DefectsPlugin {
    failed: BTreeMap<String, Vec<TestCaseRef>>,
    broken: BTreeMap<String, Vec<TestCaseRef>>,
}

impl DefectsPlugin {
    pub fn new() -> Self {
        DefectsPlugin::default()
    }

    fn group(
        status: Status,
        title: &'static str,
        defects: &BTreeMap<String, Vec<TestCaseRef>>,
    ) -> DefectGroup {
        DefectGroup {
            status,
            title,
            defects: defects
                .iter()
                .map(|(message, cases)| Defect {
                    message: message.clone(),
                    test_cases: cases.clone(),
                })
                .collect(),
        }
    }

    pub fn groups(&self) -> Vec<DefectGroup> {
        vec![
            Self::group(Status::Failed, "Product defects", &self.failed),
            Self::group(Status::Broken, "Test defects", &self.broken),
        ]
    }
}

impl Plugin for DefectsPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn process(&mut self, test_case: &AllureTestCase) {
        let defects = match test_case.status {
            Status::Failed => &mut self.failed,
            Status::Broken => &mut self.broken,
            _ => return,
        };

        let message = test_case
            .failure
            .as_ref()
            .map(|f| f.message.trim())
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_FAILURE)
            .to_string();

        defects.entry(message).or_default().push(test_case.into());
    }

    fn data(&self) -> Vec<PluginData> {
        let data = DefectsData {
            defects_list: self.groups(),
        };
        PluginData::serialize(FILE_NAME, &data).into_iter().collect()
    }
}

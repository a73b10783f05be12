//! Report-side model written as JSON into the report data directory

use crate::model::{Description, DescriptionType, ParameterKind, SeverityLevel, Status};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Time {
    pub start: u64,
    pub stop: u64,
    pub duration: u64,
}

impl Time {
    pub fn new(start: u64, stop: u64) -> Self {
        Time {
            start,
            stop,
            duration: stop.saturating_sub(start),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub steps: usize,
    pub attachments: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteInfo {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDescription {
    #[serde(rename = "type")]
    pub kind: DescriptionType,
    pub value: String,
}

impl From<Description> for ReportDescription {
    fn from(description: Description) -> Self {
        ReportDescription {
            kind: description.kind,
            value: description.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFailure {
    pub message: String,
    #[serde(rename = "stackTrace", skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportAttachment {
    pub uid: String,
    pub title: String,
    pub source: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLabel {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportParameter {
    pub name: String,
    pub value: String,
    pub kind: ParameterKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStep {
    pub name: String,
    pub title: String,
    pub time: Time,
    pub status: Status,
    pub summary: Summary,
    pub attachments: Vec<ReportAttachment>,
    pub steps: Vec<ReportStep>,
}

/// A test case as presented in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllureTestCase {
    pub uid: String,
    pub name: String,
    pub title: String,
    pub time: Time,
    pub summary: Summary,
    pub status: Status,
    pub severity: SeverityLevel,
    pub suite: SuiteInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ReportDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ReportFailure>,
    pub issues: Vec<Link>,
    #[serde(rename = "testIds")]
    pub test_ids: Vec<Link>,
    pub labels: Vec<ReportLabel>,
    pub parameters: Vec<ReportParameter>,
    pub steps: Vec<ReportStep>,
    pub attachments: Vec<ReportAttachment>,
}

impl AllureTestCase {
    /// Returns the value of the first label with the given name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }

    /// File name of this test case inside the report data directory.
    pub fn file_name(&self) -> String {
        format!("{}-testcase.json", self.uid)
    }
}

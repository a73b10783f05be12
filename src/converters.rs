//! Conversion of result-model test cases into the report model

use crate::error::Result;
use crate::model::{labels, Attachment, SeverityLevel, Step, TestCaseResult};
use crate::report::model::{
    AllureTestCase, Link, ReportAttachment, ReportFailure, ReportLabel, ReportParameter,
    ReportStep, SuiteInfo, Summary, Time,
};
use uuid::Uuid;

/// Placeholder replaced by the label value in link patterns
pub const LINK_PLACEHOLDER: &str = "%s";

/// Converts a test case read from the results into its report representation.
pub trait TestCaseConverter {
    fn convert(&self, result: &TestCaseResult) -> Result<AllureTestCase>;
}

/// URL patterns for `issue` and `testId` labels, e.g.
/// `https://tracker.example.com/browse/%s`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatterns {
    pub issue_tracker: Option<String>,
    pub test_management: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultTestCaseConverter {
    links: LinkPatterns,
}

impl DefaultTestCaseConverter {
    pub fn new(links: LinkPatterns) -> Self {
        DefaultTestCaseConverter { links }
    }

    fn links<'a>(values: impl Iterator<Item = &'a str>, pattern: Option<&str>) -> Vec<Link> {
        values
            .map(|value| Link {
                name: value.to_string(),
                url: pattern.map(|p| p.replace(LINK_PLACEHOLDER, value)),
            })
            .collect()
    }

    fn severity(result: &TestCaseResult) -> SeverityLevel {
        result
            .severity
            .or_else(|| result.label(labels::SEVERITY).and_then(SeverityLevel::parse))
            .unwrap_or_default()
    }

    fn attachments(attachments: &[Attachment]) -> Vec<ReportAttachment> {
        attachments
            .iter()
            .map(|a| ReportAttachment {
                uid: Uuid::new_v4().to_string(),
                title: a.title.clone(),
                source: a.source.clone(),
                mime_type: a.mime_type.clone(),
                size: a.size,
            })
            .collect()
    }

    fn step(step: &Step) -> ReportStep {
        ReportStep {
            name: step.name.clone(),
            title: title_or_humanized(step.title.as_deref(), &step.name),
            time: Time::new(step.start, step.stop),
            status: step.status,
            summary: summarize(&step.steps.items, &step.attachments.items),
            attachments: Self::attachments(&step.attachments.items),
            steps: step.steps.iter().map(Self::step).collect(),
        }
    }
}

impl TestCaseConverter for DefaultTestCaseConverter {
    fn convert(&self, result: &TestCaseResult) -> Result<AllureTestCase> {
        let suite_name = result.label(labels::SUITE_NAME).unwrap_or_default();
        let suite = SuiteInfo {
            name: suite_name.to_string(),
            title: title_or_humanized(result.label(labels::SUITE_TITLE), suite_name),
        };

        Ok(AllureTestCase {
            uid: Uuid::new_v4().to_string(),
            name: result.name.clone(),
            title: title_or_humanized(result.title.as_deref(), &result.name),
            time: Time::new(result.start, result.stop),
            summary: summarize(&result.steps.items, &result.attachments.items),
            status: result.status,
            severity: Self::severity(result),
            suite,
            description: result.description.clone().map(Into::into),
            failure: result.failure.as_ref().map(|f| ReportFailure {
                message: f.message.clone(),
                stack_trace: f.stack_trace.clone(),
            }),
            issues: Self::links(
                result.label_values(labels::ISSUE),
                self.links.issue_tracker.as_deref(),
            ),
            test_ids: Self::links(
                result.label_values(labels::TEST_ID),
                self.links.test_management.as_deref(),
            ),
            labels: result
                .labels
                .iter()
                .map(|l| ReportLabel {
                    name: l.name.clone(),
                    value: l.value.clone(),
                })
                .collect(),
            parameters: result
                .parameters
                .iter()
                .map(|p| ReportParameter {
                    name: p.name.clone(),
                    value: p.value.clone(),
                    kind: p.kind,
                })
                .collect(),
            steps: result.steps.iter().map(Self::step).collect(),
            attachments: Self::attachments(&result.attachments.items),
        })
    }
}

/// Count steps and attachments, including those of nested steps.
fn summarize(steps: &[Step], attachments: &[Attachment]) -> Summary {
    let mut summary = Summary {
        steps: steps.len(),
        attachments: attachments.len(),
    };
    for step in steps {
        let nested = summarize(&step.steps.items, &step.attachments.items);
        summary.steps += nested.steps;
        summary.attachments += nested.attachments;
    }
    summary
}

fn title_or_humanized(title: Option<&str>, name: &str) -> String {
    match title {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => humanize(name),
    }
}

/// Turn a method-like name into a sentence: `userCanLogIn` and
/// `user_can_log_in` both become `User can log in`.
pub fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else {
            let boundary = ch.is_uppercase()
                && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
        prev = Some(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let sentence = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Allure result model
//!
//! These types mirror the Allure 1 XML result format written by test runner
//! adaptors. A results directory holds one `<uuid>-testsuite.xml` file per
//! suite, attachment files referenced by `source`, and optional environment
//! files.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod environment;

pub use environment::{AttachmentInfo, Environment, EnvironmentParameter};

/// XML namespace of the Allure result model
pub const ALLURE_NAMESPACE: &str = "urn:model.allure.qatools.yandex.ru";

/// Root element name of a suite result file
pub const TEST_SUITE_ELEMENT: &str = "test-suite";

/// Declares a container element holding a list of repeated children,
/// e.g. `<labels><label/><label/></labels>`.
macro_rules! xml_list {
    ($(#[$meta:meta])* $name:ident, $child:literal, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = $child, default)]
            pub items: Vec<$item>,
        }

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            pub fn len(&self) -> usize {
                self.items.len()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.items.iter()
            }

            pub fn push(&mut self, item: $item) {
                self.items.push(item);
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                $name { items }
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }
    };
}

xml_list!(
    /// `<test-cases>` container
    TestCases, "test-case", TestCaseResult
);
xml_list!(
    /// `<steps>` container
    Steps, "step", Step
);
xml_list!(
    /// `<attachments>` container
    Attachments, "attachment", Attachment
);
xml_list!(
    /// `<labels>` container
    Labels, "label", Label
);
xml_list!(
    /// `<parameters>` container
    Parameters, "parameter", Parameter
);

/// Markup of a description text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionType {
    /// Markdown source, rendered by the report front-end.
    Markdown,
    /// Plain text.
    #[default]
    Text,
    /// Raw HTML.
    Html,
}

impl fmt::Display for DescriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionType::Markdown => write!(f, "markdown"),
            DescriptionType::Text => write!(f, "text"),
            DescriptionType::Html => write!(f, "html"),
        }
    }
}

/// Human-authored text attached to a suite or test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "@type", default)]
    pub kind: DescriptionType,
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl Description {
    pub fn new(kind: DescriptionType, value: impl Into<String>) -> Self {
        Description {
            kind,
            value: value.into(),
        }
    }

    /// Plain text description
    pub fn text(value: impl Into<String>) -> Self {
        Description::new(DescriptionType::Text, value)
    }

    /// Markdown description
    pub fn markdown(value: impl Into<String>) -> Self {
        Description::new(DescriptionType::Markdown, value)
    }
}

/// Outcome of a test case or step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Assertion failed.
    Failed,
    /// Unexpected error (exception, panic) during execution.
    Broken,
    /// Test was canceled before completing.
    Canceled,
    /// Test is declared but not implemented yet.
    Pending,
    /// Test was skipped or disabled.
    Skipped,
    /// Test passed.
    #[default]
    Passed,
}

impl Status {
    /// All statuses, most severe first.
    pub const ALL: [Status; 6] = [
        Status::Failed,
        Status::Broken,
        Status::Canceled,
        Status::Pending,
        Status::Skipped,
        Status::Passed,
    ];

    /// Returns true for Failed and Broken.
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed | Status::Broken)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Failed => "failed",
            Status::Broken => "broken",
            Status::Canceled => "canceled",
            Status::Pending => "pending",
            Status::Skipped => "skipped",
            Status::Passed => "passed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level of a test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Blocker,
    Critical,
    #[default]
    Normal,
    Minor,
    Trivial,
}

impl SeverityLevel {
    /// Parse a severity label value, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "blocker" => Some(SeverityLevel::Blocker),
            "critical" => Some(SeverityLevel::Critical),
            "normal" => Some(SeverityLevel::Normal),
            "minor" => Some(SeverityLevel::Minor),
            "trivial" => Some(SeverityLevel::Trivial),
            _ => None,
        }
    }
}

/// A `name=value` label attached to a suite or test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@value")]
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Label {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Well-known label names
pub mod labels {
    pub const SUITE_NAME: &str = "suite-name";
    pub const SUITE_TITLE: &str = "suite-title";
    pub const SEVERITY: &str = "severity";
    pub const ISSUE: &str = "issue";
    pub const TEST_ID: &str = "testId";
    pub const FEATURE: &str = "feature";
    pub const STORY: &str = "story";
    pub const TEST_CLASS: &str = "testClass";
}

/// Where a parameter value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    #[default]
    Argument,
    EnvironmentVariable,
    SystemProperty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@kind", default)]
    pub kind: ParameterKind,
}

/// Failure details of a failed or broken test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "stack-trace",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stack_trace: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            stack_trace: None,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}

/// Reference to an attachment file stored next to the suite file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "@title")]
    pub title: String,
    /// File name of the attachment, relative to the results directory.
    #[serde(rename = "@source")]
    pub source: String,
    #[serde(rename = "@type")]
    pub mime_type: String,
    #[serde(rename = "@size", default)]
    pub size: u64,
}

/// A step recorded inside a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "@start")]
    pub start: u64,
    #[serde(rename = "@stop")]
    pub stop: u64,
    #[serde(rename = "@status", default)]
    pub status: Status,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Attachments::is_empty")]
    pub attachments: Attachments,
    #[serde(default, skip_serializing_if = "Steps::is_empty")]
    pub steps: Steps,
}

impl Step {
    pub fn new(name: impl Into<String>, start: u64, stop: u64, status: Status) -> Self {
        Step {
            start,
            stop,
            status,
            name: name.into(),
            title: None,
            attachments: Attachments::default(),
            steps: Steps::default(),
        }
    }
}

/// Result of a single test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    #[serde(rename = "@start")]
    pub start: u64,
    #[serde(rename = "@stop")]
    pub stop: u64,
    #[serde(rename = "@status")]
    pub status: Status,
    #[serde(rename = "@severity", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityLevel>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
    #[serde(default, skip_serializing_if = "Steps::is_empty")]
    pub steps: Steps,
    #[serde(default, skip_serializing_if = "Attachments::is_empty")]
    pub attachments: Attachments,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl TestCaseResult {
    /// Create a test case result with the given name and status
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        TestCaseResult {
            start: 0,
            stop: 0,
            status,
            severity: None,
            name: name.into(),
            title: None,
            description: None,
            failure: None,
            steps: Steps::default(),
            attachments: Attachments::default(),
            labels: Labels::default(),
            parameters: Parameters::default(),
        }
    }

    /// Create a passed test case result
    pub fn passed(name: impl Into<String>) -> Self {
        TestCaseResult::new(name, Status::Passed)
    }

    /// Create a failed test case result
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut result = TestCaseResult::new(name, Status::Failed);
        result.failure = Some(Failure::new(message));
        result
    }

    /// Set start and stop times (epoch milliseconds)
    pub fn with_time(mut self, start: u64, stop: u64) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push(Label::new(name, value));
        self
    }

    /// Returns the value of the first label with the given name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }

    /// Returns all values of labels with the given name.
    pub fn label_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.labels
            .iter()
            .filter(move |l| l.name == name)
            .map(|l| l.value.as_str())
    }
}

/// Result of a test suite: the content of one `*-testsuite.xml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuiteResult {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    pub xmlns: Option<String>,
    #[serde(rename = "@start")]
    pub start: u64,
    #[serde(rename = "@stop")]
    pub stop: u64,
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(rename = "test-cases", default)]
    pub test_cases: TestCases,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl TestSuiteResult {
    /// Creates an empty suite in the Allure model namespace.
    pub fn new(name: impl Into<String>) -> Self {
        TestSuiteResult {
            xmlns: Some(ALLURE_NAMESPACE.to_string()),
            start: 0,
            stop: 0,
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            name: name.into(),
            title: None,
            description: None,
            test_cases: TestCases::default(),
            labels: Labels::default(),
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    /// Adds a test case, keeping insertion order.
    pub fn add_test_case(&mut self, test_case: TestCaseResult) {
        self.test_cases.push(test_case);
    }

    /// Parse a suite from its XML representation.
    ///
    /// Description text is kept verbatim, including leading and trailing
    /// whitespace, which the serde deserializer would otherwise trim.
    pub fn from_xml(xml: &str) -> crate::Result<Self> {
        let mut suite: TestSuiteResult = quick_xml::de::from_str(xml)?;
        let texts = DescriptionTexts::read(xml)?;

        if let (Some(description), Some(text)) = (suite.description.as_mut(), texts.suite) {
            description.value = text;
        }
        for (test_case, text) in suite.test_cases.items.iter_mut().zip(texts.test_cases) {
            if let (Some(description), Some(text)) = (test_case.description.as_mut(), text) {
                description.value = text;
            }
        }
        Ok(suite)
    }

    /// Serialize the suite to XML with a `test-suite` root element
    pub fn to_xml(&self) -> crate::Result<String> {
        let body = quick_xml::se::to_string_with_root(TEST_SUITE_ELEMENT, self)?;
        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
            body
        ))
    }

    /// Returns the number of test cases with the given status.
    pub fn count_status(&self, status: Status) -> usize {
        self.test_cases
            .iter()
            .filter(|c| c.status == status)
            .count()
    }
}

/// Untrimmed description texts of a suite document, in document order.
#[derive(Debug, Default)]
struct DescriptionTexts {
    suite: Option<String>,
    /// One entry per `<test-case>` element
    test_cases: Vec<Option<String>>,
}

impl DescriptionTexts {
    fn read(xml: &str) -> crate::Result<Self> {
        use quick_xml::events::Event;

        let invalid = |e: quick_xml::Error| crate::Error::InvalidFormat(e.to_string());
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut texts = DescriptionTexts::default();
        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut text: Option<String> = None;

        loop {
            match reader.read_event().map_err(invalid)? {
                Event::Start(e) => {
                    path.push(e.local_name().as_ref().to_vec());
                    if is_path(&path, &["test-cases", "test-case"]) {
                        texts.test_cases.push(None);
                    } else if is_path(&path, &["description"])
                        || is_path(&path, &["test-cases", "test-case", "description"])
                    {
                        text = Some(String::new());
                    }
                }
                Event::Empty(e) => {
                    let mut empty = path.clone();
                    empty.push(e.local_name().as_ref().to_vec());
                    if is_path(&empty, &["test-cases", "test-case"]) {
                        texts.test_cases.push(None);
                    }
                }
                Event::Text(t) => {
                    if let Some(ref mut text) = text {
                        text.push_str(&t.unescape().map_err(invalid)?);
                    }
                }
                Event::CData(c) => {
                    if let Some(ref mut text) = text {
                        text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::End(_) => {
                    if is_path(&path, &["description"]) {
                        texts.suite = text.take();
                    } else if is_path(&path, &["test-cases", "test-case", "description"]) {
                        if let Some(case) = texts.test_cases.last_mut() {
                            *case = text.take();
                        }
                    }
                    path.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(texts)
    }
}

/// True when `path` is `<root>` followed by exactly `below`.
fn is_path(path: &[Vec<u8>], below: &[&str]) -> bool {
    path.len() == below.len() + 1
        && path[1..]
            .iter()
            .zip(below)
            .all(|(name, expected)| name.as_slice() == expected.as_bytes())
}

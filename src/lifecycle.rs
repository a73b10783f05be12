//! Writing results: the side a test runner adaptor uses
//!
//! An adaptor reports suite, test case and step events to an
//! [`AllureLifecycle`], which builds the result model in memory and writes
//! `<uid>-testsuite.xml` once the suite finishes. Attachments are written
//! immediately as `<uuid>-attachment[.ext]`.

use crate::error::{Error, Result};
use crate::model::{
    Attachment, Description, Failure, Label, Parameter, ParameterKind, Status, Step,
    TestCaseResult, TestSuiteResult,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Current time in epoch milliseconds
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// File extension used for an attachment of the given MIME type
pub fn attachment_extension(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "text/plain" => Some("txt"),
        "text/html" => Some("html"),
        "text/csv" => Some("csv"),
        "application/xml" | "text/xml" => Some("xml"),
        "application/json" => Some("json"),
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

struct RunningCase {
    suite_uid: String,
    result: TestCaseResult,
    steps: Vec<Step>,
}

pub struct AllureLifecycle {
    results_dir: PathBuf,
    suites: HashMap<String, TestSuiteResult>,
    current: Option<RunningCase>,
}

impl AllureLifecycle {
    /// Create a lifecycle writing into `results_dir`, creating it if needed
    pub fn new(results_dir: impl Into<PathBuf>) -> Result<Self> {
        let results_dir = results_dir.into();
        fs::create_dir_all(&results_dir)?;
        Ok(AllureLifecycle {
            results_dir,
            suites: HashMap::new(),
            current: None,
        })
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Start a suite, returning its uid
    pub fn start_suite(&mut self, name: impl Into<String>) -> String {
        let uid = Uuid::new_v4().to_string();
        let mut suite = TestSuiteResult::new(name);
        suite.start = now_millis();
        self.suites.insert(uid.clone(), suite);
        uid
    }

    /// Mutable access to a running suite, e.g. to set its title or labels
    pub fn suite_mut(&mut self, suite_uid: &str) -> Result<&mut TestSuiteResult> {
        self.suites
            .get_mut(suite_uid)
            .ok_or_else(|| Error::Lifecycle(format!("Unknown suite {}", suite_uid)))
    }

    pub fn start_case(&mut self, suite_uid: &str, name: impl Into<String>) -> Result<()> {
        if !self.suites.contains_key(suite_uid) {
            return Err(Error::Lifecycle(format!("Unknown suite {}", suite_uid)));
        }
        if let Some(ref running) = self.current {
            return Err(Error::Lifecycle(format!(
                "Test case {} is still running",
                running.result.name
            )));
        }

        let mut result = TestCaseResult::new(name, Status::Passed);
        result.start = now_millis();
        self.current = Some(RunningCase {
            suite_uid: suite_uid.to_string(),
            result,
            steps: Vec::new(),
        });
        Ok(())
    }

    fn running(&mut self) -> Result<&mut RunningCase> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::Lifecycle("No test case is running".to_string()))
    }

    pub fn add_label(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.running()?.result.labels.push(Label::new(name, value));
        Ok(())
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.running()?.result.parameters.push(Parameter {
            name: name.into(),
            value: value.into(),
            kind: ParameterKind::Argument,
        });
        Ok(())
    }

    pub fn set_description(&mut self, description: Description) -> Result<()> {
        self.running()?.result.description = Some(description);
        Ok(())
    }

    pub fn start_step(&mut self, name: impl Into<String>) -> Result<()> {
        let step = Step::new(name, now_millis(), 0, Status::Passed);
        self.running()?.steps.push(step);
        Ok(())
    }

    pub fn finish_step(&mut self, status: Status) -> Result<()> {
        let running = self.running()?;
        let mut step = running
            .steps
            .pop()
            .ok_or_else(|| Error::Lifecycle("No step is running".to_string()))?;
        step.stop = now_millis().max(step.start);
        step.status = status;

        match running.steps.last_mut() {
            Some(parent) => parent.steps.push(step),
            None => running.result.steps.push(step),
        }
        Ok(())
    }

    /// Write an attachment file and attach it to the running step or case.
    /// Returns the attachment file name.
    pub fn attach(&mut self, title: impl Into<String>, mime_type: &str, content: &[u8]) -> Result<String> {
        self.running()?;

        let source = match attachment_extension(mime_type) {
            Some(ext) => format!("{}-attachment.{}", Uuid::new_v4(), ext),
            None => format!("{}-attachment", Uuid::new_v4()),
        };
        fs::write(self.results_dir.join(&source), content)?;

        let attachment = Attachment {
            title: title.into(),
            source: source.clone(),
            mime_type: mime_type.to_string(),
            size: content.len() as u64,
        };
        let running = self.running()?;
        match running.steps.last_mut() {
            Some(step) => step.attachments.push(attachment),
            None => running.result.attachments.push(attachment),
        }
        Ok(source)
    }

    /// Finish the running test case. Steps left open are closed with the
    /// same status.
    pub fn finish_case(&mut self, status: Status, failure: Option<Failure>) -> Result<()> {
        while self.running()?.steps.last().is_some() {
            self.finish_step(status)?;
        }

        let RunningCase {
            suite_uid,
            mut result,
            ..
        } = self
            .current
            .take()
            .ok_or_else(|| Error::Lifecycle("No test case is running".to_string()))?;
        result.stop = now_millis().max(result.start);
        result.status = status;
        result.failure = failure;

        self.suite_mut(&suite_uid)?.add_test_case(result);
        Ok(())
    }

    /// Finish a suite and write its result file, returning the file path.
    /// Fails while a test case of that suite is still running.
    pub fn finish_suite(&mut self, suite_uid: &str) -> Result<PathBuf> {
        if let Some(ref running) = self.current {
            if running.suite_uid == suite_uid {
                return Err(Error::Lifecycle(format!(
                    "Test case {} of suite {} is still running",
                    running.result.name, suite_uid
                )));
            }
        }

        let mut suite = self
            .suites
            .remove(suite_uid)
            .ok_or_else(|| Error::Lifecycle(format!("Unknown suite {}", suite_uid)))?;
        suite.stop = now_millis().max(suite.start);

        let path = self.results_dir.join(format!("{}-testsuite.xml", suite_uid));
        fs::write(&path, suite.to_xml()?)?;
        debug!(file = %path.display(), cases = suite.test_cases.len(), "wrote test suite");
        Ok(path)
    }
}

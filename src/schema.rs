//! Structural validation of suite result files
//!
//! A suite file is valid when its root element is `test-suite` in the
//! Allure model namespace, it deserializes into [`TestSuiteResult`] (all
//! required attributes present and well typed, statuses known) and it
//! satisfies the constraints of the result schema checked below.

use crate::error::{Error, Result};
use crate::model::{Attachment, Label, Step, TestSuiteResult, ALLURE_NAMESPACE, TEST_SUITE_ELEMENT};
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        SchemaValidator
    }

    /// Validate a suite file on disk
    pub fn validate_file(&self, path: &Path) -> Result<TestSuiteResult> {
        let contents = fs::read_to_string(path)?;
        self.validate(&contents, path)
    }

    /// Validate an in-memory suite document
    pub fn validate_str(&self, xml: &str) -> Result<TestSuiteResult> {
        self.validate(xml, Path::new("<memory>"))
    }

    fn validate(&self, xml: &str, file: &Path) -> Result<TestSuiteResult> {
        let fail = |message: String| Error::Validation {
            file: PathBuf::from(file),
            message,
        };

        check_root(xml).map_err(fail)?;
        let suite = TestSuiteResult::from_xml(xml).map_err(|e| fail(e.to_string()))?;
        check_suite(&suite).map_err(fail)?;
        Ok(suite)
    }
}

fn check_root(xml: &str) -> std::result::Result<(), String> {
    let mut reader = NsReader::from_str(xml);
    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) | Ok((ns, Event::Empty(e))) => {
                let local_name = e.local_name();
                if local_name.as_ref() != TEST_SUITE_ELEMENT.as_bytes() {
                    return Err(format!(
                        "root element is <{}>, expected <{}>",
                        String::from_utf8_lossy(local_name.as_ref()),
                        TEST_SUITE_ELEMENT
                    ));
                }
                return match ns {
                    ResolveResult::Bound(ns) if ns.as_ref() == ALLURE_NAMESPACE.as_bytes() => {
                        Ok(())
                    }
                    _ => Err(format!(
                        "root element is not in namespace {}",
                        ALLURE_NAMESPACE
                    )),
                };
            }
            Ok((_, Event::Eof)) => return Err("document has no root element".to_string()),
            Ok(_) => continue,
            Err(e) => return Err(format!("malformed XML: {}", e)),
        }
    }
}

fn check_suite(suite: &TestSuiteResult) -> std::result::Result<(), String> {
    if suite.name.trim().is_empty() {
        return Err("test-suite has an empty name".to_string());
    }
    check_time("test-suite", &suite.name, suite.start, suite.stop)?;
    check_labels(&suite.name, suite.labels.iter())?;

    for test_case in &suite.test_cases {
        if test_case.name.trim().is_empty() {
            return Err(format!("test-case in suite {} has an empty name", suite.name));
        }
        check_time("test-case", &test_case.name, test_case.start, test_case.stop)?;
        check_labels(&test_case.name, test_case.labels.iter())?;
        check_attachments(&test_case.name, test_case.attachments.iter())?;
        for step in &test_case.steps {
            check_step(step)?;
        }
    }

    Ok(())
}

fn check_step(step: &Step) -> std::result::Result<(), String> {
    if step.name.trim().is_empty() {
        return Err("step has an empty name".to_string());
    }
    check_time("step", &step.name, step.start, step.stop)?;
    check_attachments(&step.name, step.attachments.iter())?;
    for nested in &step.steps {
        check_step(nested)?;
    }
    Ok(())
}

fn check_time(element: &str, name: &str, start: u64, stop: u64) -> std::result::Result<(), String> {
    if stop < start {
        return Err(format!(
            "{} {} stops ({}) before it starts ({})",
            element, name, stop, start
        ));
    }
    Ok(())
}

fn check_labels<'a>(
    owner: &str,
    labels: impl Iterator<Item = &'a Label>,
) -> std::result::Result<(), String> {
    for label in labels {
        if label.name.trim().is_empty() {
            return Err(format!("{} has a label with an empty name", owner));
        }
    }
    Ok(())
}

fn check_attachments<'a>(
    owner: &str,
    attachments: impl Iterator<Item = &'a Attachment>,
) -> std::result::Result<(), String> {
    for attachment in attachments {
        if attachment.source.trim().is_empty() {
            return Err(format!(
                "{} has attachment '{}' without a source",
                owner, attachment.title
            ));
        }
    }
    Ok(())
}

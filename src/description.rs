//! Merging of suite and test case descriptions
//!
//! A test case shown in the report carries the description of its suite
//! followed by its own description.

use crate::model::{Description, DescriptionType, TestCaseResult, TestSuiteResult};

/// Merge the descriptions of a suite and one of its test cases.
pub fn merge_result_descriptions(
    suite: &TestSuiteResult,
    test_case: &TestCaseResult,
) -> Option<Description> {
    merge_descriptions(suite.description.as_ref(), test_case.description.as_ref())
}

/// Merge a suite description with a test case description.
///
/// - If either side is absent the other one is returned unchanged.
/// - The merged type is markdown when the suite description is markdown,
///   otherwise the test case type.
/// - Texts are joined with a blank line for markdown and a single line
///   break otherwise.
/// - A suite description with empty text contributes nothing, so the test
///   case description is returned unchanged.
///
/// # Examples
///
/// ```
/// use allure_report_data::description::merge_descriptions;
/// use allure_report_data::model::{Description, DescriptionType};
///
/// let suite = Description::markdown("# Login");
/// let case = Description::text("valid password");
///
/// let merged = merge_descriptions(Some(&suite), Some(&case)).unwrap();
/// assert_eq!(merged.kind, DescriptionType::Markdown);
/// assert_eq!(merged.value, "# Login\n\nvalid password");
/// ```
pub fn merge_descriptions(
    suite: Option<&Description>,
    test_case: Option<&Description>,
) -> Option<Description> {
    let (suite, test_case) = match (suite, test_case) {
        (None, test_case) => return test_case.cloned(),
        (suite, None) => return suite.cloned(),
        (Some(suite), Some(test_case)) => (suite, test_case),
    };

    if suite.value.is_empty() {
        return Some(test_case.clone());
    }

    let kind = merged_type(suite.kind, test_case.kind);
    let separator = if kind == DescriptionType::Markdown {
        "\n\n"
    } else {
        "\n"
    };

    Some(Description {
        kind,
        value: format!("{}{}{}", suite.value, separator, test_case.value),
    })
}

fn merged_type(suite: DescriptionType, test_case: DescriptionType) -> DescriptionType {
    if suite == DescriptionType::Markdown {
        DescriptionType::Markdown
    } else {
        test_case
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_suite_returns_case() {
        let case = Description::text("case");
        assert_eq!(merge_descriptions(None, Some(&case)), Some(case));
    }

    #[test]
    fn test_absent_case_returns_suite() {
        let suite = Description::markdown("suite");
        assert_eq!(merge_descriptions(Some(&suite), None), Some(suite));
    }

    #[test]
    fn test_both_absent() {
        assert_eq!(merge_descriptions(None, None), None);
    }

    #[test]
    fn test_markdown_suite_plain_case() {
        let suite = Description::markdown("suite");
        let case = Description::text("case");
        let merged = merge_descriptions(Some(&suite), Some(&case)).unwrap();
        assert_eq!(merged.kind, DescriptionType::Markdown);
        assert_eq!(merged.value, "suite\n\ncase");
    }

    #[test]
    fn test_plain_suite_plain_case() {
        let suite = Description::text("suite");
        let case = Description::text("case");
        let merged = merge_descriptions(Some(&suite), Some(&case)).unwrap();
        assert_eq!(merged.kind, DescriptionType::Text);
        assert_eq!(merged.value, "suite\ncase");
    }

    #[test]
    fn test_plain_suite_markdown_case() {
        let suite = Description::text("suite");
        let case = Description::markdown("case");
        let merged = merge_descriptions(Some(&suite), Some(&case)).unwrap();
        assert_eq!(merged.kind, DescriptionType::Markdown);
        assert_eq!(merged.value, "suite\n\ncase");
    }

    #[test]
    fn test_plain_suite_html_case_takes_case_type() {
        let suite = Description::text("suite");
        let case = Description::new(DescriptionType::Html, "<b>case</b>");
        let merged = merge_descriptions(Some(&suite), Some(&case)).unwrap();
        assert_eq!(merged.kind, DescriptionType::Html);
        assert_eq!(merged.value, "suite\n<b>case</b>");
    }

    #[test]
    fn test_empty_suite_text_returns_case() {
        let suite = Description::markdown("");
        let case = Description::text("case");
        assert_eq!(merge_descriptions(Some(&suite), Some(&case)), Some(case));
    }

    #[test]
    fn test_merge_result_descriptions() {
        let suite = TestSuiteResult::new("suite").with_description(Description::markdown("s"));
        let case = TestCaseResult::passed("case").with_description(Description::text("c"));
        let merged = merge_result_descriptions(&suite, &case).unwrap();
        assert_eq!(merged.value, "s\n\nc");

        let bare_case = TestCaseResult::passed("bare");
        assert_eq!(
            merge_result_descriptions(&suite, &bare_case),
            Some(Description::markdown("s"))
        );
    }
}

//! Error types for allure-report-data

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report data operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for allure-report-data
#[derive(Error, Debug)]
pub enum Error {
    /// Results directory was not found at the specified path.
    #[error("Results directory not found at {0}")]
    ResultsDirectoryNotFound(PathBuf),

    /// A result file has an invalid or unsupported format.
    #[error("Invalid result format: {0}")]
    InvalidFormat(String),

    /// A suite file does not conform to the Allure result model.
    #[error("Validation failed for {}: {message}", file.display())]
    Validation { file: PathBuf, message: String },

    /// Configuration file error or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Result writing events arrived out of order.
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// A plugin could not be loaded or failed while running.
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// Failed to deserialize an XML result file.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// Failed to serialize an XML result file.
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::se::SeError),

    /// Failed to write report data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Other error with custom message.
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ResultsDirectoryNotFound(PathBuf::from("/tmp/results"));
        assert_eq!(err.to_string(), "Results directory not found at /tmp/results");
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::Validation {
            file: PathBuf::from("a-testsuite.xml"),
            message: "missing name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Validation failed for a-testsuite.xml: missing name"
        );
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "custom error".into();
        assert_eq!(err.to_string(), "custom error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

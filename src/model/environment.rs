//! Environment and attachment metadata found next to suite files

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment the tests ran in, read from `environment.xml` or
/// `environment.properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "parameter", default)]
    pub parameters: Vec<EnvironmentParameter>,
}

impl Environment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Environment {
            id: id.into(),
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.parameters.push(EnvironmentParameter {
            name: key.clone(),
            key,
            value: value.into(),
        });
    }

    /// Looks up a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentParameter {
    #[serde(default)]
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// An attachment file found in a results directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentInfo {
    /// File name, as referenced by the `source` attribute of an attachment.
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

//! Component wiring
//!
//! [`AllureModule`] owns the immutable configuration of a report build and
//! hands out the concrete reader, converter and plugin implementations
//! behind their traits. It is assembled once at startup; a bad
//! configuration is rejected here rather than halfway through a build.

use crate::config::ReportConfig;
use crate::converters::{DefaultTestCaseConverter, LinkPatterns, TestCaseConverter};
use crate::error::{Error, Result};
use crate::io::{
    AttachmentReader, EnvironmentReader, FilePatterns, Reader, ResultDirectories,
    TestCaseReader, TestSuiteReader,
};
use crate::model::{AttachmentInfo, Environment, TestCaseResult, TestSuiteResult};
use crate::plugins::{PluginLoader, PluginManager, PluginRegistry, RegistryPluginLoader};

#[derive(Debug, Clone)]
pub struct AllureModule {
    directories: ResultDirectories,
    patterns: FilePatterns,
    registry: PluginRegistry,
    enabled_plugins: Option<Vec<String>>,
    links: LinkPatterns,
}

impl AllureModule {
    /// Wire a module reading from `directories` with plugins from `registry`.
    pub fn new(registry: PluginRegistry, directories: ResultDirectories) -> Result<Self> {
        if directories.is_empty() {
            return Err(Error::Config(
                "At least one results directory is required".to_string(),
            ));
        }

        Ok(AllureModule {
            directories,
            patterns: FilePatterns::standard(),
            registry,
            enabled_plugins: None,
            links: LinkPatterns::default(),
        })
    }

    /// Wire a module from a loaded configuration
    pub fn from_config(registry: PluginRegistry, config: &ReportConfig) -> Result<Self> {
        let mut module = AllureModule::new(
            registry,
            ResultDirectories::new(config.results_directories.iter()),
        )?;
        module.patterns = FilePatterns::new(
            &config.test_suite_file_pattern,
            &config.attachment_file_pattern,
        )?;
        if let Some(ref plugins) = config.plugins {
            if let Some(unknown) = plugins.iter().find(|name| !module.registry.contains(name)) {
                return Err(Error::Plugin(format!("Unknown plugin '{}'", unknown)));
            }
        }
        module.enabled_plugins = config.plugins.clone();
        module.links = config.links.clone();
        Ok(module)
    }

    pub fn with_enabled_plugins(mut self, plugins: Vec<String>) -> Self {
        self.enabled_plugins = Some(plugins);
        self
    }

    pub fn with_links(mut self, links: LinkPatterns) -> Self {
        self.links = links;
        self
    }

    pub fn result_directories(&self) -> &ResultDirectories {
        &self.directories
    }

    pub fn file_patterns(&self) -> &FilePatterns {
        &self.patterns
    }

    pub fn test_suite_reader(&self) -> Box<dyn Reader<TestSuiteResult>> {
        Box::new(TestSuiteReader::new(
            self.directories.clone(),
            self.patterns.clone(),
        ))
    }

    pub fn test_case_reader(&self) -> Box<dyn Reader<TestCaseResult>> {
        Box::new(TestCaseReader::new(self.test_suite_reader()))
    }

    pub fn environment_reader(&self) -> Box<dyn Reader<Environment>> {
        Box::new(EnvironmentReader::new(self.directories.clone()))
    }

    pub fn attachment_reader(&self) -> Box<dyn Reader<AttachmentInfo>> {
        Box::new(AttachmentReader::new(
            self.directories.clone(),
            self.patterns.clone(),
        ))
    }

    pub fn plugin_loader(&self) -> Box<dyn PluginLoader> {
        Box::new(RegistryPluginLoader::new(
            self.registry.clone(),
            self.enabled_plugins.clone(),
        ))
    }

    pub fn plugin_manager(&self) -> PluginManager {
        PluginManager::new(self.plugin_loader().as_ref())
    }

    pub fn test_case_converter(&self) -> Box<dyn TestCaseConverter> {
        Box::new(DefaultTestCaseConverter::new(self.links.clone()))
    }
}

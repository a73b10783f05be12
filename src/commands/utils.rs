//! Utility functions for command implementation

use crate::config::ReportConfig;
use crate::error::Result;
use crate::module::AllureModule;
use crate::plugins::PluginRegistry;
use std::path::{Path, PathBuf};

/// The working directory of a command (or current directory if None)
pub fn base_directory(base_path: Option<&str>) -> &Path {
    base_path.map(Path::new).unwrap_or_else(|| Path::new("."))
}

/// Load `.allure.conf` from the working directory.
///
/// Relative paths in the file are resolved against the working directory.
/// Results directories given on the command line replace the configured ones.
pub fn load_config(base_path: Option<&str>, results: &[String]) -> Result<ReportConfig> {
    let base = base_directory(base_path);
    let mut config = ReportConfig::load_from_directory(base)?;

    config.results_directories = config
        .results_directories
        .iter()
        .map(|dir| resolve(base, dir))
        .collect();
    config.report_directory = resolve(base, &config.report_directory);

    Ok(config.with_results_directories(results.iter().map(PathBuf::from).collect()))
}

/// Wire a module with the built-in plugins
pub fn build_module(config: &ReportConfig) -> Result<AllureModule> {
    AllureModule::from_config(PluginRegistry::builtin(), config)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

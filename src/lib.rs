//! allure-report-data - Reading Allure test results and building report data
//!
//! Test runner adaptors write one `<uid>-testsuite.xml` file per suite,
//! plus attachments and optional environment files, into a results
//! directory. This crate reads those directories, merges suite and test
//! case information, runs the results through plugins and writes the JSON
//! data a report front end renders.
//!
//! # Architecture
//!
//! - [`model`]: the XML result model (suites, test cases, steps, attachments)
//! - [`description`]: merging suite and test case descriptions
//! - [`io`]: readers for suites, test cases, environments and attachments
//! - [`converters`]: test case results to report test cases
//! - [`plugins`]: plugin registry, loader and manager plus built-in plugins
//! - [`module`]: wiring of readers, converter and plugins for a build
//! - [`report`]: report data generation
//! - [`lifecycle`] and [`adaptor`]: the writing side used by test runners
//! - [`schema`]: validation of suite result files
//! - [`config`]: `.allure.conf` configuration file parsing
//! - [`commands`] and [`ui`]: the `allure-data` command line tool
//! - [`error`]: Error types and Result alias
//!
//! # Example
//!
//! ```no_run
//! use allure_report_data::io::ResultDirectories;
//! use allure_report_data::module::AllureModule;
//! use allure_report_data::plugins::PluginRegistry;
//! use allure_report_data::report::ReportGenerator;
//! use std::path::Path;
//!
//! # fn main() -> allure_report_data::Result<()> {
//! let module = AllureModule::new(
//!     PluginRegistry::builtin(),
//!     ResultDirectories::new(vec!["target/allure-results"]),
//! )?;
//!
//! let summary = ReportGenerator::new(&module).generate(Path::new("allure-report"))?;
//! println!("{} test cases, {} failed", summary.test_cases, summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod adaptor;
pub mod commands;
pub mod config;
pub mod converters;
pub mod description;
pub mod error;
pub mod io;
pub mod lifecycle;
pub mod model;
pub mod module;
pub mod plugins;
pub mod report;
pub mod schema;
pub mod ui;

pub use error::{Error, Result};

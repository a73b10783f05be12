//! Commands of the allure-data tool
//!
//! Commands are executed through the Command trait.

use crate::error::Result;
use crate::ui::UI;

pub mod clean;
pub mod generate;
pub mod stats;
pub mod validate;
mod utils;

pub use clean::CleanCommand;
pub use generate::GenerateCommand;
pub use stats::StatsCommand;
pub use validate::ValidateCommand;

/// Trait that all commands must implement
pub trait Command {
    /// Execute the command, returning the process exit code
    fn execute(&self, ui: &mut dyn UI) -> Result<i32>;

    /// Get the command name
    fn name(&self) -> &str;

    /// Get command help text
    fn help(&self) -> &str;
}

//! Remove a results or report directory with everything in it

use crate::commands::Command;
use crate::error::{Error, Result};
use crate::io::delete_not_empty_directory;
use crate::ui::UI;
use std::path::PathBuf;

pub struct CleanCommand {
    directory: PathBuf,
}

impl CleanCommand {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        CleanCommand {
            directory: directory.into(),
        }
    }
}

impl Command for CleanCommand {
    fn execute(&self, ui: &mut dyn UI) -> Result<i32> {
        if !self.directory.is_dir() {
            return Err(Error::ResultsDirectoryNotFound(self.directory.clone()));
        }

        delete_not_empty_directory(&self.directory)?;
        ui.output(&format!("Removed {}", self.directory.display()))?;
        Ok(0)
    }

    fn name(&self) -> &str {
        "clean"
    }

    fn help(&self) -> &str {
        "Remove a results or report directory"
    }
}

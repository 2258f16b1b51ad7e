//! The external text editor used for file-edit parameters.

use std::path::Path;
use std::process::Command;

use crate::error::{EngineError, EngineResult};

/// Something that lets the player edit a file and blocks until done.
pub trait Editor {
    /// Name shown to the player.
    fn program(&self) -> &str;

    /// Edit `path` in place.
    fn edit(&self, path: &Path) -> EngineResult<()>;
}

/// Runs an editor program with the file path as its only argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEditor {
    program: String,
}

impl SystemEditor {
    /// Use `program`, e.g. `"nano"` or the value of `$EDITOR`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Editor for SystemEditor {
    fn program(&self) -> &str {
        &self.program
    }

    fn edit(&self, path: &Path) -> EngineResult<()> {
        match Command::new(&self.program).arg(path).status() {
            Ok(s) if s.success() => Ok(()),
            Ok(s) => Err(EngineError::EditorFailed {
                program: self.program.clone(),
                status: s.to_string(),
            }),
            Err(source) => Err(EngineError::EditorLaunch {
                program: self.program.clone(),
                source,
            }),
        }
    }
}

//! Error types for the session engine.

use std::path::PathBuf;

use sz_core::{SzError, TransitionError};
use thiserror::Error;

use crate::roles::RoleSetupError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input reached end-of-file while waiting for the player.
    #[error("input closed")]
    InputClosed,

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Undo was requested at the initial state.
    #[error("already at the initial state; cannot go further back")]
    AlreadyAtStart,

    /// The external editor could not be started.
    #[error("could not launch editor '{program}': {source}")]
    EditorLaunch {
        /// The editor program.
        program: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The external editor exited unsuccessfully.
    #[error("editor '{program}' exited with {status}")]
    EditorFailed {
        /// The editor program.
        program: String,
        /// Exit status description.
        status: String,
    },

    /// Seeding or reading an externally-edited file failed.
    #[error("could not access '{}': {source}", path.display())]
    EditedFile {
        /// The file being edited.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// Creating the per-session folder failed.
    #[error("could not create session folder '{}': {source}", path.display())]
    SessionFolder {
        /// The folder that could not be created.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// A parameter's bounds admit no value, so it cannot be asked for.
    #[error("parameter '{param}' of \"{operator}\" cannot be entered: {reason}")]
    UnsatisfiableParam {
        /// The operator being applied.
        operator: String,
        /// The parameter name.
        param: String,
        /// What is wrong with the bounds.
        reason: String,
    },

    /// An operator's transition function failed.
    #[error("operator failed: {0}")]
    Transition(#[from] TransitionError),

    /// The role assignment cannot start a session.
    #[error(transparent)]
    RoleSetup(#[from] RoleSetupError),

    /// The formulation violated its contract.
    #[error(transparent)]
    Formulation(#[from] SzError),
}

impl EngineError {
    /// Whether the error aborts only the current operator attempt.
    ///
    /// Recoverable errors are reported to the player, the history is left
    /// untouched, and play returns to the main menu.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EditorLaunch { .. }
                | Self::EditorFailed { .. }
                | Self::EditedFile { .. }
                | Self::UnsatisfiableParam { .. }
                | Self::Transition(_)
                | Self::AlreadyAtStart
        )
    }
}

//! Configuration for a play session.

use std::path::PathBuf;

/// Editor used when `$EDITOR` is unset or empty.
pub const DEFAULT_EDITOR: &str = "nano";

/// Root directory for per-session working folders.
pub const DEFAULT_DOCS_ROOT: &str = "play-time-dynamic-docs";

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Where session folders are created.
    pub docs_root: PathBuf,
    /// Program used to edit externally-edited parameters.
    pub editor: String,
    /// Players declared before role assignment, in order.
    pub players: Vec<String>,
    /// Print the command instructions before the first cycle.
    pub show_instructions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from(DEFAULT_DOCS_ROOT),
            editor: DEFAULT_EDITOR.to_string(),
            players: Vec::new(),
            show_instructions: true,
        }
    }
}

impl EngineConfig {
    /// Default configuration with the editor taken from `$EDITOR`.
    pub fn from_env() -> Self {
        Self::default().with_editor_override(std::env::var("EDITOR").ok())
    }

    /// Use `editor` if it is set and non-empty, keeping the current editor
    /// otherwise.
    pub fn with_editor_override(mut self, editor: Option<String>) -> Self {
        if let Some(program) = editor.filter(|p| !p.trim().is_empty()) {
            self.editor = program;
        }
        self
    }

    /// Set the editor program.
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = editor.into();
        self
    }

    /// Set the session folder root.
    pub fn with_docs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.docs_root = root.into();
        self
    }

    /// Declare players ahead of role assignment.
    pub fn with_players(mut self, players: Vec<String>) -> Self {
        self.players = players;
        self
    }

    /// Skip the instructions printed at session start.
    pub fn without_instructions(mut self) -> Self {
        self.show_instructions = false;
        self
    }
}

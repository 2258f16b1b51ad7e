use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SzResult;
use crate::operator::OperatorSet;
use crate::role::RoleSpec;
use crate::state::State;

/// Descriptive information about a formulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Display name, also used to name session folders.
    pub name: String,
    /// Version of the formulation.
    pub version: String,
    /// Authors.
    pub authors: Vec<String>,
    /// When the formulation was written.
    pub created: String,
    /// A brief description shown at load time.
    pub description: String,
}

impl Metadata {
    /// Create metadata with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0".to_string(),
            authors: Vec::new(),
            created: String::new(),
            description: String::new(),
        }
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Add an author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Set the creation date.
    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = created.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Configuration handed to [`Formulation::initialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemConfig {
    /// Per-session working directory, present only when the engine detected
    /// externally-edited parameters.
    pub session_folder: Option<PathBuf>,
}

impl ProblemConfig {
    /// Config with a session folder.
    pub fn with_session_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            session_folder: Some(folder.into()),
        }
    }

    /// The session folder, if any.
    pub fn session_folder(&self) -> Option<&Path> {
        self.session_folder.as_deref()
    }
}

/// A ready-to-play problem instance: the initial state and its operators.
#[derive(Debug)]
pub struct Problem<S> {
    /// The state at history index 0.
    pub initial: S,
    /// Every operator of this instance.
    pub operators: OperatorSet<S>,
}

impl<S> Problem<S> {
    /// Bundle an initial state with its operators.
    pub fn new(initial: S, operators: OperatorSet<S>) -> Self {
        Self { initial, operators }
    }
}

/// A pluggable game or puzzle definition.
pub trait Formulation {
    /// The state type of this formulation.
    type State: State;

    /// Descriptive metadata.
    fn metadata(&self) -> &Metadata;

    /// Roles and participation constraints; a single player by default.
    fn roles(&self) -> RoleSpec {
        RoleSpec::single_player()
    }

    /// Build a fresh problem instance.
    ///
    /// May be called more than once per session: once without a session
    /// folder to inspect the operators, and again with one if any operator
    /// needs the external editor.
    fn initialize(&self, config: &ProblemConfig) -> SzResult<Problem<Self::State>>;
}

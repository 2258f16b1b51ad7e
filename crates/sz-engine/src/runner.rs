//! Loading a formulation and playing it from start to finish.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::info;

use sz_core::{Formulation, Metadata, Problem, ProblemConfig, RoleSpec};

use crate::config::EngineConfig;
use crate::console::Console;
use crate::editor::Editor;
use crate::error::{EngineError, EngineResult};
use crate::folder::create_session_folder;
use crate::roles::assign_roles;
use crate::sequencer::TurnSequencer;
use crate::session::{INSTRUCTIONS, QuitReason, Session, SessionOutcome};

/// Build the problem instance, creating a session folder only when some
/// operator edits files.
///
/// The formulation is initialized once without a folder to inspect its
/// operators. If any fixed parameter list has a file-edit parameter, a
/// session folder is created under `docs_root` and the formulation is
/// initialized again with it.
pub fn prepare_problem<F: Formulation>(
    formulation: &F,
    docs_root: &Path,
    now: NaiveDateTime,
) -> EngineResult<(Problem<F::State>, Option<PathBuf>)> {
    let dry = formulation.initialize(&ProblemConfig::default())?;
    if !dry.operators.has_file_edit_params() {
        return Ok((dry, None));
    }
    let folder = create_session_folder(docs_root, &formulation.metadata().name, now)?;
    let problem = formulation.initialize(&ProblemConfig::with_session_folder(&folder))?;
    Ok((problem, Some(folder)))
}

/// Run a whole session: metadata, role assignment, setup, and play.
pub fn play_formulation<F: Formulation>(
    formulation: &F,
    console: &mut dyn Console,
    editor: &dyn Editor,
    config: &EngineConfig,
) -> EngineResult<SessionOutcome> {
    let metadata = formulation.metadata();
    console.line(&format!(
        "\nFormulation: {}  (version {})",
        metadata.name, metadata.version
    ))?;
    if !metadata.description.is_empty() {
        console.line(&format!("Description: {}", metadata.description))?;
    }

    let spec = formulation.roles();
    spec.validate()?;
    let assignment = match assign_roles(console, &spec, &config.players) {
        Ok(assignment) => assignment,
        Err(EngineError::InputClosed) => {
            return Ok(SessionOutcome {
                reason: QuitReason::InputClosed,
                steps: 0,
                depth: 0,
                goal_reached: false,
            });
        }
        Err(e) => return Err(e),
    };
    console.line("\nRole assignments confirmed.")?;

    console.line(&format!("\nInitializing {} ...", metadata.name))?;
    let (problem, folder) =
        prepare_problem(formulation, &config.docs_root, Local::now().naive_local())?;
    if let Some(folder) = &folder {
        console.line(&format!("Session folder: {}", folder.display()))?;
    }

    if config.show_instructions {
        console.line(INSTRUCTIONS)?;
    }
    let mut session = Session::new(problem, TurnSequencer::new(spec, assignment));
    let outcome = session.run(console, editor)?;
    info!(
        name = %metadata.name,
        steps = outcome.steps,
        depth = outcome.depth,
        goal = outcome.goal_reached,
        "session finished"
    );
    console.line("\nSession finished.  Goodbye!")?;
    Ok(outcome)
}

/// A formulation with its state type erased, so different games can share
/// one catalog.
pub trait Playable {
    /// The formulation's metadata.
    fn summary(&self) -> &Metadata;

    /// The formulation's roles.
    fn role_spec(&self) -> RoleSpec;

    /// Play one session.
    fn play(
        &self,
        console: &mut dyn Console,
        editor: &dyn Editor,
        config: &EngineConfig,
    ) -> EngineResult<SessionOutcome>;
}

impl<F: Formulation> Playable for F {
    fn summary(&self) -> &Metadata {
        self.metadata()
    }

    fn role_spec(&self) -> RoleSpec {
        self.roles()
    }

    fn play(
        &self,
        console: &mut dyn Console,
        editor: &dyn Editor,
        config: &EngineConfig,
    ) -> EngineResult<SessionOutcome> {
        play_formulation(self, console, editor, config)
    }
}

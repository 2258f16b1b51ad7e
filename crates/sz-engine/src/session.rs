//! The interactive session loop.
//!
//! A [`Session`] owns the operators, the history, and the turn sequencer of
//! one play-through. Each cycle shows the state to the acting role, reads a
//! command, and either applies an operator, undoes a move, shows help, or
//! ends the session.

use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info, warn};

use sz_core::{OperatorSet, Problem, State};

use crate::console::{Console, framed};
use crate::editor::Editor;
use crate::error::{EngineError, EngineResult};
use crate::history::History;
use crate::params::collect_args;
use crate::resolver::{Command, Menu};
use crate::sequencer::{Cue, TurnSequencer};

/// Shown at session start and on `H`.
pub const INSTRUCTIONS: &str = "
INSTRUCTIONS:
  <number>  Apply the operator with that number.
  B         Go back one step (undo last move).
  H         Show these instructions.
  Q         Quit the session.

The current state of the game or puzzle is shown at each step.
Operators that are applicable in the current state are listed by number.
";

const COMMAND_PROMPT: &str = "Command  [number / B=back / H=help / Q=quit] >> ";

/// Where the session loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Cycling through display and commands.
    Playing,
    /// A goal was just reached; waiting for continue-or-quit.
    GoalReached,
    /// The session has ended.
    Quit,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuitReason {
    /// The player entered `Q`.
    UserQuit,
    /// Input ran out.
    InputClosed,
    /// The player chose not to keep exploring after a goal.
    GoalDeclined,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    /// Why the session ended.
    pub reason: QuitReason,
    /// Moves applied plus moves undone.
    pub steps: usize,
    /// History depth at the end.
    pub depth: usize,
    /// Whether any goal state was reached.
    pub goal_reached: bool,
}

/// One play-through of a problem.
pub struct Session<S: State> {
    operators: OperatorSet<S>,
    history: History<S>,
    sequencer: TurnSequencer,
    phase: SessionPhase,
    step: usize,
    goal_reached: bool,
}

impl<S: State> Session<S> {
    /// Start a session at the problem's initial state.
    pub fn new(problem: Problem<S>, sequencer: TurnSequencer) -> Self {
        Self {
            operators: problem.operators,
            history: History::new(problem.initial),
            sequencer,
            phase: SessionPhase::Playing,
            step: 0,
            goal_reached: false,
        }
    }

    /// The current state.
    pub fn current(&self) -> &S {
        self.history.current()
    }

    /// The undo history.
    pub fn history(&self) -> &History<S> {
        &self.history
    }

    /// Moves applied plus moves undone so far.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Play until the session ends.
    ///
    /// End of input ends the session like `Q` does.
    pub fn run(
        &mut self,
        console: &mut dyn Console,
        editor: &dyn Editor,
    ) -> EngineResult<SessionOutcome> {
        loop {
            match self.cycle(console, editor) {
                Ok(Some(reason)) => return Ok(self.finish(reason)),
                Ok(None) => {}
                Err(EngineError::InputClosed) => {
                    info!("input closed, ending session");
                    return Ok(self.finish(QuitReason::InputClosed));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run one display-and-command cycle, returning a reason if the session
    /// ended.
    pub fn cycle(
        &mut self,
        console: &mut dyn Console,
        editor: &dyn Editor,
    ) -> EngineResult<Option<QuitReason>> {
        let state = self.history.current().clone();
        console.line(&format!(
            "\nStep {}, Depth {}",
            self.step,
            self.history.depth()
        ))?;

        if state.is_parallel() {
            console.line("*** PARALLEL INPUT PHASE: each player chooses independently. ***")?;
            console.line("*** Please look away from the screen until it is your turn.  ***")?;
        }

        let role = self.sequencer.acting_role(&state, &self.operators);
        let cue = if self.sequencer.is_multi_role() {
            self.sequencer.cue(role)
        } else {
            Cue::None
        };
        if let Some(text) = cue.render() {
            console.line(&text.bold().to_string())?;
            console.prompt("  Press Enter to confirm. ")?;
        }

        let view = state
            .view_for_role(role)
            .unwrap_or_else(|| state.to_string());
        console.line(&view)?;

        let menu = Menu::build(&self.operators, &state, role);
        if menu.is_empty() {
            console.line("  (No operators are currently applicable.)")?;
        }
        for line in menu.lines() {
            console.line(&line)?;
        }

        let input = console.prompt(COMMAND_PROMPT)?;
        match Command::parse(&input) {
            None => Ok(None),
            Some(Command::Quit) => Ok(Some(QuitReason::UserQuit)),
            Some(Command::Help) => {
                console.line(INSTRUCTIONS)?;
                let details: Vec<String> = menu.details().collect();
                if !details.is_empty() {
                    console.line("OPERATORS:")?;
                    for line in details {
                        console.line(&line)?;
                    }
                }
                Ok(None)
            }
            Some(Command::Back) => {
                self.undo(console)?;
                Ok(None)
            }
            Some(Command::Unknown(_)) => {
                console.line("Unknown command.  Enter a number, B, H, or Q.")?;
                Ok(None)
            }
            Some(Command::Apply(n)) => match menu.select(n) {
                Some(index) => self.apply(console, editor, index, &state),
                None if menu.is_empty() => {
                    console.line("No operators are currently applicable.")?;
                    Ok(None)
                }
                None => {
                    console.line(&format!(
                        "No operator numbered {n}; choose 1-{}.",
                        menu.len()
                    ))?;
                    Ok(None)
                }
            },
        }
    }

    fn apply(
        &mut self,
        console: &mut dyn Console,
        editor: &dyn Editor,
        index: usize,
        state: &S,
    ) -> EngineResult<Option<QuitReason>> {
        let Some(op) = self.operators.get(index) else {
            return Ok(None);
        };
        let name = op.name(state);
        let result = collect_args(console, editor, &name, op.params(), state)
            .and_then(|args| op.apply(state, &args).map_err(EngineError::from));

        let next = match result {
            Ok(next) => next,
            Err(e) if e.is_recoverable() => {
                warn!(operator = %name, error = %e, "move aborted");
                console.line(&format!("  {e}").yellow().to_string())?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if let Some(message) = next.transition_message() {
            console.line(&framed(message))?;
        }
        let goal = next.is_goal().then(|| next.goal_message());
        self.history.push(next);
        self.step += 1;
        debug!(operator = %name, step = self.step, depth = self.history.depth(), "move applied");

        let Some(message) = goal else {
            return Ok(None);
        };
        self.goal_reached = true;
        self.phase = SessionPhase::GoalReached;
        console.line(&format!("\nCONGRATULATIONS!  {message}").green().to_string())?;
        let answer = console.prompt("\nContinue exploring? (Y/N) >> ")?;
        if answer.trim().eq_ignore_ascii_case("y") {
            self.phase = SessionPhase::Playing;
            Ok(None)
        } else {
            Ok(Some(QuitReason::GoalDeclined))
        }
    }

    fn undo(&mut self, console: &mut dyn Console) -> EngineResult<()> {
        match self.history.undo() {
            Ok(_) => {
                self.step += 1;
                debug!(step = self.step, depth = self.history.depth(), "move undone");
                Ok(())
            }
            Err(EngineError::AlreadyAtStart) => {
                console.line("Already at the initial state; cannot go further back.")
            }
            Err(e) => Err(e),
        }
    }

    fn finish(&mut self, reason: QuitReason) -> SessionOutcome {
        self.phase = SessionPhase::Quit;
        SessionOutcome {
            reason,
            steps: self.step,
            depth: self.history.depth(),
            goal_reached: self.goal_reached,
        }
    }
}


#[cfg(test)]
mod tests {
    use std::path::Path;

    use sz_core::{
        Arg, Formulation, Operator, ParamDescriptor, ProblemConfig, RoleSpec, int_arg, text_arg,
    };

    use super::fixtures::*;
    use super::*;
    use crate::console::Terminal;
    use crate::roles::RoleSetup;

    struct NoEditor;

    impl Editor for NoEditor {
        fn program(&self) -> &str {
            "none"
        }

        fn edit(&self, _: &Path) -> EngineResult<()> {
            Ok(())
        }
    }

    struct BrokenEditor;

    impl Editor for BrokenEditor {
        fn program(&self) -> &str {
            "broken"
        }

        fn edit(&self, _: &Path) -> EngineResult<()> {
            Err(EngineError::EditorFailed {
                program: "broken".into(),
                status: "exit status: 2".into(),
            })
        }
    }

    fn sequencer(spec: RoleSpec, players: &[&str]) -> TurnSequencer {
        let declared: Vec<String> = players.iter().map(|p| p.to_string()).collect();
        let assignment = RoleSetup::new(spec.clone(), &declared).finish().unwrap();
        TurnSequencer::new(spec, assignment)
    }

    fn play<S: State>(
        problem: Problem<S>,
        seq: TurnSequencer,
        script: &str,
    ) -> (Session<S>, SessionOutcome, String) {
        let mut session = Session::new(problem, seq);
        let mut term = Terminal::new(script.as_bytes(), Vec::new());
        let outcome = session.run(&mut term, &NoEditor).unwrap();
        let output = term.output();
        (session, outcome, output)
    }

    fn counting() -> Problem<Counter> {
        Counting::new().initialize(&ProblemConfig::default()).unwrap()
    }

    #[test]
    fn quit_ends_with_user_quit() {
        let (session, outcome, out) = play(counting(), sequencer(RoleSpec::single_player(), &[]), "q\n");
        assert_eq!(outcome.reason, QuitReason::UserQuit);
        assert_eq!(outcome.steps, 0);
        assert_eq!(session.phase(), SessionPhase::Quit);
        assert!(out.contains("Step 0, Depth 0"));
        assert!(out.contains("Counter is at 0"));
        assert!(out.contains("  1: Add one"));
        assert!(!out.contains("Reset"));
    }

    #[test]
    fn end_of_input_counts_as_quit() {
        let (_, outcome, _) = play(counting(), sequencer(RoleSpec::single_player(), &[]), "1\n");
        assert_eq!(outcome.reason, QuitReason::InputClosed);
        assert_eq!(outcome.depth, 1);
    }

    #[test]
    fn bad_commands_reprompt_without_moving() {
        let script = "go\n9\nb\nh\n\nq\n";
        let (session, outcome, out) =
            play(counting(), sequencer(RoleSpec::single_player(), &[]), script);
        assert!(out.contains("Unknown command.  Enter a number, B, H, or Q."));
        assert!(out.contains("No operator numbered 9; choose 1-2."));
        assert!(out.contains("Already at the initial state; cannot go further back."));
        assert!(out.contains("INSTRUCTIONS:"));
        assert!(out.contains("OPERATORS:\n  1: Add one\n       Increase the counter by one."));
        assert_eq!(outcome.steps, 0);
        assert_eq!(session.current(), &Counter(0));
    }

    #[test]
    fn failed_transition_leaves_history_alone() {
        let (session, _, out) = play(counting(), sequencer(RoleSpec::single_player(), &[]), "2\nq\n");
        assert!(out.contains("operator failed: the counter refuses"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn editor_failure_returns_to_the_menu() {
        let dir = tempfile::tempdir().unwrap();
        let write = Operator::new("Write", |c: &Counter, args: &[Arg]| {
            text_arg(args, 0)?;
            Ok(Counter(c.0 + 1))
        })
        .with_params(vec![ParamDescriptor::file_edit(
            "draft",
            dir.path().join("draft.txt"),
            "",
        )]);
        let problem = Problem::new(Counter(0), [write].into_iter().collect());
        let mut session = Session::new(problem, sequencer(RoleSpec::single_player(), &[]));
        let mut term = Terminal::new("1\nq\n".as_bytes(), Vec::new());
        let outcome = session.run(&mut term, &BrokenEditor).unwrap();

        let out = term.output();
        assert!(out.contains("editor 'broken' exited with exit status: 2"));
        assert_eq!(out.matches(COMMAND_PROMPT).count(), 2);
        assert_eq!(session.history().len(), 1);
        assert_eq!(outcome.reason, QuitReason::UserQuit);
        assert_eq!(outcome.steps, 0);
    }

    #[test]
    fn empty_parameter_range_returns_to_the_menu() {
        let take = Operator::new("Take", |c: &Counter, args: &[Arg]| {
            Ok(Counter(c.0 - int_arg(args, 0)?))
        })
        .with_computed_params(|c: &Counter| vec![ParamDescriptor::int("n", 1, c.0)]);
        let problem = Problem::new(Counter(0), [take].into_iter().collect());
        let (session, outcome, out) =
            play(problem, sequencer(RoleSpec::single_player(), &[]), "1\nb\nq\n");

        assert!(out.contains("parameter 'n' of \"Take\" cannot be entered: range [1..0] is empty"));
        assert!(!out.contains("Enter an integer"));
        assert!(out.contains("Already at the initial state; cannot go further back."));
        assert_eq!(outcome.reason, QuitReason::UserQuit);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn steps_count_moves_and_undos() {
        let (session, outcome, out) =
            play(counting(), sequencer(RoleSpec::single_player(), &[]), "1\n1\nb\nq\n");
        assert_eq!(outcome.steps, 3);
        assert_eq!(outcome.depth, 1);
        assert!(out.contains("Step 3, Depth 1"));
        assert_eq!(session.current(), &Counter(1));
    }

    #[test]
    fn goal_offers_to_continue() {
        let (_, outcome, out) = play(
            counting(),
            sequencer(RoleSpec::single_player(), &[]),
            "1\n1\n1\ny\n1\nq\n",
        );
        assert!(out.contains("CONGRATULATIONS!  Reached three."));
        assert!(out.contains("Step 4, Depth 4"));
        assert!(outcome.goal_reached);
        assert_eq!(outcome.reason, QuitReason::UserQuit);
    }

    #[test]
    fn sequential_two_role_game_with_undo() {
        // each cycle opens with a cue confirmation, then the command
        let script = "\n1\n\n2\n\nb\n\nb\n\nq\n";
        let (session, outcome, out) = play(race(), sequencer(race_roles(), &["Ann", "Bo"]), script);

        assert!(out.contains("(nobody): please hand the keyboard to Ann."));
        assert!(out.contains("Ann: please hand the keyboard to Bo."));
        assert!(out.contains("Bo, you are playing the role of: Second."));
        assert!(out.contains("Press Enter to confirm."));
        assert!(out.contains("Total: 3"));
        assert_eq!(session.current(), &race().initial);
        assert_eq!(outcome.steps, 4);
        assert_eq!(outcome.depth, 0);
    }

    #[test]
    fn repeated_cycle_for_same_role_is_not_cued() {
        // Ann asks for help, then quits; only the first cycle is cued
        let (_, _, out) = play(race(), sequencer(race_roles(), &["Ann", "Bo"]), "\nh\nq\n");
        assert_eq!(out.matches("please hand the keyboard").count(), 1);
    }

    #[test]
    fn simultaneous_phase_masks_earlier_choice() {
        // the reveal cycle is cued back to Ann; after the goal the same
        // role continues uncued
        let script = "\n1\n3\n\n1\n1\n\n1\ny\nq\n";
        let (_, outcome, out) = play(throw(), sequencer(throw_roles(), &["Ann", "Bo"]), script);

        assert!(out.contains("*** PARALLEL INPUT PHASE"));
        let ann_turn = &out[..out.find("Bo, you are playing").unwrap()];
        assert!(ann_turn.contains("  1: A throws"));
        assert!(!ann_turn.contains("B throws"));

        let bo_turn = &out[out.find("Bo, you are playing").unwrap()..];
        let bo_turn = &bo_turn[..bo_turn.find(COMMAND_PROMPT).unwrap()];
        assert!(bo_turn.contains("You: Pending, Opponent: Made"));
        assert!(!bo_turn.contains("scissors"));
        assert!(bo_turn.contains("  1: B throws"));
        assert!(!bo_turn.contains("A throws"));

        assert!(out.contains("A threw scissors, B threw rock"));
        assert!(outcome.goal_reached);
        assert_eq!(outcome.reason, QuitReason::UserQuit);
    }

    #[test]
    fn bounded_guess_loop() {
        let script = "1\n14\n1\n20\n1\n17\nn\n";
        let (_, outcome, out) = play(guessing(17), sequencer(RoleSpec::single_player(), &[]), script);

        assert!(out.contains("| 14 is a nice guess. Nice try. Too low.  |"));
        assert!(out.contains("| 20 is a nice guess. Nice try. Too high.  |"));
        assert!(out.contains("17 is a nice guess. You got it!  The secret age was 17."));
        assert_eq!(out.matches("CONGRATULATIONS!").count(), 1);
        assert!(out.contains("CONGRATULATIONS!  You guessed it!"));
        assert!(outcome.goal_reached);
        assert_eq!(outcome.steps, 3);
        assert_eq!(outcome.reason, QuitReason::GoalDeclined);
    }

    #[test]
    fn outcome_serializes() {
        let outcome = SessionOutcome {
            reason: QuitReason::GoalDeclined,
            steps: 3,
            depth: 3,
            goal_reached: true,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["reason"], "goal_declined");
        assert_eq!(json["goal_reached"], true);
    }
}

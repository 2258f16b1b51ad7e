//! Interactive text session engine for SOLUZION formulations.
//!
//! Given a [`sz_core::Formulation`], the engine assigns players to roles,
//! creates a session folder when operators edit files, and runs a
//! turn-based loop on a line-oriented [`Console`]: it cues the right player,
//! shows a per-role view of the state, lists the applicable operators,
//! collects their parameters, and keeps an undo history.

pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod folder;
pub mod history;
pub mod params;
pub mod resolver;
pub mod roles;
pub mod runner;
pub mod sequencer;
pub mod session;

pub use config::EngineConfig;
pub use console::{Console, Terminal};
pub use editor::{Editor, SystemEditor};
pub use error::{EngineError, EngineResult};
pub use history::History;
pub use roles::{RoleAssignment, RoleSetup, RoleSetupError, assign_roles};
pub use runner::{Playable, play_formulation, prepare_problem};
pub use sequencer::{Cue, TurnSequencer};
pub use session::{QuitReason, Session, SessionOutcome, SessionPhase};

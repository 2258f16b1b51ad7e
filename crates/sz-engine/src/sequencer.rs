//! Turn sequencing: which role acts next and whether the keyboard changes
//! hands.

use tracing::debug;

use sz_core::{OperatorSet, RoleId, RoleSpec, State};

use crate::resolver::has_own_move;
use crate::roles::RoleAssignment;

/// Separator printed around handoff cues.
pub const CUE_BAR: &str = "----------------------------------------------------";

/// What to tell the players before a role is prompted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// Same player, same role as last cycle.
    None,
    /// Same player, now acting in another role.
    SwitchRole {
        /// The player at the keyboard.
        player: String,
        /// Name of the new role.
        role: String,
    },
    /// The keyboard passes to another player.
    Handoff {
        /// Previous player, absent on the first cycle.
        from: Option<String>,
        /// Next player.
        to: String,
        /// Name of the role they play.
        role: String,
    },
}

impl Cue {
    /// Text of the cue between separator bars, or `None` when silent.
    pub fn render(&self) -> Option<String> {
        let body = match self {
            Self::None => return None,
            Self::SwitchRole { player, role } => {
                format!("  ({player} switching to role: {role})")
            }
            Self::Handoff { from, to, role } => {
                let from = from.as_deref().unwrap_or("(nobody)");
                format!(
                    "  {from}: please hand the keyboard to {to}.\n  {to}, you are playing the role of: {role}."
                )
            }
        };
        Some(format!("{CUE_BAR}\n{body}\n{CUE_BAR}"))
    }
}

/// Decides who acts each cycle.
#[derive(Debug, Clone)]
pub struct TurnSequencer {
    spec: RoleSpec,
    assignment: RoleAssignment,
    active: Vec<RoleId>,
    last: Option<(String, RoleId)>,
}

impl TurnSequencer {
    /// Create a sequencer over a frozen assignment.
    pub fn new(spec: RoleSpec, assignment: RoleAssignment) -> Self {
        let active = assignment.active_roles(&spec);
        Self {
            spec,
            assignment,
            active,
            last: None,
        }
    }

    /// Non-observer roles with players, ascending.
    pub fn active_roles(&self) -> &[RoleId] {
        &self.active
    }

    /// Whether more than one role is in play, enabling cues and per-role
    /// views.
    pub fn is_multi_role(&self) -> bool {
        self.active.len() > 1
    }

    /// The role specification.
    pub fn spec(&self) -> &RoleSpec {
        &self.spec
    }

    /// The frozen assignment.
    pub fn assignment(&self) -> &RoleAssignment {
        &self.assignment
    }

    /// Active roles that still owe a choice in a parallel state.
    pub fn pending_roles<S: State>(&self, state: &S, ops: &OperatorSet<S>) -> Vec<RoleId> {
        self.active
            .iter()
            .copied()
            .filter(|role| has_own_move(ops, state, *role))
            .collect()
    }

    /// The role prompted this cycle.
    pub fn acting_role<S: State>(&self, state: &S, ops: &OperatorSet<S>) -> RoleId {
        let pending = if state.is_parallel() {
            self.pending_roles(state, ops)
        } else {
            Vec::new()
        };
        if let Some(role) = pending.first() {
            return *role;
        }
        if let Some(hint) = state.current_role().filter(|r| self.active.contains(r)) {
            return hint;
        }
        self.active
            .iter()
            .copied()
            .find(|role| has_own_move(ops, state, *role))
            .or_else(|| self.active.first().copied())
            .unwrap_or(RoleId(0))
    }

    /// Compare `role` and its primary player with the previous cycle and
    /// record them as the latest.
    pub fn cue(&mut self, role: RoleId) -> Cue {
        let player = self
            .assignment
            .primary(role)
            .map(str::to_string)
            .or_else(|| self.last.as_ref().map(|(p, _)| p.clone()))
            .unwrap_or_else(|| "Player 1".to_string());
        let role_name = self.spec.role_name(role);

        let cue = match &self.last {
            Some((prev, prev_role)) if *prev == player && *prev_role == role => Cue::None,
            Some((prev, _)) if *prev == player => Cue::SwitchRole {
                player: player.clone(),
                role: role_name,
            },
            last => Cue::Handoff {
                from: last.as_ref().map(|(p, _)| p.clone()),
                to: player.clone(),
                role: role_name,
            },
        };
        debug!(%role, ?cue, "turn cue");
        self.last = Some((player, role));
        cue
    }
}

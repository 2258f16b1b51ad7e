use std::fmt;
use std::hash::Hash;

use crate::role::RoleId;

/// A snapshot of a game or puzzle.
///
/// States are immutable values: operators take `&self` and return a new
/// state. The session history relies on this, since an undo must restore a
/// state equal to the one that existed before the move.
///
/// Everything beyond `is_goal` is an optional capability with a default.
pub trait State: Clone + Eq + Hash + fmt::Display + fmt::Debug {
    /// Whether this state ends the game or solves the puzzle.
    fn is_goal(&self) -> bool;

    /// Message shown when a goal state is reached.
    fn goal_message(&self) -> String {
        "Goal state reached!".to_string()
    }

    /// Rendering for a specific role, masking what that role may not see.
    ///
    /// `None` means the default `Display` rendering is shown to everyone.
    fn view_for_role(&self, _role: RoleId) -> Option<String> {
        None
    }

    /// Whether several roles choose independently in this state.
    fn is_parallel(&self) -> bool {
        false
    }

    /// The role expected to move next, if the formulation tracks it.
    fn current_role(&self) -> Option<RoleId> {
        None
    }

    /// Short description of what just happened, attached when this state
    /// was produced.
    fn transition_message(&self) -> Option<&str> {
        None
    }
}

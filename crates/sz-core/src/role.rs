use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SzError, SzResult};

/// Index of a role within its [`RoleSpec`], in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub usize);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// A participant slot defined by a formulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Display name, e.g. `"X"` or `"Observer"`.
    pub name: String,
    /// One-line description shown during role assignment.
    pub description: String,
    /// Minimum number of players this role needs before play can start.
    pub min_players: Option<usize>,
    /// Maximum number of players this role accepts.
    pub max_players: Option<usize>,
}

impl Role {
    /// Create a role with no per-role player bounds.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            min_players: None,
            max_players: None,
        }
    }

    /// Require at least `n` players in this role.
    pub fn with_min_players(mut self, n: usize) -> Self {
        self.min_players = Some(n);
        self
    }

    /// Allow at most `n` players in this role.
    pub fn with_max_players(mut self, n: usize) -> Self {
        self.max_players = Some(n);
        self
    }

    /// Observers watch but never act and never count as active.
    pub fn is_observer(&self) -> bool {
        self.name.eq_ignore_ascii_case("observer")
    }
}

/// The roles of a formulation plus participation constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    roles: Vec<Role>,
    /// Number of non-observer roles that must be filled to start.
    pub min_players_to_start: usize,
    /// Maximum number of distinct players in a session.
    pub max_players: Option<usize>,
    /// Whether one player may hold several roles.
    pub multiple_roles_per_player: bool,
}

impl RoleSpec {
    /// Create a spec requiring one filled role to start.
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles,
            min_players_to_start: 1,
            max_players: None,
            multiple_roles_per_player: false,
        }
    }

    /// The spec used when a formulation declares no roles of its own.
    pub fn single_player() -> Self {
        Self::new(vec![Role::new("Player", "The sole player/solver.")]).with_max_players(1)
    }

    /// Set the number of filled roles needed to start.
    pub fn with_min_players_to_start(mut self, n: usize) -> Self {
        self.min_players_to_start = n;
        self
    }

    /// Cap the number of distinct players.
    pub fn with_max_players(mut self, n: usize) -> Self {
        self.max_players = Some(n);
        self
    }

    /// Allow one player to hold several roles.
    pub fn allow_multiple_roles_per_player(mut self) -> Self {
        self.multiple_roles_per_player = true;
        self
    }

    /// All roles in declaration order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Look up a role by id.
    pub fn role(&self, id: RoleId) -> Option<&Role> {
        self.roles.get(id.0)
    }

    /// Display name for a role id, falling back to the number.
    pub fn role_name(&self, id: RoleId) -> String {
        self.role(id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("role {id}"))
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the spec has no roles.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// All role ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = RoleId> + '_ {
        (0..self.roles.len()).map(RoleId)
    }

    /// Ids of roles that can act, in ascending order.
    pub fn playing_ids(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_observer())
            .map(|(i, _)| RoleId(i))
    }

    /// Whether assignment is implicit because there is only one role.
    pub fn is_single_role(&self) -> bool {
        self.roles.len() == 1
    }

    /// Check that the spec can ever be satisfied.
    pub fn validate(&self) -> SzResult<()> {
        if self.roles.is_empty() {
            return Err(SzError::NoRoles);
        }
        let available = self.playing_ids().count();
        if self.min_players_to_start > available {
            return Err(SzError::UnsatisfiableRoleSpec {
                required: self.min_players_to_start,
                available,
            });
        }
        let inverted = self.roles.iter().find(|r| {
            matches!((r.min_players, r.max_players), (Some(min), Some(max)) if min > max)
        });
        if let Some(role) = inverted {
            return Err(SzError::InvalidRoleBounds {
                role: role.name.clone(),
                min: role.min_players.unwrap_or_default(),
                max: role.max_players.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl Default for RoleSpec {
    fn default() -> Self {
        Self::single_player()
    }
}

//! Role assignment: who plays which role before the session starts.

use std::collections::{BTreeMap, BTreeSet};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use thiserror::Error;
use tracing::{debug, warn};

use sz_core::{RoleId, RoleSpec};

use crate::console::Console;
use crate::error::EngineResult;

/// A participation rule broken while assigning roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleSetupError {
    /// Player number out of range.
    #[error("No player numbered {number}; choose 1-{count}.")]
    NoSuchPlayer {
        /// The number entered.
        number: usize,
        /// Number of known players.
        count: usize,
    },

    /// Role number out of range.
    #[error("No role numbered {number}; choose 1-{count}.")]
    NoSuchRole {
        /// The number entered.
        number: usize,
        /// Number of roles.
        count: usize,
    },

    /// A player name was blank.
    #[error("Name cannot be empty.")]
    EmptyName,

    /// A player name is already taken.
    #[error("There is already a player named {0}.")]
    DuplicateName(String),

    /// The player already holds the role.
    #[error("{player} is already assigned to {role}.")]
    AlreadyAssigned {
        /// Player name.
        player: String,
        /// Role name.
        role: String,
    },

    /// The player does not hold the role.
    #[error("{player} was not assigned to {role}.")]
    NotAssigned {
        /// Player name.
        player: String,
        /// Role name.
        role: String,
    },

    /// The role has reached its per-role maximum.
    #[error("{role} already has its maximum of {max} player(s).")]
    RoleFull {
        /// Role name.
        role: String,
        /// The per-role maximum.
        max: usize,
    },

    /// The formulation allows one playing role per player.
    #[error("{player} already plays {role}; each player may hold only one role in this game.")]
    OneRolePerPlayer {
        /// Player name.
        player: String,
        /// The role already held.
        role: String,
    },

    /// Too few non-observer roles are filled to start.
    #[error(
        "Need at least {required} non-observer role(s) filled (currently {filled}).  Please assign more players."
    )]
    TooFewRoles {
        /// `min_players_to_start`.
        required: usize,
        /// Filled non-observer roles.
        filled: usize,
    },

    /// A role is below its per-role minimum.
    #[error("{role} needs at least {min} player(s) (currently {have}).")]
    RoleUnderfilled {
        /// Role name.
        role: String,
        /// The per-role minimum.
        min: usize,
        /// Players currently in the role.
        have: usize,
    },

    /// More distinct players are assigned than the game allows.
    #[error("At most {max} player(s) may take part (currently {have}).")]
    TooManyPlayers {
        /// The formulation's `max_players`.
        max: usize,
        /// Distinct players currently assigned.
        have: usize,
    },
}

/// A frozen mapping from roles to the players holding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    holders: BTreeMap<RoleId, Vec<String>>,
}

impl RoleAssignment {
    /// Players holding `role`, in assignment order.
    pub fn players_in(&self, role: RoleId) -> &[String] {
        self.holders.get(&role).map_or(&[], Vec::as_slice)
    }

    /// The player cued for `role`.
    pub fn primary(&self, role: RoleId) -> Option<&str> {
        self.players_in(role).first().map(String::as_str)
    }

    /// Roles held by `player`, ascending.
    pub fn roles_of(&self, player: &str) -> Vec<RoleId> {
        self.holders
            .iter()
            .filter(|(_, names)| names.iter().any(|n| n == player))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Distinct players holding any role.
    pub fn player_count(&self) -> usize {
        self.holders
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Non-observer roles with at least one player, ascending.
    pub fn active_roles(&self, spec: &RoleSpec) -> Vec<RoleId> {
        spec.playing_ids()
            .filter(|id| !self.players_in(*id).is_empty())
            .collect()
    }

    fn insert(&mut self, role: RoleId, player: &str) {
        self.holders
            .entry(role)
            .or_default()
            .push(player.to_string());
    }

    fn remove(&mut self, role: RoleId, player: &str) -> bool {
        let Some(names) = self.holders.get_mut(&role) else {
            return false;
        };
        let before = names.len();
        names.retain(|n| n != player);
        let removed = names.len() != before;
        if names.is_empty() {
            self.holders.remove(&role);
        }
        removed
    }

    fn rename(&mut self, old: &str, new: &str) {
        for name in self.holders.values_mut().flatten() {
            if name == old {
                *name = new.to_string();
            }
        }
    }
}

/// The mutable state of the role dialog.
#[derive(Debug, Clone)]
pub struct RoleSetup {
    spec: RoleSpec,
    players: Vec<String>,
    assignment: RoleAssignment,
}

impl RoleSetup {
    /// Build the default assignment for `spec`.
    ///
    /// Without declared players, `Player N` fills each non-observer role in
    /// order. With declared players, player *i* takes non-observer role *i*,
    /// wrapping around the roles when there are more players than roles.
    /// When there are fewer players, leftover roles are filled by cycling
    /// through the players again only if one player may hold several roles.
    ///
    /// Declared names are trimmed; blank and repeated names are dropped.
    pub fn new(spec: RoleSpec, declared: &[String]) -> Self {
        let playing: Vec<RoleId> = spec.playing_ids().collect();
        let mut players: Vec<String> = Vec::with_capacity(declared.len());
        for name in declared.iter().map(|n| n.trim()) {
            if name.is_empty() || players.iter().any(|p| p == name) {
                warn!(player = name, "ignoring blank or repeated player name");
                continue;
            }
            players.push(name.to_string());
        }
        if players.is_empty() {
            players = (1..=playing.len()).map(|n| format!("Player {n}")).collect();
        }

        let mut setup = Self {
            spec,
            players,
            assignment: RoleAssignment::default(),
        };
        if playing.is_empty() || setup.players.is_empty() {
            return setup;
        }

        let pairs: Vec<(usize, RoleId)> = if setup.players.len() >= playing.len() {
            (0..setup.players.len())
                .map(|i| (i, playing[i % playing.len()]))
                .collect()
        } else {
            let n = setup.players.len();
            playing
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < n || setup.spec.multiple_roles_per_player)
                .map(|(i, role)| (i % n, *role))
                .collect()
        };

        for (player, role) in pairs {
            if setup.would_exceed_max_players(player) {
                continue;
            }
            if let Err(e) = setup.assign(player, role) {
                debug!(error = %e, "default assignment skipped");
            }
        }
        setup
    }

    /// The role specification being filled.
    pub fn spec(&self) -> &RoleSpec {
        &self.spec
    }

    /// Known players in order of declaration.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// The assignment so far.
    pub fn assignment(&self) -> &RoleAssignment {
        &self.assignment
    }

    /// Rename player `index`, keeping their roles.
    pub fn rename_player(&mut self, index: usize, name: &str) -> Result<(), RoleSetupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoleSetupError::EmptyName);
        }
        let old = self.player(index)?.to_string();
        if old != name && self.players.iter().any(|p| p == name) {
            return Err(RoleSetupError::DuplicateName(name.to_string()));
        }
        self.assignment.rename(&old, name);
        self.players[index] = name.to_string();
        Ok(())
    }

    /// Add a player with no roles, returning their index.
    pub fn add_player(&mut self, name: &str) -> Result<usize, RoleSetupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoleSetupError::EmptyName);
        }
        if self.players.iter().any(|p| p == name) {
            return Err(RoleSetupError::DuplicateName(name.to_string()));
        }
        self.players.push(name.to_string());
        Ok(self.players.len() - 1)
    }

    /// Give role `role` to player `index`.
    pub fn assign(&mut self, index: usize, role: RoleId) -> Result<(), RoleSetupError> {
        let player = self.player(index)?.to_string();
        let target = self.role_checked(role)?.clone();
        let holders = self.assignment.players_in(role);

        if holders.contains(&player) {
            return Err(RoleSetupError::AlreadyAssigned {
                player,
                role: target.name,
            });
        }
        if let Some(max) = target.max_players.filter(|max| holders.len() >= *max) {
            return Err(RoleSetupError::RoleFull {
                role: target.name,
                max,
            });
        }
        if !target.is_observer() && !self.spec.multiple_roles_per_player {
            let held = self
                .assignment
                .roles_of(&player)
                .into_iter()
                .find(|r| self.spec.role(*r).is_some_and(|r| !r.is_observer()));
            if let Some(held) = held {
                return Err(RoleSetupError::OneRolePerPlayer {
                    player,
                    role: self.spec.role_name(held),
                });
            }
        }

        self.assignment.insert(role, &player);
        Ok(())
    }

    /// Take role `role` away from player `index`.
    pub fn unassign(&mut self, index: usize, role: RoleId) -> Result<(), RoleSetupError> {
        let player = self.player(index)?.to_string();
        let target = self.role_checked(role)?.name.clone();
        if self.assignment.remove(role, &player) {
            Ok(())
        } else {
            Err(RoleSetupError::NotAssigned {
                player,
                role: target,
            })
        }
    }

    /// Check the start conditions, reporting the first shortfall.
    pub fn check_ready(&self) -> Result<(), RoleSetupError> {
        let filled = self.assignment.active_roles(&self.spec).len();
        if filled < self.spec.min_players_to_start {
            return Err(RoleSetupError::TooFewRoles {
                required: self.spec.min_players_to_start,
                filled,
            });
        }
        for (id, role) in self.spec.ids().zip(self.spec.roles()) {
            let have = self.assignment.players_in(id).len();
            if let Some(min) = role.min_players.filter(|min| have < *min) {
                return Err(RoleSetupError::RoleUnderfilled {
                    role: role.name.clone(),
                    min,
                    have,
                });
            }
        }
        let have = self.assignment.player_count();
        if let Some(max) = self.spec.max_players.filter(|max| have > *max) {
            return Err(RoleSetupError::TooManyPlayers { max, have });
        }
        Ok(())
    }

    /// The assignment, if play may start.
    pub fn finish(&self) -> Result<RoleAssignment, RoleSetupError> {
        self.check_ready()?;
        Ok(self.assignment.clone())
    }

    fn player(&self, index: usize) -> Result<&str, RoleSetupError> {
        self.players
            .get(index)
            .map(String::as_str)
            .ok_or(RoleSetupError::NoSuchPlayer {
                number: index + 1,
                count: self.players.len(),
            })
    }

    fn role_checked(&self, role: RoleId) -> Result<&sz_core::Role, RoleSetupError> {
        self.spec.role(role).ok_or(RoleSetupError::NoSuchRole {
            number: role.0 + 1,
            count: self.spec.len(),
        })
    }

    fn would_exceed_max_players(&self, index: usize) -> bool {
        let Some(max) = self.spec.max_players else {
            return false;
        };
        let name = &self.players[index];
        let already = !self.assignment.roles_of(name).is_empty();
        !already && self.assignment.player_count() >= max
    }
}

/// Run the role dialog and return the assignment play starts with.
///
/// A spec with exactly one role needs no dialog.
pub fn assign_roles(
    console: &mut dyn Console,
    spec: &RoleSpec,
    declared: &[String],
) -> EngineResult<RoleAssignment> {
    let mut setup = RoleSetup::new(spec.clone(), declared);

    if spec.is_single_role() {
        let assignment = setup.finish()?;
        if let Some(player) = assignment.primary(RoleId(0)) {
            console.line(&format!("Single-player game.  Player: {player}\n"))?;
        }
        return Ok(assignment);
    }

    loop {
        console.line(&assignment_table(&setup))?;
        console.line("Choices:")?;
        console.line("  a. Proceed with current assignments")?;
        console.line("  b. Change a player name")?;
        console.line("  c. Add a new player")?;
        console.line("  d. Edit assignment for a role")?;

        let answer = console.prompt("Enter a, b, c, or d: ")?;
        match answer.trim().to_ascii_lowercase().chars().next() {
            None => {}
            Some('a') => match setup.finish() {
                Ok(assignment) => return Ok(assignment),
                Err(e) => console.line(&e.to_string().yellow().to_string())?,
            },
            Some('b') => rename_dialog(console, &mut setup)?,
            Some('c') => {
                let name = console.prompt("Name for new player: ")?;
                match setup.add_player(&name) {
                    Ok(index) => {
                        let added = &setup.players()[index];
                        console.line(&format!("Added player: {added}"))?;
                    }
                    Err(e) => console.line(&e.to_string().yellow().to_string())?,
                }
            }
            Some('d') => edit_role_dialog(console, &mut setup)?,
            Some(_) => console.line("Unknown choice; please enter a, b, c, or d.")?,
        }
    }
}

fn assignment_table(setup: &RoleSetup) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Role", "Player(s)", "Description"]);
    for (id, role) in setup.spec().ids().zip(setup.spec().roles()) {
        let holders = setup.assignment().players_in(id);
        let players = if holders.is_empty() {
            "(none)".to_string()
        } else {
            holders.join(", ")
        };
        table.add_row(vec![
            id.to_string(),
            role.name.clone(),
            players,
            role.description.clone(),
        ]);
    }
    format!("\nPLAYER(S): SELECT YOUR ROLE(S)\n{table}")
}

fn players_table(setup: &RoleSetup) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Player #", "Name"]);
    for (i, name) in setup.players().iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), name.clone()]);
    }
    table.to_string()
}

/// Outcome of a numbered sub-prompt.
enum Pick<T> {
    Cancel,
    Chosen(T),
}

fn pick_number(console: &mut dyn Console, prompt: &str) -> EngineResult<Pick<i64>> {
    loop {
        let answer = console.prompt(prompt)?;
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("c") {
            return Ok(Pick::Cancel);
        }
        match answer.parse::<i64>() {
            Ok(n) if n != 0 => return Ok(Pick::Chosen(n)),
            _ => console.line("Invalid number.")?,
        }
    }
}

/// One-based menu number to a zero-based index.
fn menu_index(n: i64) -> Option<usize> {
    n.checked_sub(1).and_then(|i| usize::try_from(i).ok())
}

fn rename_dialog(console: &mut dyn Console, setup: &mut RoleSetup) -> EngineResult<()> {
    console.line(&players_table(setup))?;
    loop {
        let Pick::Chosen(n) = pick_number(console, "Number of player to rename (or c to cancel): ")?
        else {
            return Ok(());
        };
        let Some(index) = menu_index(n).filter(|i| *i < setup.players().len()) else {
            console.line(&format!("Must be between 1 and {}.", setup.players().len()))?;
            continue;
        };
        let name = console.prompt("New name: ")?;
        match setup.rename_player(index, &name) {
            Ok(()) => return Ok(()),
            Err(e) => console.line(&e.to_string().yellow().to_string())?,
        }
    }
}

fn edit_role_dialog(console: &mut dyn Console, setup: &mut RoleSetup) -> EngineResult<()> {
    let mut roles = Table::new();
    roles.set_header(vec!["Role #", "Name", "Description"]);
    for (id, role) in setup.spec().ids().zip(setup.spec().roles()) {
        roles.add_row(vec![id.to_string(), role.name.clone(), role.description.clone()]);
    }
    console.line(&roles.to_string())?;

    let role = loop {
        let Pick::Chosen(n) = pick_number(console, "Role number to reassign (or c to cancel): ")?
        else {
            return Ok(());
        };
        match menu_index(n) {
            Some(index) if index < setup.spec().len() => break RoleId(index),
            _ => console.line(&format!("Must be between 1 and {}.", setup.spec().len()))?,
        }
    };

    console.line(&players_table(setup))?;
    console.line("Enter a positive player number to assign, negative to remove.")?;
    loop {
        let Pick::Chosen(n) = pick_number(console, "Player number (or c to cancel): ")? else {
            return Ok(());
        };
        let count = setup.players().len();
        let index = usize::try_from(n.unsigned_abs() - 1).unwrap_or(usize::MAX);
        if index >= count {
            console.line(&format!("Must be between 1 and {count} (or its negative)."))?;
            continue;
        }
        let result = if n < 0 {
            setup.unassign(index, role)
        } else {
            setup.assign(index, role)
        };
        if let Err(e) = result {
            console.line(&e.to_string().yellow().to_string())?;
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use sz_core::Role;

    use super::*;
    use crate::console::Terminal;

    fn x_o_observer() -> RoleSpec {
        RoleSpec::new(vec![
            Role::new("X", "Plays X."),
            Role::new("O", "Plays O."),
            Role::new("Observer", "Watches."),
        ])
        .with_min_players_to_start(2)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_players_fill_non_observer_roles() {
        let setup = RoleSetup::new(x_o_observer(), &[]);
        assert_eq!(setup.players(), ["Player 1", "Player 2"]);
        assert_eq!(setup.assignment().players_in(RoleId(0)), ["Player 1"]);
        assert_eq!(setup.assignment().players_in(RoleId(1)), ["Player 2"]);
        assert!(setup.assignment().players_in(RoleId(2)).is_empty());
        assert!(setup.check_ready().is_ok());
    }

    #[test]
    fn declared_players_wrap_over_roles() {
        let spec = RoleSpec::new(vec![Role::new("A", ""), Role::new("B", "")]);
        let setup = RoleSetup::new(spec, &names(&["Ann", "Bo", "Cy"]));
        assert_eq!(setup.assignment().players_in(RoleId(0)), ["Ann", "Cy"]);
        assert_eq!(setup.assignment().players_in(RoleId(1)), ["Bo"]);
    }

    #[test]
    fn fewer_players_leave_roles_open_unless_sharing_allowed() {
        let setup = RoleSetup::new(x_o_observer(), &names(&["Ann"]));
        assert_eq!(setup.assignment().active_roles(setup.spec()), vec![RoleId(0)]);
        assert_eq!(
            setup.check_ready(),
            Err(RoleSetupError::TooFewRoles {
                required: 2,
                filled: 1
            })
        );

        let shared = x_o_observer().allow_multiple_roles_per_player();
        let setup = RoleSetup::new(shared, &names(&["Ann"]));
        assert_eq!(setup.assignment().roles_of("Ann"), vec![RoleId(0), RoleId(1)]);
        assert!(setup.check_ready().is_ok());
    }

    #[test]
    fn one_role_per_player_is_enforced() {
        let mut setup = RoleSetup::new(x_o_observer(), &[]);
        let err = setup.assign(0, RoleId(1)).unwrap_err();
        assert!(matches!(err, RoleSetupError::OneRolePerPlayer { .. }));
        // observers are exempt
        assert!(setup.assign(0, RoleId(2)).is_ok());
    }

    #[test]
    fn per_role_maximum_is_enforced_at_assignment() {
        let spec = RoleSpec::new(vec![
            Role::new("Solo", "").with_max_players(1),
            Role::new("Crowd", ""),
        ]);
        let mut setup = RoleSetup::new(spec, &[]);
        let extra = setup.add_player("Zed").unwrap();
        assert_eq!(
            setup.assign(extra, RoleId(0)),
            Err(RoleSetupError::RoleFull {
                role: "Solo".into(),
                max: 1
            })
        );
    }

    #[test]
    fn start_reports_underfilled_role_and_player_cap() {
        let spec = RoleSpec::new(vec![Role::new("Team", "").with_min_players(2)]);
        let setup = RoleSetup::new(spec, &[]);
        assert_eq!(
            setup.check_ready(),
            Err(RoleSetupError::RoleUnderfilled {
                role: "Team".into(),
                min: 2,
                have: 1
            })
        );

        let capped = RoleSpec::new(vec![Role::new("A", ""), Role::new("B", "")]).with_max_players(1);
        let mut setup = RoleSetup::new(capped, &[]);
        assert_eq!(setup.assignment().player_count(), 1);
        setup.assign(1, RoleId(1)).unwrap();
        assert_eq!(
            setup.check_ready(),
            Err(RoleSetupError::TooManyPlayers { max: 1, have: 2 })
        );
    }

    #[test]
    fn rename_carries_roles() {
        let mut setup = RoleSetup::new(x_o_observer(), &[]);
        setup.rename_player(1, "Olga").unwrap();
        assert_eq!(setup.assignment().primary(RoleId(1)), Some("Olga"));
        assert_eq!(setup.rename_player(0, "Olga"), Err(RoleSetupError::DuplicateName("Olga".into())));
        assert_eq!(setup.rename_player(0, "  "), Err(RoleSetupError::EmptyName));
    }

    #[test]
    fn repeated_declared_names_collapse() {
        let spec = RoleSpec::new(vec![Role::new("X", ""), Role::new("O", "")]);
        let mut setup = RoleSetup::new(spec, &names(&["Ann", " Ann ", "", "Bo"]));
        assert_eq!(setup.players(), ["Ann", "Bo"]);
        assert_eq!(setup.assignment().players_in(RoleId(0)), ["Ann"]);
        assert_eq!(setup.assignment().players_in(RoleId(1)), ["Bo"]);

        setup.rename_player(1, "Cy").unwrap();
        assert_eq!(setup.assignment().primary(RoleId(0)), Some("Ann"));
        assert_eq!(setup.assignment().primary(RoleId(1)), Some("Cy"));
    }

    #[test]
    fn unassign_requires_holding() {
        let mut setup = RoleSetup::new(x_o_observer(), &[]);
        assert!(matches!(
            setup.unassign(0, RoleId(1)),
            Err(RoleSetupError::NotAssigned { .. })
        ));
        setup.unassign(0, RoleId(0)).unwrap();
        assert!(setup.assignment().players_in(RoleId(0)).is_empty());
    }

    #[test]
    fn single_role_needs_no_dialog() {
        let mut term = Terminal::new("".as_bytes(), Vec::new());
        let assignment = assign_roles(&mut term, &RoleSpec::single_player(), &[]).unwrap();
        assert_eq!(assignment.primary(RoleId(0)), Some("Player 1"));
        assert!(term.output().contains("Single-player game.  Player: Player 1"));
    }

    #[test]
    fn dialog_blocks_start_until_roles_filled() {
        // remove Player 2 from O, try to start, then put them back
        let script = "d\n2\n-2\na\nd\n2\n2\na\n";
        let mut term = Terminal::new(script.as_bytes(), Vec::new());
        let assignment = assign_roles(&mut term, &x_o_observer(), &[]).unwrap();
        assert_eq!(assignment.primary(RoleId(1)), Some("Player 2"));
        assert!(term.output().contains("Need at least 2 non-observer role(s) filled (currently 1)"));
    }

    #[test]
    fn dialog_adds_and_renames_players() {
        let script = "c\nDana\nb\nx\n1\nAnn\nd\n3\n3\na\n";
        let mut term = Terminal::new(script.as_bytes(), Vec::new());
        let assignment = assign_roles(&mut term, &x_o_observer(), &[]).unwrap();
        let out = term.output();
        assert!(out.contains("Added player: Dana"));
        assert!(out.contains("Invalid number."));
        assert_eq!(assignment.primary(RoleId(0)), Some("Ann"));
        assert_eq!(assignment.primary(RoleId(2)), Some("Dana"));
    }

    #[test]
    fn dialog_survives_extreme_numbers() {
        let script = "b\n-9223372036854775808\nc\nd\n-9223372036854775808\nc\na\n";
        let mut term = Terminal::new(script.as_bytes(), Vec::new());
        let assignment = assign_roles(&mut term, &x_o_observer(), &[]).unwrap();
        let out = term.output();
        assert!(out.contains("Must be between 1 and 2."));
        assert!(out.contains("Must be between 1 and 3."));
        assert_eq!(assignment.primary(RoleId(0)), Some("Player 1"));
    }
}

//! Which operators a role may use, and how the player picks one.

use sz_core::{Operator, OperatorSet, RoleId};

/// Whether `op` is offered to `role` in `state`.
///
/// The precondition must hold and the operator must be unrestricted or
/// restricted to `role`.
pub fn is_applicable<S>(op: &Operator<S>, state: &S, role: RoleId) -> bool {
    op.role().is_none_or(|r| r == role) && op.is_enabled(state)
}

/// Indices of the operators offered to `role`, in set order.
pub fn applicable<S>(ops: &OperatorSet<S>, state: &S, role: RoleId) -> Vec<usize> {
    ops.iter()
        .filter(|(_, op)| is_applicable(op, state, role))
        .map(|(i, _)| i)
        .collect()
}

/// Whether some operator restricted to `role` is enabled in `state`.
pub fn has_own_move<S>(ops: &OperatorSet<S>, state: &S, role: RoleId) -> bool {
    ops.iter()
        .any(|(_, op)| op.role() == Some(role) && op.is_enabled(state))
}

/// The numbered list of operators shown to the acting role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MenuEntry {
    index: usize,
    name: String,
    description: Option<String>,
}

impl Menu {
    /// Build the menu for `role` in `state`.
    pub fn build<S>(ops: &OperatorSet<S>, state: &S, role: RoleId) -> Self {
        let entries = applicable(ops, state, role)
            .into_iter()
            .filter_map(|index| {
                ops.get(index).map(|op| MenuEntry {
                    index,
                    name: op.name(state),
                    description: op.description().map(str::to_string),
                })
            })
            .collect();
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is applicable.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operator index for menu number `n` (1-based).
    pub fn select(&self, n: usize) -> Option<usize> {
        n.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|entry| entry.index)
    }

    /// Menu lines, one per entry.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("  {}: {}", i + 1, entry.name))
    }

    /// Longer descriptions of the entries that have one, for the help text.
    pub fn details(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().enumerate().filter_map(|(i, entry)| {
            entry
                .description
                .as_ref()
                .map(|text| format!("  {}: {}\n       {text}", i + 1, entry.name))
        })
    }
}

/// A command typed at the main prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply the operator with this menu number.
    Apply(usize),
    /// Undo the last move.
    Back,
    /// Show the instructions.
    Help,
    /// End the session.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Parse a line of input. Blank input yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let command = match input.to_ascii_uppercase().as_str() {
            "B" => Self::Back,
            "H" => Self::Help,
            "Q" => Self::Quit,
            _ => match input.parse::<usize>() {
                Ok(n) => Self::Apply(n),
                Err(_) => Self::Unknown(input.to_string()),
            },
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ops() -> OperatorSet<u8> {
        [
            Operator::step("Anyone", |s: &u8| *s),
            Operator::step("First only", |s: &u8| *s)
                .for_role(RoleId(0))
                .describe("Only the first role may do this."),
            Operator::step("Second only", |s: &u8| *s).for_role(RoleId(1)),
            Operator::step("Never", |s: &u8| *s).when(|_| false),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn unrestricted_and_own_operators_are_offered() {
        assert_eq!(applicable(&ops(), &0, RoleId(0)), vec![0, 1]);
        assert_eq!(applicable(&ops(), &0, RoleId(1)), vec![0, 2]);
        assert_eq!(applicable(&ops(), &0, RoleId(2)), vec![0]);
    }

    #[test]
    fn own_move_ignores_unrestricted_operators() {
        assert!(has_own_move(&ops(), &0, RoleId(1)));
        assert!(!has_own_move(&ops(), &0, RoleId(2)));
    }

    #[test]
    fn menu_numbers_from_one() {
        let menu = Menu::build(&ops(), &0, RoleId(1));
        let lines: Vec<_> = menu.lines().collect();
        assert_eq!(lines, vec!["  1: Anyone", "  2: Second only"]);
        assert_eq!(menu.select(2), Some(2));
        assert_eq!(menu.select(0), None);
        assert_eq!(menu.select(3), None);
    }

    #[test]
    fn details_cover_described_entries_only() {
        let first = Menu::build(&ops(), &0, RoleId(0));
        let details: Vec<_> = first.details().collect();
        assert_eq!(
            details,
            vec!["  2: First only\n       Only the first role may do this."]
        );
        assert_eq!(Menu::build(&ops(), &0, RoleId(1)).details().count(), 0);
    }

    #[test]
    fn commands_are_trimmed_and_case_insensitive() {
        assert_eq!(Command::parse(" q "), Some(Command::Quit));
        assert_eq!(Command::parse("b"), Some(Command::Back));
        assert_eq!(Command::parse("H"), Some(Command::Help));
        assert_eq!(Command::parse(" 12\t"), Some(Command::Apply(12)));
        assert_eq!(Command::parse("   "), None);
        assert_eq!(
            Command::parse("-1"),
            Some(Command::Unknown("-1".to_string()))
        );
        assert_eq!(
            Command::parse("go"),
            Some(Command::Unknown("go".to_string()))
        );
    }

    proptest! {
        #[test]
        fn restricted_operators_never_reach_other_roles(
            owners in proptest::collection::vec(proptest::option::of(0usize..4), 1..12),
            acting in 0usize..4,
        ) {
            let set: OperatorSet<bool> = owners
                .iter()
                .enumerate()
                .map(|(i, owner)| {
                    let op = Operator::step(format!("op {i}"), |s: &bool| !*s)
                        .when(|s: &bool| *s);
                    match owner {
                        Some(r) => op.for_role(RoleId(*r)),
                        None => op,
                    }
                })
                .collect();
            for index in applicable(&set, &true, RoleId(acting)) {
                let owner = set.get(index).and_then(|op| op.role());
                prop_assert!(owner.is_none() || owner == Some(RoleId(acting)));
            }
            prop_assert!(applicable(&set, &false, RoleId(acting)).is_empty());
        }
    }
}

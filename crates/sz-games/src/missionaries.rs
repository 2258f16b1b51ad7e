use std::fmt;

use sz_core::{
    Formulation, Metadata, Operator, Problem, ProblemConfig, Role, RoleSpec, State, SzResult,
};

/// Missionaries and cannibals on each side at the start.
pub const PARTY: u8 = 3;

/// Legal boat loads as `(missionaries, cannibals)`. Someone must steer and
/// the boat holds three.
pub const LOADS: [(u8, u8); 5] = [(1, 0), (2, 0), (3, 0), (1, 1), (2, 1)];

/// A river bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Where everyone starts.
    Left,
    /// Where everyone must end up.
    Right,
}

impl Bank {
    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    fn across(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Who is where, and which side the boat is on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct River {
    /// Missionaries per bank, indexed left then right.
    pub missionaries: [u8; 2],
    /// Cannibals per bank, indexed left then right.
    pub cannibals: [u8; 2],
    /// The bank the boat is tied up at.
    pub boat: Bank,
}

impl Default for River {
    fn default() -> Self {
        Self {
            missionaries: [PARTY, 0],
            cannibals: [PARTY, 0],
            boat: Bank::Left,
        }
    }
}

/// Missionaries are safe when absent or not outnumbered.
fn safe(missionaries: u8, cannibals: u8) -> bool {
    missionaries == 0 || missionaries >= cannibals
}

impl River {
    /// Whether `m` missionaries and `c` cannibals may cross from the boat's
    /// bank without anyone being outnumbered on either side.
    pub fn can_cross(&self, m: u8, c: u8) -> bool {
        if m < 1 {
            return false;
        }
        let here = self.boat.index();
        let there = self.boat.across().index();
        if self.missionaries[here] < m || self.cannibals[here] < c {
            return false;
        }
        safe(self.missionaries[here] - m, self.cannibals[here] - c)
            && safe(self.missionaries[there] + m, self.cannibals[there] + c)
    }

    /// The river after the crossing. Assumes [`River::can_cross`].
    pub fn cross(&self, m: u8, c: u8) -> Self {
        let here = self.boat.index();
        let there = self.boat.across().index();
        let mut next = self.clone();
        next.missionaries[here] -= m;
        next.cannibals[here] -= c;
        next.missionaries[there] += m;
        next.cannibals[there] += c;
        next.boat = self.boat.across();
        next
    }
}

impl fmt::Display for River {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " M on left: {}", self.missionaries[0])?;
        writeln!(f, " C on left: {}", self.cannibals[0])?;
        writeln!(f, "   M on right: {}", self.missionaries[1])?;
        writeln!(f, "   C on right: {}", self.cannibals[1])?;
        write!(f, " boat is on the {}.", self.boat)
    }
}

impl State for River {
    fn is_goal(&self) -> bool {
        self.missionaries[1] == PARTY && self.cannibals[1] == PARTY
    }

    fn goal_message(&self) -> String {
        "Congratulations on successfully guiding the missionaries and cannibals across the river!"
            .to_string()
    }
}

/// The classic river-crossing puzzle with a three-seat boat.
pub struct Missionaries {
    metadata: Metadata,
}

impl Default for Missionaries {
    fn default() -> Self {
        Self::new()
    }
}

impl Missionaries {
    /// Create the formulation.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new("Missionaries and Cannibals")
                .with_version("3.0")
                .with_author("S. Tanimoto")
                .with_created("2026-Feb")
                .with_description(
                    "Three missionaries and three cannibals start on the left bank of a river. \
                     Move them all to the right bank. The boat carries at most three people, one \
                     of whom must be a missionary to steer. Missionaries must never be \
                     outnumbered by cannibals on either bank or in the boat.",
                ),
        }
    }
}

impl Formulation for Missionaries {
    type State = River;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn roles(&self) -> RoleSpec {
        RoleSpec::new(vec![Role::new(
            "Solver",
            "Guides missionaries and cannibals across the river.",
        )])
        .with_min_players_to_start(1)
        .with_max_players(1)
    }

    fn initialize(&self, _: &ProblemConfig) -> SzResult<Problem<River>> {
        let ops = LOADS.iter().map(|&(m, c)| {
            Operator::step(
                format!("Cross the river with {m} missionaries and {c} cannibals"),
                move |r: &River| r.cross(m, c),
            )
            .when(move |r: &River| r.can_cross(m, c))
        });
        Ok(Problem::new(River::default(), ops.collect()))
    }
}

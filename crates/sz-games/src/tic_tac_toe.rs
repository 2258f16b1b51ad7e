use std::fmt;

use sz_core::{
    Formulation, Metadata, Operator, OperatorSet, Problem, ProblemConfig, Role, RoleId, RoleSpec,
    State, SzResult,
};

/// A player's mark, which doubles as their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Moves first.
    X,
    /// Moves second.
    O,
}

impl Mark {
    /// The role that places this mark.
    pub fn role(self) -> RoleId {
        match self {
            Self::X => RoleId(0),
            Self::O => RoleId(1),
        }
    }

    fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// The role of anyone who only watches.
pub const OBSERVER: RoleId = RoleId(2);

/// A finished line of three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Win {
    /// Who completed it.
    pub mark: Mark,
    /// Where, e.g. `"Win for X in row 2"`.
    pub description: String,
}

/// The board and whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Cells by row, then column.
    pub cells: [[Option<Mark>; 3]; 3],
    /// The mark to be placed next.
    pub turn: Mark,
    note: Option<String>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [[None; 3]; 3],
            turn: Mark::X,
            note: None,
        }
    }
}

impl Board {
    /// Whether `mark` may go at `(row, col)` now.
    pub fn can_place(&self, mark: Mark, row: usize, col: usize) -> bool {
        self.turn == mark && self.cells[row][col].is_none() && self.find_win().is_none()
    }

    /// Place the current mark and pass the turn.
    pub fn place(&self, row: usize, col: usize) -> Self {
        let mut next = self.clone();
        next.cells[row][col] = Some(self.turn);
        next.turn = self.turn.other();
        next.note = Some(format!(
            "{} chooses row {} and column {}.",
            self.turn,
            row + 1,
            col + 1
        ));
        next
    }

    /// Whether any cell is still empty.
    pub fn moves_left(&self) -> bool {
        self.cells.iter().flatten().any(Option::is_none)
    }

    /// The first completed line, checking X before O.
    pub fn find_win(&self) -> Option<Win> {
        [Mark::X, Mark::O]
            .into_iter()
            .find_map(|mark| self.line_for(mark).map(|place| Win {
                mark,
                description: format!("Win for {mark} {place}"),
            }))
    }

    fn line_for(&self, mark: Mark) -> Option<String> {
        let is = |r: usize, c: usize| self.cells[r][c] == Some(mark);
        if let Some(r) = (0..3).find(|&r| (0..3).all(|c| is(r, c))) {
            return Some(format!("in row {}", r + 1));
        }
        if let Some(c) = (0..3).find(|&c| (0..3).all(|r| is(r, c))) {
            return Some(format!("in column {}", c + 1));
        }
        if (0..3).all(|i| is(i, i)) {
            return Some("on main diagonal".to_string());
        }
        if (0..3).all(|i| is(2 - i, i)) {
            return Some("on alternate diagonal".to_string());
        }
        None
    }

    fn status(&self) -> String {
        match self.find_win() {
            Some(win) => format!("Winner is {}", win.mark),
            None if !self.moves_left() => "Game over. It's a draw!".to_string(),
            None => format!("It's {}'s turn.", self.turn),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, "\n-----\n")?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|c| c.map_or_else(|| " ".to_string(), |m| m.to_string()))
                .collect();
            write!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl State for Board {
    fn is_goal(&self) -> bool {
        self.find_win().is_some() || !self.moves_left()
    }

    fn goal_message(&self) -> String {
        match self.find_win() {
            Some(win) => format!(
                "{}.  The winner is {}. Thanks for playing Tic-Tac-Toe.",
                win.description, win.mark
            ),
            None => "It's a draw! Thanks for playing Tic-Tac-Toe.".to_string(),
        }
    }

    fn view_for_role(&self, role: RoleId) -> Option<String> {
        let name = match role.0 {
            0 => "X",
            1 => "O",
            _ => "Observer",
        };
        Some(format!("Current view for {name}:\n{self}\n{}", self.status()))
    }

    fn current_role(&self) -> Option<RoleId> {
        Some(self.turn.role())
    }

    fn transition_message(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Tic-Tac-Toe for two players, with room for observers.
pub struct TicTacToe {
    metadata: Metadata,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    /// Create the formulation.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new("Tic-Tac-Toe")
                .with_version("2.0")
                .with_author("S. Tanimoto")
                .with_created("2026-Feb")
                .with_description(
                    "Players take turns placing X and O marks on a 3x3 grid. Three in a line \
                     (horizontally, vertically, or diagonally) wins. If the grid is filled \
                     without a winner, the game is a draw.",
                ),
        }
    }
}

impl Formulation for TicTacToe {
    type State = Board;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn roles(&self) -> RoleSpec {
        RoleSpec::new(vec![
            Role::new("X", "Places X marks. Goes first."),
            Role::new("O", "Places O marks. Goes second."),
            Role::new("Observer", "Watches the game without playing."),
        ])
        .with_min_players_to_start(2)
        .with_max_players(27)
        .allow_multiple_roles_per_player()
    }

    fn initialize(&self, _: &ProblemConfig) -> SzResult<Problem<Board>> {
        let mut ops = OperatorSet::new();
        for mark in [Mark::X, Mark::O] {
            for row in 0..3 {
                for col in 0..3 {
                    ops.push(
                        Operator::step(
                            format!("Place an {mark} in row {}, column {}", row + 1, col + 1),
                            move |b: &Board| b.place(row, col),
                        )
                        .when(move |b: &Board| b.can_place(mark, row, col))
                        .for_role(mark.role()),
                    );
                }
            }
        }
        Ok(Problem::new(Board::default(), ops))
    }
}

use std::fmt;

use sz_core::{
    Formulation, Metadata, Operator, Problem, ProblemConfig, Role, RoleId, RoleSpec, State,
    SzResult,
};

/// Rounds in a match.
pub const ROUNDS: u8 = 3;

/// Player 1's role.
pub const P1: RoleId = RoleId(0);
/// Player 2's role.
pub const P2: RoleId = RoleId(1);

/// A throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl Choice {
    /// Every throw, in menu order.
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    fn rank(self) -> u8 {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rock => write!(f, "Rock"),
            Self::Paper => write!(f, "Paper"),
            Self::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Where a round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Both players pick, hidden from each other.
    Choosing,
    /// Both picks are revealed and scored.
    Scoring,
    /// The final round has been scored.
    GameOver,
}

/// One moment in a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    /// Current round, starting at 1.
    pub round: u8,
    /// Cumulative scores for P1 and P2.
    pub scores: [i32; 2],
    /// This round's throws, `None` until made.
    pub choices: [Option<Choice>; 2],
    /// Where the round stands.
    pub phase: Phase,
    note: Option<String>,
}

impl Default for Match {
    fn default() -> Self {
        Self {
            round: 1,
            scores: [0, 0],
            choices: [None, None],
            phase: Phase::Choosing,
            note: None,
        }
    }
}

impl Match {
    /// Record a throw, scoring the round once both are in.
    pub fn choose(&self, player: RoleId, choice: Choice) -> Self {
        let mut next = self.clone();
        next.note = None;
        if let Some(slot) = next.choices.get_mut(player.0) {
            *slot = Some(choice);
        }
        if let [Some(first), Some(second)] = next.choices {
            next.score(first, second);
        }
        next
    }

    fn score(&mut self, first: Choice, second: Choice) {
        let result = match (3 + first.rank() - second.rank()) % 3 {
            1 => {
                self.scores[0] += 1;
                self.scores[1] -= 1;
                "P1 wins this round!   (P1: +1,  P2: -1)"
            }
            2 => {
                self.scores[0] -= 1;
                self.scores[1] += 1;
                "P2 wins this round!   (P1: -1,  P2: +1)"
            }
            _ => "Draw, scores unchanged.",
        };
        self.note = Some(format!(
            "P1 chose {first}.  P2 chose {second}.\n{result}\nScores after round {}: P1 = {},  P2 = {}",
            self.round, self.scores[0], self.scores[1]
        ));
        self.phase = if self.round == ROUNDS {
            Phase::GameOver
        } else {
            Phase::Scoring
        };
    }

    /// Clear the throws and move to the next round.
    pub fn next_round(&self) -> Self {
        Self {
            round: self.round + 1,
            scores: self.scores,
            choices: [None, None],
            phase: Phase::Choosing,
            note: None,
        }
    }

    fn can_choose(&self, player: RoleId) -> bool {
        self.phase == Phase::Choosing && self.choices.get(player.0).is_some_and(Option::is_none)
    }
}

fn pick(choice: Option<Choice>) -> String {
    choice.map_or_else(|| "?".to_string(), |c| c.to_string())
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} of {ROUNDS}", self.round)?;
        writeln!(
            f,
            "Scores:  P1 = {},  P2 = {}",
            self.scores[0], self.scores[1]
        )?;
        if self.phase == Phase::Choosing {
            for (label, choice) in ["P1", "P2"].iter().zip(self.choices) {
                let status = if choice.is_some() { "Made" } else { "Pending" };
                writeln!(f, "{label} choice this round: {status}")?;
            }
            return Ok(());
        }
        writeln!(f, "P1 chose: {}", pick(self.choices[0]))?;
        write!(f, "P2 chose: {}", pick(self.choices[1]))?;
        if self.phase == Phase::GameOver {
            write!(f, "\n-- Game Over --")?;
        }
        Ok(())
    }
}

impl State for Match {
    fn is_goal(&self) -> bool {
        self.phase == Phase::GameOver
    }

    fn goal_message(&self) -> String {
        let [s1, s2] = self.scores;
        let result = match s1.cmp(&s2) {
            std::cmp::Ordering::Greater => "Player 1 wins the match!",
            std::cmp::Ordering::Less => "Player 2 wins the match!",
            std::cmp::Ordering::Equal => "The match is a draw!",
        };
        format!("{result}  Final scores: P1 = {s1},  P2 = {s2}.")
    }

    fn is_parallel(&self) -> bool {
        self.phase == Phase::Choosing
    }

    fn current_role(&self) -> Option<RoleId> {
        match self.phase {
            Phase::Choosing if self.choices[0].is_some() => Some(P2),
            _ => Some(P1),
        }
    }

    fn transition_message(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// A best-of-three match with simultaneous throws each round.
pub struct RockPaperScissors {
    metadata: Metadata,
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new()
    }
}

impl RockPaperScissors {
    /// Create the formulation.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new("Rock-Paper-Scissors")
                .with_version("1.0")
                .with_author("S. Tanimoto")
                .with_created("2026-Feb")
                .with_description(format!(
                    "A two-player Rock-Paper-Scissors match over {ROUNDS} rounds. Each round both \
                     players simultaneously choose Rock, Paper, or Scissors. Winner of a round \
                     gets +1; loser gets -1; ties score 0. Highest cumulative score after all \
                     rounds wins the match."
                )),
        }
    }
}

impl Formulation for RockPaperScissors {
    type State = Match;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn roles(&self) -> RoleSpec {
        RoleSpec::new(vec![
            Role::new("P1", "Player 1. Moves first when turns are taken in order."),
            Role::new("P2", "Player 2."),
        ])
        .with_min_players_to_start(2)
        .with_max_players(2)
    }

    fn initialize(&self, _: &ProblemConfig) -> SzResult<Problem<Match>> {
        let mut ops: sz_core::OperatorSet<Match> = [(P1, "P1"), (P2, "P2")]
            .into_iter()
            .flat_map(|(role, label)| {
                Choice::ALL.into_iter().map(move |choice| {
                    Operator::step(format!("{label} chooses {choice}"), move |m: &Match| {
                        m.choose(role, choice)
                    })
                    .when(move |m: &Match| m.can_choose(role))
                    .for_role(role)
                })
            })
            .collect();
        ops.push(
            Operator::step("Start next round", Match::next_round)
                .when(|m: &Match| m.phase == Phase::Scoring && m.round < ROUNDS),
        );
        Ok(Problem::new(Match::default(), ops))
    }
}

use std::cmp::Ordering;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sz_core::{
    Arg, Formulation, Metadata, Operator, ParamDescriptor, Problem, ProblemConfig, Role, RoleSpec,
    State, SzResult, TransitionError, int_arg,
};

/// Youngest possible secret age.
pub const MIN_AGE: i64 = 14;
/// Oldest possible secret age.
pub const MAX_AGE: i64 = 21;

/// Progress of the guesser. The secret itself lives in the operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guesses {
    /// Guesses made so far.
    pub count: u32,
    /// Whether the last guess was right.
    pub won: bool,
    note: Option<String>,
}

impl Guesses {
    fn start() -> Self {
        Self {
            count: 0,
            won: false,
            note: None,
        }
    }
}

impl fmt::Display for Guesses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You've made {} guess(es) so far.", self.count)
    }
}

impl State for Guesses {
    fn is_goal(&self) -> bool {
        self.won
    }

    fn goal_message(&self) -> String {
        "You guessed it!".to_string()
    }

    fn transition_message(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// How the secret age is chosen on each initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Secret {
    Random,
    Seeded(u64),
    Fixed(i64),
}

/// A single-player game with a random secret and one bounded integer
/// parameter.
pub struct GuessMyAge {
    metadata: Metadata,
    secret: Secret,
}

impl Default for GuessMyAge {
    fn default() -> Self {
        Self::new()
    }
}

impl GuessMyAge {
    /// A fresh random secret per session.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new("Guess-My-Age")
                .with_version("1.0")
                .with_author("S. Tanimoto")
                .with_created("2026-Feb")
                .with_description(
                    "A simple single-player game that demonstrates random game instances and a \
                     parameterized operator. The computer picks a secret age; the player guesses \
                     until correct.",
                ),
            secret: Secret::Random,
        }
    }

    /// Draw the secret from a seeded generator for reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.secret = Secret::Seeded(seed);
        self
    }

    /// Use a known secret.
    pub fn with_secret(mut self, age: i64) -> Self {
        self.secret = Secret::Fixed(age.clamp(MIN_AGE, MAX_AGE));
        self
    }

    fn draw_secret(&self) -> i64 {
        match self.secret {
            Secret::Random => rand::rng().random_range(MIN_AGE..=MAX_AGE),
            Secret::Seeded(seed) => StdRng::seed_from_u64(seed).random_range(MIN_AGE..=MAX_AGE),
            Secret::Fixed(age) => age,
        }
    }
}

fn guess(secret: i64, state: &Guesses, args: &[Arg]) -> Result<Guesses, TransitionError> {
    let age = int_arg(args, 0)?;
    let note = match age.cmp(&secret) {
        Ordering::Less => format!("{age} is a nice guess. Nice try. Too low. "),
        Ordering::Greater => format!("{age} is a nice guess. Nice try. Too high. "),
        Ordering::Equal => {
            format!("{age} is a nice guess. You got it!  The secret age was {secret}.")
        }
    };
    Ok(Guesses {
        count: state.count + 1,
        won: age == secret,
        note: Some(note),
    })
}

impl Formulation for GuessMyAge {
    type State = Guesses;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn roles(&self) -> RoleSpec {
        RoleSpec::new(vec![Role::new(
            "Age Guesser",
            "Tries to guess the computer-chosen secret age.",
        )])
        .with_min_players_to_start(1)
        .with_max_players(1)
    }

    fn initialize(&self, _: &ProblemConfig) -> SzResult<Problem<Guesses>> {
        let secret = self.draw_secret();
        let op = Operator::new("Guess my age", move |s: &Guesses, args: &[Arg]| {
            guess(secret, s, args)
        })
        .with_params(vec![ParamDescriptor::int("age", MIN_AGE, MAX_AGE)]);
        Ok(Problem::new(Guesses::start(), [op].into_iter().collect()))
    }
}

//! The built-in formulations, looked up by name.

use strsim::jaro_winkler;
use sz_engine::Playable;
use sz_games::{CountToTen, GuessMyAge, Missionaries, RockPaperScissors, TicTacToe, TrivialWriting};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGEST_THRESHOLD: f64 = 0.75;

/// One playable formulation.
pub struct Entry {
    /// Name used on the command line.
    pub key: &'static str,
    /// Other accepted names.
    pub aliases: &'static [&'static str],
    build: fn(Option<u64>) -> Box<dyn Playable>,
}

impl Entry {
    /// Construct the formulation, seeding its randomness if it has any.
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Playable> {
        (self.build)(seed)
    }
}

fn count_to_ten(_: Option<u64>) -> Box<dyn Playable> {
    Box::new(CountToTen::new())
}

fn guess_my_age(seed: Option<u64>) -> Box<dyn Playable> {
    match seed {
        Some(seed) => Box::new(GuessMyAge::new().with_seed(seed)),
        None => Box::new(GuessMyAge::new()),
    }
}

fn missionaries(_: Option<u64>) -> Box<dyn Playable> {
    Box::new(Missionaries::new())
}

fn rock_paper_scissors(_: Option<u64>) -> Box<dyn Playable> {
    Box::new(RockPaperScissors::new())
}

fn tic_tac_toe(_: Option<u64>) -> Box<dyn Playable> {
    Box::new(TicTacToe::new())
}

fn trivial_writing(_: Option<u64>) -> Box<dyn Playable> {
    Box::new(TrivialWriting::new())
}

/// Every built-in formulation, in listing order.
pub const ENTRIES: &[Entry] = &[
    Entry {
        key: "count-to-ten",
        aliases: &["count"],
        build: count_to_ten,
    },
    Entry {
        key: "guess-my-age",
        aliases: &["gma", "guess"],
        build: guess_my_age,
    },
    Entry {
        key: "missionaries",
        aliases: &["mc", "missionaries-and-cannibals"],
        build: missionaries,
    },
    Entry {
        key: "rock-paper-scissors",
        aliases: &["rps"],
        build: rock_paper_scissors,
    },
    Entry {
        key: "tic-tac-toe",
        aliases: &["ttt"],
        build: tic_tac_toe,
    },
    Entry {
        key: "trivial-writing",
        aliases: &["writing", "trivial-writing-game"],
        build: trivial_writing,
    },
];

/// Lowercase, with spaces and underscores read as hyphens.
fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

/// Find a formulation by key or alias.
pub fn find(name: &str) -> Option<&'static Entry> {
    let name = normalize(name);
    ENTRIES
        .iter()
        .find(|e| e.key == name || e.aliases.contains(&name.as_str()))
}

/// The closest key to a name that matched nothing.
pub fn suggest(name: &str) -> Option<&'static str> {
    let name = normalize(name);
    let name = name.as_str();
    ENTRIES
        .iter()
        .flat_map(|e| {
            std::iter::once(e.key)
                .chain(e.aliases.iter().copied())
                .map(move |candidate| (e.key, jaro_winkler(name, candidate)))
        })
        .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_aliases_resolve() {
        assert_eq!(find("tic-tac-toe").unwrap().key, "tic-tac-toe");
        assert_eq!(find("TTT").unwrap().key, "tic-tac-toe");
        assert_eq!(find("Guess_My_Age").unwrap().key, "guess-my-age");
        assert_eq!(find(" Trivial Writing Game ").unwrap().key, "trivial-writing");
        assert!(find("chess").is_none());
    }

    #[test]
    fn near_misses_get_suggestions() {
        assert_eq!(suggest("tic-tac-tow"), Some("tic-tac-toe"));
        assert_eq!(suggest("misionaries"), Some("missionaries"));
        assert_eq!(suggest("zzzz"), None);
    }

    #[test]
    fn every_entry_builds_a_valid_formulation() {
        for entry in ENTRIES {
            let game = entry.build(Some(1));
            game.role_spec().validate().unwrap();
            assert!(!game.summary().name.is_empty(), "{}", entry.key);
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut names: Vec<_> = ENTRIES
            .iter()
            .flat_map(|e| std::iter::once(e.key).chain(e.aliases.iter().copied()))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}

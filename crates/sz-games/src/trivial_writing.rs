use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use sz_core::{
    Arg, Formulation, Metadata, Operator, ParamDescriptor, Problem, ProblemConfig, Role, RoleSpec,
    State, SzResult, TransitionError, text_arg,
};

/// Seed content for a new draft.
pub const PLACEHOLDER: &str =
    "[Replace this placeholder text with your own writing, then save and exit.]\n\n";

/// Draft file name inside the session folder.
pub const DRAFT_FILE: &str = "draft.txt";

/// Where the draft goes when the engine supplied no session folder.
pub const FALLBACK_FOLDER: &str = "play-time-dynamic-docs/Trivial-Writing-Game/session-test";

/// Lowercased words with their counts, most frequent first. Ties keep the
/// order of first appearance.
pub fn word_counts(text: &str) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let words = text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty());
    for word in words {
        let word = word.to_lowercase();
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|w| {
            let n = counts.get(&w).copied().unwrap_or_default();
            (w, n)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// A word-frequency report for `text`.
pub fn analyze(text: &str) -> (usize, String) {
    let counts = word_counts(text);
    if counts.is_empty() {
        return (0, "No words found in the document.".to_string());
    }
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let mut report = format!(
        "Total words: {total}\n\n{:<20}  {:>5}\n{}",
        "Word",
        "Count",
        "-".repeat(27)
    );
    for (word, n) in &counts {
        report.push_str(&format!("\n{word:<20}  {n:>5}"));
    }
    (total, report)
}

/// Before and after the one edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Draft {
    /// Waiting for the writer.
    Writing,
    /// Edited and analyzed.
    Done {
        /// Words in the document.
        total: usize,
        /// The frequency table.
        report: String,
    },
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writing => write!(f, "Phase: Writing.  Edit your document when ready."),
            Self::Done { total, .. } => write!(f, "Phase: Done.  Total words written: {total}."),
        }
    }
}

impl State for Draft {
    fn is_goal(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    fn goal_message(&self) -> String {
        match self {
            Self::Done { total, .. } => {
                format!("Document analysis complete!  Total words written: {total}.")
            }
            Self::Writing => "Keep writing.".to_string(),
        }
    }

    fn transition_message(&self) -> Option<&str> {
        match self {
            Self::Done { report, .. } => Some(report.as_str()),
            Self::Writing => None,
        }
    }
}

/// Edit one document in an external editor and get a word-frequency table.
pub struct TrivialWriting {
    metadata: Metadata,
}

impl Default for TrivialWriting {
    fn default() -> Self {
        Self::new()
    }
}

impl TrivialWriting {
    /// Create the formulation.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new("Trivial Writing Game")
                .with_version("1.0")
                .with_author("S. Tanimoto")
                .with_created("2026-Feb")
                .with_description(
                    "Write anything you like in your editor. When you save and exit, the game \
                     reports how many words you wrote and how often each one appears.",
                ),
        }
    }
}

fn finish(_: &Draft, args: &[Arg]) -> Result<Draft, TransitionError> {
    let (total, report) = analyze(text_arg(args, 0)?);
    Ok(Draft::Done { total, report })
}

impl Formulation for TrivialWriting {
    type State = Draft;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn roles(&self) -> RoleSpec {
        RoleSpec::new(vec![Role::new(
            "Writer",
            "Edits a document and receives word-count feedback.",
        )])
        .with_max_players(1)
    }

    fn initialize(&self, config: &ProblemConfig) -> SzResult<Problem<Draft>> {
        let folder = config
            .session_folder()
            .map_or_else(|| PathBuf::from(FALLBACK_FOLDER), Path::to_path_buf);
        let edit = Operator::new("Edit your writing", finish)
            .with_params(vec![ParamDescriptor::file_edit(
                "draft",
                folder.join(DRAFT_FILE),
                PLACEHOLDER,
            )])
            .when(|d: &Draft| *d == Draft::Writing);
        Ok(Problem::new(Draft::Writing, [edit].into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_lowercased_and_ranked() {
        let counts = word_counts("The cat saw the dog. THE end, cat!");
        assert_eq!(
            counts,
            vec![
                ("the".to_string(), 3),
                ("cat".to_string(), 2),
                ("saw".to_string(), 1),
                ("dog".to_string(), 1),
                ("end".to_string(), 1),
            ]
        );
    }

    #[test]
    fn apostrophes_split_words() {
        let counts = word_counts("don't");
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn report_layout() {
        let (total, report) = analyze("one two two");
        assert_eq!(total, 3);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines[0], "Total words: 3");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], format!("{:<20}  {:>5}", "Word", "Count"));
        assert_eq!(lines[4], format!("{:<20}  {:>5}", "two", 2));
    }

    #[test]
    fn empty_document() {
        assert_eq!(analyze("  \n\n").1, "No words found in the document.");
        assert_eq!(analyze("").0, 0);
    }

    #[test]
    fn draft_lives_in_the_session_folder() {
        let problem = TrivialWriting::new()
            .initialize(&ProblemConfig::with_session_folder("/tmp/s001"))
            .unwrap();
        assert!(problem.operators.has_file_edit_params());
        let params = problem
            .operators
            .get(0)
            .unwrap()
            .params()
            .resolve(&problem.initial);
        assert_eq!(
            params[0],
            ParamDescriptor::file_edit("draft", Path::new("/tmp/s001/draft.txt"), PLACEHOLDER)
        );
    }

    #[test]
    fn fallback_folder_without_config() {
        let problem = TrivialWriting::new()
            .initialize(&ProblemConfig::default())
            .unwrap();
        let params = problem
            .operators
            .get(0)
            .unwrap()
            .params()
            .resolve(&problem.initial);
        assert_eq!(
            params[0].kind,
            sz_core::ParamKind::FileEdit {
                path: PathBuf::from(FALLBACK_FOLDER).join(DRAFT_FILE),
                placeholder: PLACEHOLDER.to_string(),
            }
        );
    }

    #[test]
    fn editing_finishes_the_game() {
        let problem = TrivialWriting::new()
            .initialize(&ProblemConfig::default())
            .unwrap();
        let op = problem.operators.get(0).unwrap();
        let done = op
            .apply(&problem.initial, &[Arg::Text("Hello hello world\n".into())])
            .unwrap();
        assert!(done.is_goal());
        assert_eq!(
            done.goal_message(),
            "Document analysis complete!  Total words written: 3."
        );
        assert_eq!(done.to_string(), "Phase: Done.  Total words written: 3.");
        assert!(!op.is_enabled(&done));
    }
}

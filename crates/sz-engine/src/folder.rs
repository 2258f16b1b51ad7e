//! Per-session working folders for formulations that write files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// Replace every character outside `[A-Za-z0-9_-]` with `-`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Create `<root>/<game>/session-<YYYY-MM-DD-HH-MM>-s<NNN>/`.
///
/// `NNN` is one more than the number of folders already started in the
/// same minute, bumped further if that name is taken.
pub fn create_session_folder(
    root: &Path,
    game_name: &str,
    now: NaiveDateTime,
) -> EngineResult<PathBuf> {
    let game_dir = root.join(sanitize_name(game_name));
    let prefix = format!("session-{}-s", now.format("%Y-%m-%d-%H-%M"));
    let folder_error = |path: &Path, source: std::io::Error| EngineError::SessionFolder {
        path: path.to_path_buf(),
        source,
    };

    let existing = match fs::read_dir(&game_dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
            .count(),
        Err(e) if e.kind() == ErrorKind::NotFound => 0,
        Err(e) => return Err(folder_error(&game_dir, e)),
    };

    let mut n = existing + 1;
    let mut folder = game_dir.join(format!("{prefix}{n:03}"));
    while folder.exists() {
        n += 1;
        folder = game_dir.join(format!("{prefix}{n:03}"));
    }

    fs::create_dir_all(&folder).map_err(|e| folder_error(&folder, e))?;
    info!(path = %folder.display(), "created session folder");
    Ok(folder)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn minute() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 14)
            .unwrap()
            .and_hms_opt(9, 5, 30)
            .unwrap()
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(sanitize_name("Trivial Writing Game"), "Trivial-Writing-Game");
        assert_eq!(sanitize_name("tic_tac-toe 2.0!"), "tic_tac-toe-2-0-");
    }

    #[test]
    fn sequence_numbers_count_same_minute_sessions() {
        let root = tempfile::tempdir().unwrap();
        let first = create_session_folder(root.path(), "Word Game", minute()).unwrap();
        let second = create_session_folder(root.path(), "Word Game", minute()).unwrap();
        assert!(first.ends_with("Word-Game/session-2026-02-14-09-05-s001"));
        assert!(second.ends_with("Word-Game/session-2026-02-14-09-05-s002"));
        assert!(first.is_dir() && second.is_dir());
    }

    #[test]
    fn taken_numbers_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        let game = root.path().join("Game");
        fs::create_dir_all(game.join("session-2026-02-14-09-05-s002")).unwrap();
        // one existing folder means s002 is tried first, then bumped
        let folder = create_session_folder(root.path(), "Game", minute()).unwrap();
        assert!(folder.ends_with("session-2026-02-14-09-05-s003"));
    }

    #[test]
    fn other_minutes_do_not_count() {
        let root = tempfile::tempdir().unwrap();
        let game = root.path().join("Game");
        fs::create_dir_all(game.join("session-2026-02-14-09-04-s001")).unwrap();
        let folder = create_session_folder(root.path(), "Game", minute()).unwrap();
        assert!(folder.ends_with("session-2026-02-14-09-05-s001"));
    }
}

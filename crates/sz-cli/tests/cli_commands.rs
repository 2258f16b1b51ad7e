//! Integration tests for the `sz` command-line interface.
#![allow(deprecated)] // assert_cmd marks Command::cargo_bin deprecated

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sz() -> Command {
    let mut cmd = Command::cargo_bin("sz").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Guess every age from 14 to 21 in turn; one of them is the secret.
fn guess_everything() -> String {
    (14..=21).map(|age| format!("1\n{age}\n")).collect()
}

#[test]
fn list_shows_the_catalog() {
    sz().arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("guess-my-age"))
        .stdout(predicate::str::contains("Tic-Tac-Toe"))
        .stdout(predicate::str::contains("Missionaries and Cannibals"))
        .stdout(predicate::str::contains("6 formulations"));
}

#[test]
fn list_as_json() {
    let output = sz().args(["--list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let keys: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].as_str().unwrap().to_string())
        .collect();
    assert!(keys.contains(&"rock-paper-scissors".to_string()));
    assert_eq!(entries[1]["metadata"]["name"], "Guess-My-Age");
}

#[test]
fn unknown_formulation_suggests_a_name() {
    sz().arg("tic-tac-tow")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown formulation 'tic-tac-tow'"))
        .stderr(predicate::str::contains("did you mean 'tic-tac-toe'?"));
}

#[test]
fn missing_formulation_is_a_usage_error() {
    sz().assert().failure();
}

#[test]
fn scripted_guess_my_age_session() {
    sz().args(["guess-my-age", "--seed", "7", "--no-instructions"])
        .write_stdin(guess_everything())
        .assert()
        .success()
        .stdout(predicate::str::contains("Formulation: Guess-My-Age"))
        .stdout(predicate::str::contains("Single-player game."))
        .stdout(predicate::str::contains("is a nice guess."))
        .stdout(predicate::str::contains("You guessed it!"))
        .stdout(predicate::str::contains("Session finished.  Goodbye!"));
}

#[test]
fn quitting_reports_the_outcome_as_json() {
    let output = sz()
        .args(["gma", "--seed", "7", "--no-instructions", "--json"])
        .write_stdin("q\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["reason"], "user_quit");
    assert_eq!(outcome["steps"], 0);
    let transcript = String::from_utf8_lossy(&output.stderr);
    assert!(transcript.contains("Formulation: Guess-My-Age"));
}

#[test]
fn end_of_input_is_a_graceful_exit() {
    sz().args(["missionaries", "--no-instructions"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cross the river with 1 missionaries and 1 cannibals"));
}

#[test]
fn declared_players_fill_roles() {
    let docs = TempDir::new().unwrap();
    sz().args([
        "tic-tac-toe",
        "--player",
        "Ada",
        "--player",
        "Grace",
        "--no-instructions",
        "--docs-root",
    ])
    .arg(docs.path())
    .write_stdin("")
    .assert()
    .success()
    .stdout(predicate::str::contains("Ada"))
    .stdout(predicate::str::contains("Grace"));
}

#[test]
fn undo_at_the_start_is_reported() {
    sz().args(["count", "--no-instructions"])
        .write_stdin("b\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Already at the initial state; cannot go further back.",
        ));
}

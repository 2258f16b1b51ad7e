//! Built-in formulations for the SOLUZION session engine.
//!
//! Each module defines one game: its state type, its operators, and its
//! roles. The formulations are plain values, constructed on demand, so a
//! catalog can hold several of them side by side.

/// Reach ten by adding one to three at a time.
pub mod count_to_ten;
/// Guess a secret age between 14 and 21.
pub mod guess_my_age;
/// Ferry missionaries and cannibals across a river.
pub mod missionaries;
/// Best of three rounds of simultaneous Rock-Paper-Scissors.
pub mod rock_paper_scissors;
/// Two-player Tic-Tac-Toe with an optional observer.
pub mod tic_tac_toe;
/// Edit a document in an external editor and get a word count.
pub mod trivial_writing;

/// Re-export the formulations.
pub use count_to_ten::CountToTen;
pub use guess_my_age::GuessMyAge;
pub use missionaries::Missionaries;
pub use rock_paper_scissors::RockPaperScissors;
pub use tic_tac_toe::TicTacToe;
pub use trivial_writing::TrivialWriting;

//! Core domain types for the Spelling Bee
//!
//! This module contains the fundamental domain types with zero I/O.
//! All types here are pure, testable, and cheap to copy or share across workers.

mod letters;
mod pangram;
mod puzzle;
mod word;

pub use letters::LetterSet;
pub use pangram::Pangram;
pub use puzzle::{Puzzle, PuzzleError, accepts};
pub use word::{Word, WordError};

/// Number of distinct letters in a puzzle alphabet
pub const PUZZLE_LETTERS: usize = 7;

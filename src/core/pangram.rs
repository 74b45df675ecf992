//! Pangrams and their rotations

use super::{LetterSet, PUZZLE_LETTERS, Puzzle, Word};
use std::fmt;

/// Seven distinct letters taken from a dictionary word
///
/// Letters are held in alphabetical order; that order is both the canonical
/// string persisted with results and the rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pangram {
    letters: [u8; PUZZLE_LETTERS],
}

impl Pangram {
    /// Returns `Some` iff the word uses exactly seven distinct letters
    #[must_use]
    pub fn from_word(word: &Word) -> Option<Self> {
        Self::from_set(word.letters())
    }

    /// Parse a pangram back from its source word or canonical string
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Word::new(text).ok().as_ref().and_then(Self::from_word)
    }

    fn from_set(set: LetterSet) -> Option<Self> {
        if set.len() != PUZZLE_LETTERS {
            return None;
        }
        let mut letters = [0u8; PUZZLE_LETTERS];
        for (slot, letter) in letters.iter_mut().zip(set.iter()) {
            *slot = letter;
        }
        Some(Self { letters })
    }

    /// Sorted letters as a string, e.g. `"acdilor"` for "cordial"
    #[must_use]
    pub fn canonical(&self) -> String {
        self.letters.iter().map(|&b| b as char).collect()
    }

    #[inline]
    #[must_use]
    pub const fn letters(&self) -> &[u8; PUZZLE_LETTERS] {
        &self.letters
    }

    /// The seven puzzles obtained by making each letter in turn the required one
    ///
    /// Rotation `i` uses `letters[i]` as the required letter and the remaining
    /// six, in canonical order, as the others.
    pub fn rotations(&self) -> impl Iterator<Item = Puzzle> + '_ {
        (0..PUZZLE_LETTERS).filter_map(move |i| {
            let mut others = [0u8; PUZZLE_LETTERS - 1];
            let rest = self.letters[..i].iter().chain(&self.letters[i + 1..]);
            for (slot, &letter) in others.iter_mut().zip(rest) {
                *slot = letter;
            }
            // Letters are distinct by construction, so this never fails
            Puzzle::new(self.letters[i], &others).ok()
        })
    }
}

impl fmt::Display for Pangram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

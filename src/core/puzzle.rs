//! Puzzle definition and word matching
//!
//! A Puzzle is one required letter plus six optional letters. A word is an answer
//! when it uses only the puzzle's seven letters and contains the required one at
//! least once.

use super::{LetterSet, PUZZLE_LETTERS, Word};
use std::fmt;
use thiserror::Error;

const OTHER_LETTERS: usize = PUZZLE_LETTERS - 1;

/// One Spelling Bee puzzle: a required letter and six others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Puzzle {
    required: u8,
    others: [u8; OTHER_LETTERS],
    alphabet: LetterSet,
}

/// Error type for invalid puzzle letters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("Expected 7 letters with the required letter first, got {0}")]
    InvalidLength(usize),
    #[error("Expected exactly 6 letters besides the middle letter, got {0}")]
    InvalidOthersLength(usize),
    #[error("Middle letter must be a single letter, got '{0}'")]
    InvalidMiddle(String),
    #[error("'{0}' is not a letter")]
    InvalidLetter(char),
    #[error("Letter '{0}' appears more than once")]
    DuplicateLetter(char),
}

impl Puzzle {
    /// Create a puzzle from a required letter and the six other letters
    ///
    /// # Errors
    /// Returns `PuzzleError` if `others` is not exactly six letters, if any
    /// byte is not a lowercase ASCII letter, or if the seven letters are not
    /// all distinct (which also covers `required` appearing in `others`).
    pub fn new(required: u8, others: &[u8]) -> Result<Self, PuzzleError> {
        let others: [u8; OTHER_LETTERS] = others
            .try_into()
            .map_err(|_| PuzzleError::InvalidOthersLength(others.len()))?;

        let mut alphabet = LetterSet::EMPTY;
        for &letter in std::iter::once(&required).chain(others.iter()) {
            if !letter.is_ascii_lowercase() {
                return Err(PuzzleError::InvalidLetter(letter as char));
            }
            if alphabet.contains(letter) {
                return Err(PuzzleError::DuplicateLetter(letter as char));
            }
            alphabet.insert(letter);
        }

        Ok(Self {
            required,
            others,
            alphabet,
        })
    }

    /// Build a puzzle from command-line style input
    ///
    /// Without `middle`, `letters` must hold seven letters with the required
    /// letter first. With `middle`, `letters` holds exactly the other six.
    /// Input is case-insensitive.
    ///
    /// # Errors
    /// Returns `PuzzleError` when the lengths do not fit either form or the
    /// letters are not seven distinct ASCII letters.
    ///
    /// # Examples
    /// ```
    /// use spelling_bee::core::Puzzle;
    ///
    /// let puzzle = Puzzle::from_letters("cordail", None).unwrap();
    /// assert_eq!(puzzle.required(), 'c');
    ///
    /// let same = Puzzle::from_letters("ordail", Some("c")).unwrap();
    /// assert_eq!(puzzle, same);
    ///
    /// assert!(Puzzle::from_letters("anointedcy", None).is_err());
    /// ```
    pub fn from_letters(letters: &str, middle: Option<&str>) -> Result<Self, PuzzleError> {
        let letters = letters.trim().to_lowercase();

        if let Some(middle) = middle {
            let middle = middle.trim().to_lowercase();
            if middle.len() != 1 {
                return Err(PuzzleError::InvalidMiddle(middle));
            }
            return Self::new(middle.as_bytes()[0], letters.as_bytes());
        }

        match letters.as_bytes() {
            [required, others @ ..] if letters.len() == PUZZLE_LETTERS => {
                Self::new(*required, others)
            }
            _ => Err(PuzzleError::InvalidLength(letters.chars().count())),
        }
    }

    /// The letter every answer must contain
    #[inline]
    #[must_use]
    pub const fn required(&self) -> char {
        self.required as char
    }

    /// The six optional letters, in the order they were given
    #[must_use]
    pub fn others(&self) -> String {
        self.others.iter().map(|&b| b as char).collect()
    }

    /// All seven letters
    #[inline]
    #[must_use]
    pub const fn alphabet(&self) -> LetterSet {
        self.alphabet
    }

    /// Check whether a word answers this puzzle
    #[inline]
    #[must_use]
    pub fn accepts(&self, word: &Word) -> bool {
        word.has_letter(self.required) && word.letters().is_subset_of(self.alphabet)
    }

    /// All accepted words, sorted lexicographically
    ///
    /// Duplicates in the input are kept.
    #[must_use]
    pub fn matches<'a>(&self, words: &'a [Word]) -> Vec<&'a Word> {
        let mut found: Vec<&Word> = words.iter().filter(|w| self.accepts(w)).collect();
        found.sort_unstable();
        found
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.required(), self.others())
    }
}

/// String-level acceptance rule
///
/// Equivalent to a full-string match of `[others]*required[required+others]*`:
/// every character of `word` must be one of the seven letters and `required`
/// must occur at least once. An empty word is rejected.
///
/// # Examples
/// ```
/// use spelling_bee::core::accepts;
///
/// assert!(accepts("cordial", 'c', "ordail"));
/// assert!(!accepts("radial", 'c', "ordail"));
/// assert!(!accepts("cordials", 'c', "ordail"));
/// ```
#[must_use]
pub fn accepts(word: &str, required: char, others: &str) -> bool {
    !word.is_empty()
        && word.contains(required)
        && word.chars().all(|c| c == required || others.contains(c))
}

//! Letter sets as 26-bit masks

use std::fmt;

/// A set of lowercase ASCII letters stored as a bitmask
///
/// Bit `n` is set when the letter `b'a' + n` is a member. Iteration is
/// always alphabetical, which is what gives pangrams their canonical form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LetterSet(u32);

impl LetterSet {
    /// The empty set
    pub const EMPTY: Self = Self(0);

    /// Build a set from raw bytes, ignoring anything that is not `a..=z`
    #[must_use]
    pub fn from_letters(letters: &[u8]) -> Self {
        let mut set = Self::EMPTY;
        for &letter in letters {
            set.insert(letter);
        }
        set
    }

    /// Insert a letter. Returns `false` if it was not a lowercase ASCII letter.
    pub fn insert(&mut self, letter: u8) -> bool {
        match Self::bit(letter) {
            Some(bit) => {
                self.0 |= bit;
                true
            }
            None => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(self, letter: u8) -> bool {
        Self::bit(letter).is_some_and(|bit| self.0 & bit != 0)
    }

    /// Number of distinct letters in the set
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Letters in alphabetical order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..26u8).filter(move |n| self.0 & (1 << n) != 0).map(|n| b'a' + n)
    }

    #[inline]
    const fn bit(letter: u8) -> Option<u32> {
        if letter.is_ascii_lowercase() {
            Some(1 << (letter - b'a'))
        } else {
            None
        }
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{}", letter as char)?;
        }
        Ok(())
    }
}

//! Word list loading utilities
//!
//! Reads a dictionary file and applies the Spelling Bee word rules.

use crate::core::{Pangram, Word};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Shortest word the puzzle accepts
pub const MIN_WORD_LEN: usize = 4;

/// The rules a dictionary token must pass to become a puzzle word
///
/// Tokens must be lowercase and alphabetic in the file; capitalised tokens
/// (proper nouns) are dropped rather than folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryFilter {
    pub min_len: usize,
    /// Drop every word containing 's', a blunt way to keep plurals out
    pub exclude_s: bool,
}

impl Default for DictionaryFilter {
    fn default() -> Self {
        Self {
            min_len: MIN_WORD_LEN,
            exclude_s: false,
        }
    }
}

impl DictionaryFilter {
    /// Apply the filter to one raw token
    #[must_use]
    pub fn accept(&self, token: &str) -> Option<Word> {
        if token.len() < self.min_len
            || !token.bytes().all(|c| c.is_ascii_lowercase())
            || (self.exclude_s && token.contains('s'))
        {
            return None;
        }
        Word::new(token).ok()
    }

    /// Filter a whole text, keeping order and duplicates
    #[must_use]
    pub fn words_from_text(&self, content: &str) -> Vec<Word> {
        content
            .split_whitespace()
            .filter_map(|token| self.accept(token))
            .collect()
    }
}

/// Load words from a file
///
/// Returns the tokens that pass `filter`, in file order.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or opened.
///
/// # Examples
/// ```no_run
/// use spelling_bee::wordlists::{DictionaryFilter, load_from_file};
///
/// let words = load_from_file("/usr/share/dict/words", DictionaryFilter::default()).unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P, filter: DictionaryFilter) -> io::Result<Vec<Word>> {
    let content = fs::read_to_string(path)?;
    Ok(filter.words_from_text(&content))
}

/// Write a filtered copy of `source` as `<basename>.bee` inside `out_dir`
///
/// The output holds one word per line and can be passed back with `--dict`.
/// Returns the path written and the number of words in it.
///
/// # Errors
///
/// Returns an I/O error if the source cannot be read or the output written.
pub fn build_dictionary(
    source: &Path,
    filter: DictionaryFilter,
    out_dir: &Path,
) -> io::Result<(PathBuf, usize)> {
    let words = load_from_file(source, filter)?;

    let name = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", source.display()),
        )
    })?;
    let mut target = name.to_os_string();
    target.push(".bee");
    let target = out_dir.join(target);

    let mut out = BufWriter::new(fs::File::create(&target)?);
    for word in &words {
        writeln!(out, "{word}")?;
    }
    out.flush()?;

    Ok((target, words.len()))
}

/// The system word list for this platform
#[must_use]
pub fn default_word_list() -> PathBuf {
    if cfg!(target_os = "linux") {
        PathBuf::from("/usr/share/dict/linux.words")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/usr/share/dict/words")
    } else {
        PathBuf::from("./words")
    }
}

/// Every word with exactly seven distinct letters, in dictionary order
///
/// Words sharing a letter set are not collapsed; each one is its own pangram.
#[must_use]
pub fn find_pangrams(words: &[Word]) -> Vec<Pangram> {
    words.iter().filter_map(Pangram::from_word).collect()
}

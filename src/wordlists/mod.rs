//! Word lists for Spelling Bee solving
//!
//! Dictionary files are whitespace-delimited token lists; the loader applies the
//! game's rules to them once, after which the list is read-only.

pub mod loader;

pub use loader::{DictionaryFilter, build_dictionary, default_word_list, find_pangrams, load_from_file};

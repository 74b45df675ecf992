//! Spelling Bee Solver
//!
//! Solves the NYTimes Spelling Bee for one puzzle, or for every pangram in a
//! dictionary using a fixed pool of worker processes.
//!
//! # Quick Start
//!
//! ```rust
//! use spelling_bee::core::Puzzle;
//! use spelling_bee::wordlists::DictionaryFilter;
//!
//! let words = DictionaryFilter::default().words_from_text("accord cordial car radio");
//! let puzzle = Puzzle::from_letters("ordail", Some("c")).unwrap();
//!
//! let answers: Vec<&str> = puzzle.matches(&words).iter().map(|w| w.text()).collect();
//! assert_eq!(answers, vec!["accord", "cordial"]);
//! ```

// Core domain types
pub mod core;

// Dictionary files
pub mod wordlists;

// All-pangram batch engine
pub mod batch;

// Result persistence
pub mod sink;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

pub mod exit_code;
pub mod logging;

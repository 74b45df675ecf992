//! Command implementations

pub mod batch;
pub mod solve;

pub use batch::run_batch;
pub use solve::{SolveResult, solve_puzzle};

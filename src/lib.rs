//! Jigsaw Ambiguity Search Library
//!
//! Generates 5x5 jigsaw puzzles with a limited set of connector shapes,
//! enumerates every alternate way their pieces reassemble, and evolves
//! puzzles toward having exactly one alternate that differs from the
//! original as much as possible.

pub mod border;
pub mod center;
pub mod error;
pub mod evolution;
pub mod grid;
pub mod pieces;
pub mod puzzle;
pub mod solution;
pub mod solver;

pub use error::{Error, Result};
pub use evolution::{run_evolutionary_search, Candidate, SearchConfig, SearchReport};
pub use puzzle::Puzzle;
pub use solution::{PuzzleSolution, Similarity};
pub use solver::{find_valid_solutions, SearchContext, SolutionSummary, Solutions};

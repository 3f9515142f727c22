//! Directory traversal (spec §4.1).

pub mod parallel_walker;
pub mod walker;

pub use parallel_walker::ParallelWalker;
pub use walker::Walker;

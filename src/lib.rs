//! codegraph: walks a project tree and produces a structural analysis
//! report of per-file metrics, a cross-file structure graph, near-duplicate
//! function clones, code smells, and a derived narrative summary.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod language;
pub mod models;
pub mod output;
pub mod parsers;

pub use analysis::{analyze, source_snippet};
pub use error::{AnalysisError, Result};
pub use models::config::Settings;
pub use models::report::Report;
pub use models::snippet::SourceSnippet;

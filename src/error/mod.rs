//! Error handling: severity-tagged errors and recovery helpers.

pub mod context;
pub mod types;

pub use context::{handle_error, try_with_recovery, OptionExt, ResultExt};
pub use types::{AnalysisError, ErrorSeverity, Result};

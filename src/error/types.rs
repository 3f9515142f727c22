//! Error taxonomy for the analysis pipeline.
//!
//! Only the root-invalid case is allowed to propagate out of `analyze()` as
//! an `AnalysisError` (spec §7). Every other failure mode becomes a
//! `Warning` or `Issue` value inside the `Report` itself.

use std::fmt;
use std::path::PathBuf;

/// How serious an error is, independent of its specific cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("path does not exist or is not a directory: {path}")]
    InvalidPath {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("permission denied: {path}")]
    PermissionDenied {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("path '{path}' escapes the analyzed root")]
    PathEscapesRoot {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("invalid TOML: {source}")]
    TomlParse {
        #[from]
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("invalid glob pattern: {source}")]
    GlobPattern {
        #[from]
        source: glob::PatternError,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("invalid output format: {format}")]
    InvalidOutputFormat {
        format: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("failed to write output to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("failed to write to stdout: {source}")]
    StdoutWrite {
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("output directory not found: {path}")]
    OutputDirectoryNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("failed to serialize report: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("failed to serialize CSV: {source}")]
    CsvSerialize {
        #[from]
        source: csv::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    #[error("analysis interrupted")]
    Interrupted,
}

impl AnalysisError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AnalysisError::PermissionDenied { .. } => ErrorSeverity::Warning,
            AnalysisError::Config { .. }
            | AnalysisError::InvalidOutputFormat { .. }
            | AnalysisError::StdoutWrite { .. }
            | AnalysisError::OutputDirectoryNotFound { .. }
            | AnalysisError::PathEscapesRoot { .. }
            | AnalysisError::InvalidPath { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidPath { path, .. } => format!(
                "'{}' does not exist or is not a directory. Check the --path argument.",
                path.display()
            ),
            AnalysisError::PermissionDenied { path, .. } => format!(
                "Permission denied reading '{}'. It was skipped; the rest of the tree was still analyzed.",
                path.display()
            ),
            AnalysisError::ConfigNotFound { path, .. } => format!(
                "Configuration file '{}' was not found.",
                path.display()
            ),
            AnalysisError::PathEscapesRoot { path, .. } => format!(
                "'{}' is outside the analyzed root and was rejected.",
                path.display()
            ),
            other => other.to_string(),
        }
    }

    pub fn io_error(source: std::io::Error) -> Self {
        AnalysisError::Io {
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        AnalysisError::PermissionDenied {
            path,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AnalysisError::Config {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub fn invalid_path(path: PathBuf) -> Self {
        AnalysisError::InvalidPath {
            path,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub fn path_escapes_root(path: PathBuf) -> Self {
        AnalysisError::PathEscapesRoot {
            path,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

//! Helpers for bridging `AnalysisError` into ordinary `Result` chains.

use super::types::{AnalysisError, ErrorSeverity, Result};

/// Adds ad-hoc context to a fallible operation.
pub trait ResultExt<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    fn with_file_context(self, path: &std::path::Path) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            AnalysisError::config(format!("{}: {}", f(), inner))
        })
    }

    fn with_file_context(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            if let AnalysisError::Io { source, .. } = &inner {
                if source.kind() == std::io::ErrorKind::PermissionDenied {
                    return AnalysisError::permission_denied(path.to_path_buf());
                }
            }
            inner
        })
    }
}

/// Dispatches on severity: non-critical errors are logged and swallowed,
/// critical errors are returned for the caller to handle.
pub fn handle_error(err: AnalysisError) -> Option<AnalysisError> {
    match err.severity() {
        ErrorSeverity::Warning | ErrorSeverity::Error => {
            eprintln!("{}: {}", err.severity(), err.user_message());
            None
        }
        ErrorSeverity::Critical => {
            eprintln!("{}: {}", err.severity(), err.user_message());
            Some(err)
        }
    }
}

/// Runs a closure, converting any non-critical error into `Ok(None)` so the
/// caller can continue past recoverable failures.
pub fn try_with_recovery<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(err) if !err.is_critical() => {
            eprintln!("{}: {}", err.severity(), err.user_message());
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

pub trait OptionExt<T> {
    fn ok_or_error(self, err: AnalysisError) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error(self, err: AnalysisError) -> Result<T> {
        self.ok_or(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_context() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let wrapped = res.with_context(|| "loading thing".to_string());
        assert!(wrapped.is_err());
    }

    #[test]
    fn test_with_file_context_permission_denied() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let path = std::path::Path::new("/secret");
        let wrapped = res.with_file_context(path);
        match wrapped {
            Err(AnalysisError::PermissionDenied { path, .. }) => {
                assert_eq!(path, std::path::PathBuf::from("/secret"));
            }
            _ => panic!("expected PermissionDenied"),
        }
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let err = none.ok_or_error(AnalysisError::config("missing value"));
        assert!(err.is_err());
    }

    #[test]
    fn test_try_with_recovery_swallows_non_critical() {
        let result = try_with_recovery::<(), _>(|| {
            Err(AnalysisError::permission_denied(std::path::PathBuf::from("/x")))
        });
        assert_eq!(result.unwrap(), None);
    }
}
